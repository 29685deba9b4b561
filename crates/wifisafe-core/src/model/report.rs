// ── Analysis output types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bssid::Bssid;
use super::finding::ThreatFinding;
use super::metadata::{Freshness, ScanMetadata};
use super::observation::Band;
use super::scheme::SecurityScheme;
use super::severity::Severity;

/// Verdict for one access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRiskAssessment {
    pub ssid: String,
    pub bssid: Bssid,
    pub scheme: SecurityScheme,
    /// Scheme tier before escalation.
    pub baseline: Severity,
    pub findings: Vec<ThreatFinding>,
    /// Level before the freshness policy ran. Kept for audit trails.
    pub assessed_level: Severity,
    /// Final level handed to consumers.
    pub threat_level: Severity,
    /// 0–100, lower is worse.
    pub security_score: u8,
    pub signal_level: i32,
    pub frequency_mhz: u32,
    /// `None` when the frequency was not reported.
    #[serde(default)]
    pub band: Option<Band>,
}

/// Number of networks at each final threat level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub safe: usize,
    pub unknown: usize,
}

impl TierCounts {
    pub fn tally<'a>(levels: impl IntoIterator<Item = &'a Severity>) -> Self {
        let mut counts = Self::default();
        for level in levels {
            match level {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Safe => counts.safe += 1,
                Severity::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.safe + self.unknown
    }
}

/// Batch-level result of one analysis run.
///
/// Immutable once built: a new run produces a new report. Fields are only
/// reachable through accessors for that reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityReport {
    generated_at: DateTime<Utc>,
    metadata: Option<ScanMetadata>,
    networks: Vec<NetworkRiskAssessment>,
    counts: TierCounts,
    findings: Vec<ThreatFinding>,
    overall_risk_level: Severity,
    recommendations: Vec<String>,
    rejected: usize,
}

impl SecurityReport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        generated_at: DateTime<Utc>,
        metadata: Option<ScanMetadata>,
        networks: Vec<NetworkRiskAssessment>,
        findings: Vec<ThreatFinding>,
        overall_risk_level: Severity,
        recommendations: Vec<String>,
        rejected: usize,
    ) -> Self {
        let counts = TierCounts::tally(networks.iter().map(|n| &n.threat_level));
        Self {
            generated_at,
            metadata,
            networks,
            counts,
            findings,
            overall_risk_level,
            recommendations,
            rejected,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn metadata(&self) -> Option<&ScanMetadata> {
        self.metadata.as_ref()
    }

    /// `None` when the caller supplied no metadata (treated as fresh).
    pub fn freshness(&self) -> Option<Freshness> {
        self.metadata.map(|m| m.freshness)
    }

    pub fn networks(&self) -> &[NetworkRiskAssessment] {
        &self.networks
    }

    pub fn counts(&self) -> TierCounts {
        self.counts
    }

    /// Every finding: per-network ones first, in network order, then
    /// batch-level ones.
    pub fn findings(&self) -> &[ThreatFinding] {
        &self.findings
    }

    pub fn overall_risk_level(&self) -> Severity {
        self.overall_risk_level
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// Observations dropped by validation or BSSID de-duplication.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn network(&self, bssid: &Bssid) -> Option<&NetworkRiskAssessment> {
        self.networks.iter().find(|n| &n.bssid == bssid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_every_level() {
        let levels = [
            Severity::Critical,
            Severity::Critical,
            Severity::High,
            Severity::Safe,
            Severity::Unknown,
        ];
        let counts = TierCounts::tally(levels.iter());
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.safe, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 5);
    }
}
