//! Risk aggregation.
//!
//! Turns a classified observation plus its findings into a
//! [`NetworkRiskAssessment`], and a whole batch of findings into the
//! report-level verdict and recommendation list. Everything here produces
//! the level *before* the freshness policy runs.

use indexmap::IndexSet;
use strum::IntoEnumIterator;

use crate::config::AnalysisConfig;
use crate::model::{
    Freshness, NetworkObservation, NetworkRiskAssessment, SecurityScheme, Severity, ThreatFinding,
    ThreatKind,
};

const CRITICAL_NETWORK_ADVICE: &str =
    "At least one network is rated critical. Do not connect to it.";
const ALL_SAFE_ADVICE: &str =
    "All observed networks use strong security. Still prefer networks you recognize.";
const NO_NETWORKS_ADVICE: &str = "No usable networks were observed in this scan.";
const STALE_ADVICE: &str =
    "These results come from an aging scan. Rescan before relying on them.";
const EXPIRED_ADVICE: &str =
    "These results come from an expired scan and cannot vouch for any network. Run a new scan.";

#[derive(Debug, Clone)]
pub struct RiskAggregator {
    weak_signal_dbm: i32,
}

impl RiskAggregator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            weak_signal_dbm: config.weak_signal_dbm,
        }
    }

    /// Pre-fail-safe assessment of one network. `findings` are the ones the
    /// detector attached to this network; `threat_level` starts out equal
    /// to `assessed_level` until the freshness policy runs.
    pub fn assess(
        &self,
        observation: &NetworkObservation,
        scheme: SecurityScheme,
        findings: &[ThreatFinding],
    ) -> NetworkRiskAssessment {
        let baseline = scheme.baseline_severity();
        let in_duplicate = findings.iter().any(|f| f.kind == ThreatKind::DuplicateSsid);

        let steps = [
            observation.is_hidden(),
            in_duplicate,
            observation.signal_level <= self.weak_signal_dbm,
        ]
        .into_iter()
        .filter(|hit| *hit)
        .count();

        let assessed_level = findings
            .iter()
            .fold(baseline.escalate_by(steps), |level, f| level.max_of(f.severity));

        NetworkRiskAssessment {
            ssid: observation.ssid.clone(),
            bssid: observation.bssid.clone(),
            scheme,
            baseline,
            findings: findings.to_vec(),
            assessed_level,
            threat_level: assessed_level,
            security_score: security_score(scheme, findings),
            signal_level: observation.signal_level,
            frequency_mhz: observation.frequency_mhz,
            band: observation.band(),
        }
    }
}

/// 100 minus the scheme penalty and one penalty per finding, floored at 0.
pub fn security_score(scheme: SecurityScheme, findings: &[ThreatFinding]) -> u8 {
    findings
        .iter()
        .fold(100u8.saturating_sub(scheme.score_penalty()), |score, f| {
            score.saturating_sub(f.severity.score_penalty())
        })
}

/// Batch verdict from every finding in the batch, network and batch level.
pub fn overall_risk(findings: &[ThreatFinding]) -> Severity {
    let count = |level: Severity| findings.iter().filter(|f| f.severity == level).count();
    let (critical, high, medium) = (
        count(Severity::Critical),
        count(Severity::High),
        count(Severity::Medium),
    );

    if critical > 0 {
        Severity::Critical
    } else if high > 2 {
        Severity::High
    } else if high > 0 || medium > 3 {
        Severity::Medium
    } else if medium > 0 {
        Severity::Low
    } else {
        Severity::Safe
    }
}

/// Human-readable advice, deduplicated, in a stable order: finding kinds in
/// declaration order, then network-level advice, then data-age advice.
///
/// `networks` should carry final (post-policy) levels.
pub fn recommendations(
    findings: &[ThreatFinding],
    networks: &[NetworkRiskAssessment],
    freshness: Option<Freshness>,
) -> Vec<String> {
    let mut advice: IndexSet<&'static str> = IndexSet::new();

    for kind in ThreatKind::iter() {
        if findings.iter().any(|f| f.kind == kind) {
            advice.insert(kind.recommendation());
        }
    }

    if networks.is_empty() {
        advice.insert(NO_NETWORKS_ADVICE);
    } else if networks.iter().any(|n| n.threat_level == Severity::Critical) {
        advice.insert(CRITICAL_NETWORK_ADVICE);
    } else if networks.iter().all(|n| n.threat_level == Severity::Safe) {
        advice.insert(ALL_SAFE_ADVICE);
    }

    match freshness {
        Some(Freshness::Stale | Freshness::Unknown) => {
            advice.insert(STALE_ADVICE);
        }
        Some(Freshness::Expired) => {
            advice.insert(EXPIRED_ADVICE);
        }
        None | Some(Freshness::Fresh) => {}
    }

    advice.into_iter().map(str::to_owned).collect()
}
