// ── Analysis pipeline ──
//
// validate -> index (dedupe + classify) -> detect -> aggregate -> fail-safe
// -> report. The analyzer holds only configuration and stateless rule sets,
// so one instance can analyze any number of batches concurrently.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::aggregate::{self, RiskAggregator};
use crate::config::AnalysisConfig;
use crate::detect::{BatchIndex, ThreatDetector};
use crate::freshness::FreshnessPolicy;
use crate::model::{
    NetworkObservation, NetworkRiskAssessment, ScanMetadata, ScanSource, SecurityReport,
    SecurityScheme, ThreatFinding,
};
use crate::validate::{filter_valid, sanitize_search_query};

#[derive(Debug, Clone)]
pub struct SecurityAnalyzer {
    config: AnalysisConfig,
    detector: ThreatDetector,
    aggregator: RiskAggregator,
}

impl Default for SecurityAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl SecurityAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let detector = ThreatDetector::new(&config);
        let aggregator = RiskAggregator::new(&config);
        Self {
            config,
            detector,
            aggregator,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Bucket a batch's capture time using this analyzer's thresholds.
    pub fn assess_metadata(
        &self,
        captured_at: DateTime<Utc>,
        source: ScanSource,
        now: DateTime<Utc>,
    ) -> ScanMetadata {
        ScanMetadata::assess(captured_at, source, now, &self.config.freshness)
    }

    /// Analyze one batch.
    ///
    /// `metadata: None` is accepted for callers that never tracked scan age
    /// and is treated as fresh. Otherwise freshness is always re-derived
    /// from `captured_at` and `now`; a caller-supplied bucket is ignored.
    /// `now` stamps every finding and the report, so identical inputs yield
    /// identical reports.
    pub fn analyze(
        &self,
        observations: &[NetworkObservation],
        metadata: Option<ScanMetadata>,
        now: DateTime<Utc>,
    ) -> SecurityReport {
        let metadata = metadata.map(|m| {
            let assessed = self.assess_metadata(m.captured_at, m.source, now);
            if assessed.freshness != m.freshness {
                warn!(
                    claimed = %m.freshness,
                    actual = %assessed.freshness,
                    age_secs = assessed.age_at(now).num_seconds(),
                    "scan metadata freshness recomputed"
                );
            }
            assessed
        });
        let validated = filter_valid(observations);
        let index = BatchIndex::build(&validated.accepted);
        let findings = self.detector.scan_index(&index, now);
        let freshness = metadata.map(|m| m.freshness);

        let networks: Vec<NetworkRiskAssessment> = index
            .entries()
            .iter()
            .map(|entry| {
                let mut assessment = self.aggregator.assess(
                    entry.observation,
                    entry.scheme,
                    findings.for_network(&entry.observation.bssid),
                );
                assessment.threat_level =
                    FreshnessPolicy::apply(assessment.assessed_level, entry.scheme, freshness);
                if assessment.threat_level != assessment.assessed_level {
                    debug!(
                        bssid = %assessment.bssid,
                        assessed = %assessment.assessed_level,
                        reported = %assessment.threat_level,
                        "freshness policy adjusted level"
                    );
                }
                assessment
            })
            .collect();

        let all_findings: Vec<ThreatFinding> = findings.iter().cloned().collect();
        let any_open = index.count_scheme(SecurityScheme::Open) > 0;
        let overall = FreshnessPolicy::apply_overall(
            aggregate::overall_risk(&all_findings),
            any_open,
            freshness,
        );
        let recommendations = aggregate::recommendations(&all_findings, &networks, freshness);
        let rejected = validated.rejected.len() + index.collapsed();

        info!(
            networks = networks.len(),
            findings = all_findings.len(),
            duplicates = findings.duplicate_bssids().count(),
            rejected,
            overall = %overall,
            freshness = ?freshness,
            "batch analyzed"
        );

        SecurityReport::new(
            now,
            metadata,
            networks,
            all_findings,
            overall,
            recommendations,
            rejected,
        )
    }

    /// Networks in `report` whose SSID or BSSID contains `query`,
    /// case-insensitively. The query is sanitized first, which strips
    /// separators, so BSSIDs are matched on bare hex digits. An empty
    /// sanitized query means no filter.
    #[allow(clippy::unused_self)]
    pub fn filter_networks<'r>(
        &self,
        report: &'r SecurityReport,
        query: &str,
    ) -> Vec<&'r NetworkRiskAssessment> {
        let Some(needle) = sanitize_search_query(query).map(|q| q.to_lowercase()) else {
            return report.networks().iter().collect();
        };
        report
            .networks()
            .iter()
            .filter(|n| {
                n.ssid.to_lowercase().contains(&needle)
                    || n.bssid.as_str().replace(':', "").contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Bssid, Freshness, Severity, ThreatKind};
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn obs(ssid: &str, bssid: &str, caps: &str) -> NetworkObservation {
        NetworkObservation {
            ssid: ssid.into(),
            bssid: Bssid::new(bssid),
            raw_capabilities: caps.into(),
            signal_level: -55,
            frequency_mhz: 2412,
            timestamp: now(),
        }
    }

    #[test]
    fn invalid_and_repeated_items_are_counted_not_analyzed() {
        let batch = vec![
            obs("Home", "00:11:22:33:44:55", "[WPA2-PSK-CCMP]"),
            obs("Home", "00:11:22:33:44:55", "[WPA2-PSK-CCMP]"),
            obs("Ghost", "00:00:00:00:00:00", "[WPA2-PSK-CCMP]"),
        ];
        let report = SecurityAnalyzer::default().analyze(&batch, None, now());
        assert_eq!(report.networks().len(), 1);
        assert_eq!(report.rejected(), 2);
        assert!(report.findings().is_empty());
        assert_eq!(report.overall_risk_level(), Severity::Safe);
    }

    #[test]
    fn batch_findings_follow_network_findings() {
        let batch: Vec<_> = (1..=4)
            .map(|i| obs(&format!("Cafe{i}"), &format!("{i}0:00:00:00:00:01"), ""))
            .collect();
        let report = SecurityAnalyzer::default().analyze(&batch, None, now());
        let last = report.findings().last().unwrap();
        assert_eq!(last.kind, ThreatKind::SuspiciousActivity);
        assert_eq!(report.counts().critical, 4);
    }

    #[test]
    fn stale_metadata_hides_safety() {
        let analyzer = SecurityAnalyzer::default();
        let meta = analyzer.assess_metadata(
            now() - TimeDelta::minutes(10),
            ScanSource::SystemCache,
            now(),
        );
        assert_eq!(meta.freshness, Freshness::Stale);
        let batch = [obs("Home", "00:11:22:33:44:55", "[WPA3-SAE]")];
        let report = analyzer.analyze(&batch, Some(meta), now());
        let net = &report.networks()[0];
        assert_eq!(net.assessed_level, Severity::Safe);
        assert_eq!(net.threat_level, Severity::Unknown);
        assert_eq!(report.overall_risk_level(), Severity::Unknown);
        assert_eq!(report.counts().unknown, 1);
    }

    #[test]
    fn filter_networks_by_query() {
        let analyzer = SecurityAnalyzer::default();
        let batch = vec![
            obs("HomeNet", "00:11:22:33:44:55", "[WPA2]"),
            obs("Office", "00:11:22:33:44:66", "[WPA2]"),
        ];
        let report = analyzer.analyze(&batch, None, now());
        let hits = analyzer.filter_networks(&report, "  home<script> ");
        assert!(hits.is_empty(), "sanitized query 'homescript' matches nothing");
        let hits = analyzer.filter_networks(&report, "HOME");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ssid, "HomeNet");
        assert_eq!(analyzer.filter_networks(&report, "44:66").len(), 1);
        assert_eq!(analyzer.filter_networks(&report, "<>").len(), 2);
    }
}
