// ── Analysis tuning ──
//
// Every threshold the pipeline uses lives here so callers can override it.
// These types never touch disk; `wifisafe-config` loads them from TOML and
// environment and hands them in.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default generic-hotspot terms and vendor default router names.
pub const DEFAULT_SUSPICIOUS_SSID_PATTERNS: &[&str] = &[
    "free wifi",
    "free_wifi",
    "freewifi",
    "free-wifi",
    "public",
    "guest",
    "hotspot",
    "airport",
    "hotel",
    "starbucks",
    "mcdonalds",
    "xfinitywifi",
    "attwifi",
    "linksys",
    "netgear",
    "dlink",
    "d-link",
    "tp-link",
    "tplink",
    "belkin",
    "asus",
    "default",
    "setup",
    "wireless",
];

/// Thresholds and pattern lists for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Case-insensitive substrings that mark an SSID as suspicious.
    pub suspicious_ssid_patterns: Vec<String>,
    /// More open networks than this in one batch is suspicious.
    pub open_network_flood_threshold: usize,
    /// Max suffix distance for two addresses to count as sequential.
    pub sequential_bssid_distance: u16,
    /// Signals below this (dBm) produce a weak-signal finding; at or below
    /// it they escalate the network's baseline.
    pub weak_signal_dbm: i32,
    /// Signals above this (dBm) produce a signal-anomaly finding.
    pub strong_signal_dbm: i32,
    pub freshness: FreshnessThresholds,
    pub admission: AdmissionConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            suspicious_ssid_patterns: DEFAULT_SUSPICIOUS_SSID_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            open_network_flood_threshold: 3,
            sequential_bssid_distance: 10,
            weak_signal_dbm: -80,
            strong_signal_dbm: -20,
            freshness: FreshnessThresholds::default(),
            admission: AdmissionConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reject combinations the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(-127..=0).contains(&self.weak_signal_dbm) {
            return Err(CoreError::InvalidConfig {
                field: "weak_signal_dbm".into(),
                reason: format!("{} dBm is outside [-127, 0]", self.weak_signal_dbm),
            });
        }
        if !(-127..=0).contains(&self.strong_signal_dbm) {
            return Err(CoreError::InvalidConfig {
                field: "strong_signal_dbm".into(),
                reason: format!("{} dBm is outside [-127, 0]", self.strong_signal_dbm),
            });
        }
        if self.strong_signal_dbm <= self.weak_signal_dbm {
            return Err(CoreError::InvalidConfig {
                field: "strong_signal_dbm".into(),
                reason: "must be greater than weak_signal_dbm".into(),
            });
        }
        if self
            .suspicious_ssid_patterns
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err(CoreError::InvalidConfig {
                field: "suspicious_ssid_patterns".into(),
                reason: "patterns must not be blank".into(),
            });
        }
        self.freshness.validate()?;
        self.admission.validate()
    }
}

/// Age buckets for scan metadata, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessThresholds {
    /// Younger than this is `Fresh`.
    pub fresh_within_secs: u64,
    /// Older than this is `Expired`; in between is `Stale`.
    pub expired_after_secs: u64,
}

impl Default for FreshnessThresholds {
    fn default() -> Self {
        Self {
            fresh_within_secs: 5 * 60,
            expired_after_secs: 30 * 60,
        }
    }
}

impl FreshnessThresholds {
    pub fn fresh_within(&self) -> TimeDelta {
        secs_to_delta(self.fresh_within_secs)
    }

    pub fn expired_after(&self) -> TimeDelta {
        secs_to_delta(self.expired_after_secs)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.fresh_within_secs == 0 {
            return Err(CoreError::InvalidConfig {
                field: "freshness.fresh_within_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.expired_after_secs < self.fresh_within_secs {
            return Err(CoreError::InvalidConfig {
                field: "freshness.expired_after_secs".into(),
                reason: "must not be shorter than fresh_within_secs".into(),
            });
        }
        Ok(())
    }
}

/// Throttle windows for the scan admission controller, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    pub foreground_window_secs: u64,
    pub background_window_secs: u64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            foreground_window_secs: 30,
            background_window_secs: 30 * 60,
        }
    }
}

impl AdmissionConfig {
    pub fn foreground_window(&self) -> TimeDelta {
        secs_to_delta(self.foreground_window_secs)
    }

    pub fn background_window(&self) -> TimeDelta {
        secs_to_delta(self.background_window_secs)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.background_window_secs < self.foreground_window_secs {
            return Err(CoreError::InvalidConfig {
                field: "admission.background_window_secs".into(),
                reason: "must not be shorter than foreground_window_secs".into(),
            });
        }
        Ok(())
    }
}

/// Saturating conversion; absurd values clamp instead of wrapping.
fn secs_to_delta(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AnalysisConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.open_network_flood_threshold, 3);
        assert_eq!(cfg.sequential_bssid_distance, 10);
        assert_eq!(cfg.weak_signal_dbm, -80);
        assert_eq!(cfg.freshness.fresh_within(), TimeDelta::minutes(5));
        assert_eq!(cfg.freshness.expired_after(), TimeDelta::minutes(30));
        assert_eq!(cfg.admission.foreground_window(), TimeDelta::seconds(30));
        assert_eq!(cfg.admission.background_window(), TimeDelta::minutes(30));
    }

    #[test]
    fn rejects_inverted_freshness() {
        let mut cfg = AnalysisConfig::default();
        cfg.freshness.expired_after_secs = 60;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("expired_after_secs"));
    }

    #[test]
    fn rejects_out_of_range_signal() {
        let cfg = AnalysisConfig {
            weak_signal_dbm: 10,
            ..AnalysisConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_admission_windows() {
        let mut cfg = AnalysisConfig::default();
        cfg.admission.background_window_secs = 5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn huge_seconds_saturate() {
        let t = FreshnessThresholds {
            fresh_within_secs: u64::MAX,
            expired_after_secs: u64::MAX,
        };
        assert_eq!(t.fresh_within(), TimeDelta::MAX);
    }
}
