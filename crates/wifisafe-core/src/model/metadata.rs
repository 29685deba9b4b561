// ── Scan provenance and age ──

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::config::FreshnessThresholds;

/// Where a batch of observations came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScanSource {
    /// A scan the device just performed.
    ActiveScan,
    /// Results the platform cached from an earlier scan.
    SystemCache,
    #[default]
    Unknown,
}

/// Qualitative age of a batch relative to the moment of analysis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Freshness {
    Fresh,
    Stale,
    Expired,
    Unknown,
}

impl Freshness {
    /// Bucket an observation age. Negative ages (capture timestamp in the
    /// future, i.e. clock skew) cannot be trusted and map to `Unknown`.
    pub fn classify(age: TimeDelta, thresholds: &FreshnessThresholds) -> Self {
        if age < TimeDelta::zero() {
            Self::Unknown
        } else if age < thresholds.fresh_within() {
            Self::Fresh
        } else if age <= thresholds.expired_after() {
            Self::Stale
        } else {
            Self::Expired
        }
    }
}

/// Provenance and age of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub captured_at: DateTime<Utc>,
    pub source: ScanSource,
    pub freshness: Freshness,
}

impl ScanMetadata {
    /// Build metadata for a batch captured at `captured_at`, bucketing its
    /// age against `now`.
    pub fn assess(
        captured_at: DateTime<Utc>,
        source: ScanSource,
        now: DateTime<Utc>,
        thresholds: &FreshnessThresholds,
    ) -> Self {
        Self {
            captured_at,
            source,
            freshness: Freshness::classify(now - captured_at, thresholds),
        }
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.captured_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> FreshnessThresholds {
        FreshnessThresholds::default()
    }

    #[test]
    fn freshness_buckets() {
        assert_eq!(Freshness::classify(TimeDelta::zero(), &t()), Freshness::Fresh);
        assert_eq!(
            Freshness::classify(TimeDelta::seconds(299), &t()),
            Freshness::Fresh
        );
        assert_eq!(
            Freshness::classify(TimeDelta::minutes(5), &t()),
            Freshness::Stale
        );
        assert_eq!(
            Freshness::classify(TimeDelta::minutes(30), &t()),
            Freshness::Stale
        );
        assert_eq!(
            Freshness::classify(TimeDelta::minutes(31), &t()),
            Freshness::Expired
        );
        assert_eq!(
            Freshness::classify(TimeDelta::seconds(-1), &t()),
            Freshness::Unknown
        );
    }

    #[test]
    fn assess_uses_now() {
        let now = Utc::now();
        let meta = ScanMetadata::assess(
            now - TimeDelta::minutes(10),
            ScanSource::SystemCache,
            now,
            &t(),
        );
        assert_eq!(meta.freshness, Freshness::Stale);
        assert_eq!(meta.age_at(now), TimeDelta::minutes(10));
    }
}
