//! Fail-safe freshness policy.
//!
//! Runs after aggregation and decides what level is actually reported,
//! given how old the underlying scan is. The contract callers rely on:
//! `Safe` is only ever reported for `Fresh` data, or when no metadata was
//! supplied at all.
//!
//! | Freshness          | Pre-policy level    | Reported               |
//! |--------------------|---------------------|------------------------|
//! | `Fresh` / absent   | any                 | unchanged              |
//! | `Stale` / `Unknown`| `Medium` or worse   | at least `High`        |
//! | `Stale` / `Unknown`| `Safe`/`Low`/`Unknown` | `Unknown`           |
//! | `Expired`          | any                 | `Unknown`              |
//!
//! An unencrypted network is `Critical` whatever the age of the scan:
//! being open is a property of the access point, not of the moment.

use tracing::trace;

use crate::model::{Freshness, SecurityScheme, Severity};

/// Level a structural fact pins a network to, regardless of data age.
fn structural_floor(scheme: SecurityScheme) -> Option<Severity> {
    scheme.is_unencrypted().then_some(Severity::Critical)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FreshnessPolicy;

impl FreshnessPolicy {
    /// Final level for one network.
    pub fn apply(level: Severity, scheme: SecurityScheme, freshness: Option<Freshness>) -> Severity {
        let reported = match freshness {
            None | Some(Freshness::Fresh) => return level,
            Some(Freshness::Expired) => {
                structural_floor(scheme).unwrap_or(Severity::Unknown)
            }
            Some(Freshness::Stale | Freshness::Unknown) => {
                if level.is_at_least(Severity::Medium) {
                    let raised = level.max_of(Severity::High);
                    structural_floor(scheme).map_or(raised, |floor| raised.max_of(floor))
                } else {
                    structural_floor(scheme).unwrap_or(Severity::Unknown)
                }
            }
        };
        trace!(%level, %reported, ?freshness, "fail-safe applied");
        reported
    }

    /// Final batch-level verdict. `any_open` carries the structural
    /// exception for the batch: if an unencrypted network was seen the
    /// batch stays `Critical`.
    pub fn apply_overall(level: Severity, any_open: bool, freshness: Option<Freshness>) -> Severity {
        let scheme = if any_open {
            SecurityScheme::Open
        } else {
            SecurityScheme::Unknown
        };
        Self::apply(level, scheme, freshness)
    }
}
