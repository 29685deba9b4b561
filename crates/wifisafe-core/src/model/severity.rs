// ── Severity scale ──
//
// `Safe < Low < Medium < High < Critical` is a total order. `Unknown` sits
// outside of it: it is never greater than a known level and it never
// escalates. This is deliberately not a derived `Ord` so that nobody sorts
// `Unknown` into the scale by accident.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

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
pub enum Severity {
    Safe,
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl Severity {
    /// Position on the known scale; `None` for `Unknown`.
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Safe => Some(0),
            Self::Low => Some(1),
            Self::Medium => Some(2),
            Self::High => Some(3),
            Self::Critical => Some(4),
            Self::Unknown => None,
        }
    }

    /// One step up the scale, capped at `Critical`. `Unknown` stays `Unknown`.
    pub fn escalate(self) -> Self {
        match self {
            Self::Safe => Self::Low,
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Apply `escalate` `steps` times.
    pub fn escalate_by(self, steps: usize) -> Self {
        (0..steps).fold(self, |level, _| level.escalate())
    }

    /// The more severe of two levels. A known level always wins over `Unknown`.
    pub fn max_of(self, other: Self) -> Self {
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => {
                if b > a {
                    other
                } else {
                    self
                }
            }
            (Some(_), None) => self,
            (None, _) => other,
        }
    }

    /// `true` if this is a known level at or above `floor`.
    pub fn is_at_least(self, floor: Self) -> bool {
        match (self.rank(), floor.rank()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }

    /// Points deducted from a network's security score per finding.
    pub fn score_penalty(self) -> u8 {
        match self {
            Self::Critical => 30,
            Self::High => 20,
            Self::Medium => 10,
            Self::Low => 5,
            Self::Safe | Self::Unknown => 0,
        }
    }
}
