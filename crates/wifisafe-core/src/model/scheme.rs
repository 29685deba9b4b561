// ── Advertised security scheme ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::severity::Severity;

/// Encryption/authentication protocol advertised by an access point.
///
/// Derived once per observation by [`crate::classify::classify`].
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
pub enum SecurityScheme {
    Open,
    Wep,
    Wpa,
    Wpa2,
    Wpa2Wpa3Transitional,
    Wpa3,
    Enterprise,
    Unknown,
}

impl SecurityScheme {
    /// Risk tier before any finding or escalation is considered.
    pub fn baseline_severity(self) -> Severity {
        match self {
            Self::Open => Severity::Critical,
            Self::Wep => Severity::High,
            Self::Wpa => Severity::Medium,
            Self::Wpa2 | Self::Wpa2Wpa3Transitional | Self::Enterprise => Severity::Low,
            Self::Wpa3 => Severity::Safe,
            Self::Unknown => Severity::Unknown,
        }
    }

    /// Points deducted from the security score for the scheme itself.
    pub fn score_penalty(self) -> u8 {
        match self {
            Self::Open => 80,
            Self::Wep => 60,
            Self::Wpa => 40,
            Self::Wpa2 => 10,
            Self::Wpa2Wpa3Transitional => 5,
            Self::Wpa3 => 0,
            Self::Enterprise => 15,
            Self::Unknown => 50,
        }
    }

    /// Human-readable label for tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Wep => "WEP",
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wpa2Wpa3Transitional => "WPA2/WPA3",
            Self::Wpa3 => "WPA3",
            Self::Enterprise => "Enterprise",
            Self::Unknown => "Unknown",
        }
    }

    /// Unencrypted is a structural fact: it holds no matter how old the
    /// observation is.
    pub fn is_unencrypted(self) -> bool {
        matches!(self, Self::Open)
    }
}
