// ── Threat finding types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::bssid::Bssid;
use super::severity::Severity;

/// Closed set of issues the detector can report.
///
/// Declaration order is the order recommendations are emitted in.
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
#[strum(serialize_all = "snake_case")]
pub enum ThreatKind {
    /// No encryption at all.
    OpenNetwork,
    /// WEP.
    WeakEncryption,
    /// WPA (TKIP era).
    LegacyEncryption,
    /// Capability string did not match any known scheme.
    UnrecognizedSecurity,
    /// Same SSID advertised by more than one BSSID (possible evil twin).
    DuplicateSsid,
    /// Batch-level: an SSID advertised by more than two BSSIDs.
    MultipleDuplicates,
    /// Generic hotspot term or default vendor router name.
    SuspiciousSsid,
    SsidTooLong,
    SsidTooShort,
    HiddenNetwork,
    /// Addresses from one vendor block with near-consecutive suffixes.
    SequentialBssid,
    /// Batch-level: more open networks than the configured threshold.
    SuspiciousActivity,
    WeakSignal,
    /// Signal implausibly strong for a passing observation.
    SignalAnomaly,
}

impl ThreatKind {
    pub fn default_severity(self) -> Severity {
        match self {
            Self::OpenNetwork => Severity::Critical,
            Self::WeakEncryption | Self::DuplicateSsid | Self::MultipleDuplicates => {
                Severity::High
            }
            Self::LegacyEncryption
            | Self::UnrecognizedSecurity
            | Self::SuspiciousSsid
            | Self::SequentialBssid
            | Self::SuspiciousActivity
            | Self::WeakSignal => Severity::Medium,
            Self::SsidTooLong | Self::SsidTooShort | Self::HiddenNetwork | Self::SignalAnomaly => {
                Severity::Low
            }
        }
    }

    /// Findings of this kind describe the batch, never a single network.
    pub fn is_batch_level(self) -> bool {
        matches!(self, Self::MultipleDuplicates | Self::SuspiciousActivity)
    }

    /// Advice shown to the user when at least one finding of this kind exists.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::OpenNetwork => {
                "Avoid open networks; if you must connect, use a VPN and only HTTPS sites."
            }
            Self::WeakEncryption => {
                "WEP can be cracked in minutes. Do not send sensitive data over WEP networks."
            }
            Self::LegacyEncryption => {
                "WPA (TKIP) is deprecated. Prefer networks offering WPA2 or WPA3."
            }
            Self::UnrecognizedSecurity => {
                "Some networks advertise unrecognized security. Verify them before connecting."
            }
            Self::DuplicateSsid | Self::MultipleDuplicates => {
                "Several access points share one network name. Confirm the legitimate one with the venue before connecting (possible evil twin)."
            }
            Self::SuspiciousSsid => {
                "Generic or default network names are commonly used by rogue hotspots. Be cautious."
            }
            Self::SsidTooLong | Self::SsidTooShort => {
                "Some network names are malformed. Treat those access points as untrusted."
            }
            Self::HiddenNetwork => {
                "Hidden networks offer no extra security and can hide rogue access points."
            }
            Self::SequentialBssid => {
                "Clusters of near-identical hardware addresses were seen; this pattern can indicate spoofed access points."
            }
            Self::SuspiciousActivity => {
                "An unusual number of open networks is nearby. Stay on trusted, encrypted networks."
            }
            Self::WeakSignal => {
                "Weak signals are easy to overpower. Move closer to the intended access point."
            }
            Self::SignalAnomaly => {
                "Unusually strong signals were observed; a nearby transmitter may be impersonating a network."
            }
        }
    }
}

/// What a finding is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FindingSubject {
    Network { ssid: String, bssid: Bssid },
    Batch,
}

impl FindingSubject {
    pub fn bssid(&self) -> Option<&Bssid> {
        match self {
            Self::Network { bssid, .. } => Some(bssid),
            Self::Batch => None,
        }
    }
}

/// One discovered issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatFinding {
    pub kind: ThreatKind,
    pub severity: Severity,
    pub subject: FindingSubject,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    pub detected_at: DateTime<Utc>,
}

impl ThreatFinding {
    /// Finding about a single network at the kind's default severity.
    pub fn network(
        kind: ThreatKind,
        ssid: impl Into<String>,
        bssid: Bssid,
        description: impl Into<String>,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            subject: FindingSubject::Network {
                ssid: ssid.into(),
                bssid,
            },
            description: description.into(),
            extra: None,
            detected_at,
        }
    }

    /// Finding about the whole batch at the kind's default severity.
    pub fn batch(kind: ThreatKind, description: impl Into<String>, detected_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            subject: FindingSubject::Batch,
            description: description.into(),
            extra: None,
            detected_at,
        }
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}
