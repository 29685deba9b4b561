//! Input validation.
//!
//! Observations arrive from platform scan APIs that happily report
//! placeholder addresses, out-of-range signals, and garbage frequencies.
//! [`validate`] classifies one observation; [`filter_valid`] splits a batch
//! into accepted and rejected items. Nothing here returns an error: a bad
//! item is a value, logged and set aside, and the rest of the batch goes on.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Band, Bssid, NetworkObservation};

pub use crate::model::is_hidden_ssid;

/// Longest SSID 802.11 allows, in bytes.
pub const MAX_SSID_BYTES: usize = 32;

/// Search queries are cut to this many characters.
pub const MAX_QUERY_CHARS: usize = 100;

/// Characters that could break out of a query or markup context.
pub const DANGEROUS_CHARS: &[char] = &['<', '>', '"', '\'', '&', ';', '\\'];

/// Literal strings platforms use for "no address".
const PLACEHOLDER_BSSIDS: &[&str] = &[
    "<unknown>",
    "unknown",
    "none",
    "null",
    "any",
    "n/a",
    "00:00:00:00:00:00",
    "02:00:00:00:00:00",
    "ff:ff:ff:ff:ff:ff",
];

/// Why an observation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidReason {
    #[error("BSSID is blank")]
    BlankBssid,

    #[error("BSSID '{bssid}' is a placeholder, not a real access point")]
    PlaceholderBssid { bssid: String },

    #[error("BSSID '{bssid}' is not a colon-separated 6-octet MAC address")]
    MalformedBssid { bssid: String },

    #[error("BSSID '{bssid}' has the multicast bit set")]
    MulticastBssid { bssid: String },

    #[error("SSID is {len} bytes (max 32)")]
    SsidTooLong { len: usize },

    #[error("signal level {dbm} dBm is outside [-127, 0]")]
    SignalOutOfRange { dbm: i32 },

    #[error("frequency {mhz} MHz is not in a known Wi-Fi band")]
    FrequencyOutOfBand { mhz: u32 },
}

/// Result of validating one observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(InvalidReason),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn reason(&self) -> Option<&InvalidReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// An observation that did not make it into analysis, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedObservation {
    pub observation: NetworkObservation,
    pub reason: InvalidReason,
}

/// A batch split by [`filter_valid`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub accepted: Vec<NetworkObservation>,
    pub rejected: Vec<RejectedObservation>,
}

// ── Field validators ────────────────────────────────────────────────

pub fn validate_bssid(bssid: &Bssid) -> Result<(), InvalidReason> {
    let raw = bssid.as_str();
    if raw.is_empty() {
        return Err(InvalidReason::BlankBssid);
    }
    if PLACEHOLDER_BSSIDS.contains(&raw) {
        return Err(InvalidReason::PlaceholderBssid { bssid: raw.into() });
    }
    let Some(octets) = bssid.octets() else {
        return Err(InvalidReason::MalformedBssid { bssid: raw.into() });
    };
    if octets[0] & 0x01 == 0x01 {
        return Err(InvalidReason::MulticastBssid { bssid: raw.into() });
    }
    if octets.iter().all(|&o| o == 0) {
        return Err(InvalidReason::PlaceholderBssid { bssid: raw.into() });
    }
    Ok(())
}

pub fn validate_ssid(ssid: &str) -> Result<(), InvalidReason> {
    if is_hidden_ssid(ssid) {
        return Ok(());
    }
    if ssid.len() > MAX_SSID_BYTES {
        return Err(InvalidReason::SsidTooLong { len: ssid.len() });
    }
    if ssid.contains(DANGEROUS_CHARS) {
        // SSIDs are free text; keep it, but leave a trail.
        warn!(ssid = %ssid.escape_debug(), "SSID contains markup/control characters");
    }
    Ok(())
}

pub fn validate_signal(dbm: i32) -> Result<(), InvalidReason> {
    if (-127..=0).contains(&dbm) {
        Ok(())
    } else {
        Err(InvalidReason::SignalOutOfRange { dbm })
    }
}

pub fn validate_frequency(mhz: u32) -> Result<(), InvalidReason> {
    if mhz == 0 || Band::from_frequency(mhz).is_some() {
        Ok(())
    } else {
        Err(InvalidReason::FrequencyOutOfBand { mhz })
    }
}

// ── Observation / batch ─────────────────────────────────────────────

pub fn validate(observation: &NetworkObservation) -> ValidationOutcome {
    let checks = validate_bssid(&observation.bssid)
        .and_then(|()| validate_ssid(&observation.ssid))
        .and_then(|()| validate_signal(observation.signal_level))
        .and_then(|()| validate_frequency(observation.frequency_mhz));
    match checks {
        Ok(()) => ValidationOutcome::Valid,
        Err(reason) => ValidationOutcome::Invalid(reason),
    }
}

/// Split a batch into observations fit for analysis and rejects.
pub fn filter_valid(batch: &[NetworkObservation]) -> ValidatedBatch {
    let mut out = ValidatedBatch::default();
    for observation in batch {
        match validate(observation) {
            ValidationOutcome::Valid => out.accepted.push(observation.clone()),
            ValidationOutcome::Invalid(reason) => {
                warn!(
                    bssid = %observation.bssid,
                    ssid = %observation.ssid.escape_debug(),
                    %reason,
                    "dropping invalid observation"
                );
                out.rejected.push(RejectedObservation {
                    observation: observation.clone(),
                    reason,
                });
            }
        }
    }
    debug!(
        accepted = out.accepted.len(),
        rejected = out.rejected.len(),
        "batch validated"
    );
    out
}

// ── Search query sanitizer ──────────────────────────────────────────

/// Letters (any script), digits, space, `_`, `-`, `.`.
fn is_safe_query_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.')
}

/// Clean a user-supplied network search string.
///
/// Returns `None` when nothing usable is left, which callers treat as
/// "no filter".
pub fn sanitize_search_query(raw: &str) -> Option<String> {
    let capped: String = raw.trim().chars().take(MAX_QUERY_CHARS).collect();
    let stripped: String = capped.chars().filter(|c| !DANGEROUS_CHARS.contains(c)).collect();

    let cleaned = if stripped.chars().all(is_safe_query_char) {
        stripped
    } else {
        debug!(query = %raw.escape_debug(), "search query had unsafe characters");
        stripped.chars().filter(|&c| is_safe_query_char(c)).collect()
    };

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_owned())
    }
}
