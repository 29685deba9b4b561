// ── Scan observation types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use super::bssid::Bssid;

/// SSID spellings platforms use for a network that does not broadcast its name.
pub const HIDDEN_SSID_PLACEHOLDERS: &[&str] = &["<unknown ssid>", "<hidden>", "<hidden ssid>"];

/// One access point seen in one scan pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkObservation {
    #[serde(default)]
    pub ssid: String,
    pub bssid: Bssid,
    /// Free-text capability/cipher string, e.g. `[WPA2-PSK-CCMP][ESS]`.
    #[serde(default, alias = "capabilities")]
    pub raw_capabilities: String,
    /// dBm, valid domain [-127, 0].
    pub signal_level: i32,
    /// 0 means the platform did not report a frequency.
    #[serde(default)]
    pub frequency_mhz: u32,
    pub timestamp: DateTime<Utc>,
}

impl NetworkObservation {
    pub fn is_hidden(&self) -> bool {
        is_hidden_ssid(&self.ssid)
    }

    pub fn band(&self) -> Option<Band> {
        Band::from_frequency(self.frequency_mhz)
    }
}

/// Blank, NUL-only, or a known placeholder string.
pub fn is_hidden_ssid(ssid: &str) -> bool {
    let trimmed = ssid.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    trimmed.is_empty()
        || HIDDEN_SSID_PLACEHOLDERS
            .iter()
            .any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Wi-Fi frequency band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, IntoStaticStr)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    #[strum(serialize = "2.4GHz")]
    TwoPointFourGhz,
    #[serde(rename = "5GHz")]
    #[strum(serialize = "5GHz")]
    FiveGhz,
    #[serde(rename = "6GHz")]
    #[strum(serialize = "6GHz")]
    SixGhz,
}

impl Band {
    /// Map a center frequency to its band. `None` for 0 (unreported) and
    /// for anything outside the three known bands.
    pub fn from_frequency(mhz: u32) -> Option<Self> {
        match mhz {
            2400..=2500 => Some(Self::TwoPointFourGhz),
            5100..=5900 => Some(Self::FiveGhz),
            5925..=7125 => Some(Self::SixGhz),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hidden_ssid_placeholders() {
        assert!(is_hidden_ssid(""));
        assert!(is_hidden_ssid("   "));
        assert!(is_hidden_ssid("\0\0\0"));
        assert!(is_hidden_ssid("<unknown ssid>"));
        assert!(is_hidden_ssid("<HIDDEN>"));
        assert!(!is_hidden_ssid("Home"));
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(Band::from_frequency(2412), Some(Band::TwoPointFourGhz));
        assert_eq!(Band::from_frequency(5180), Some(Band::FiveGhz));
        assert_eq!(Band::from_frequency(5955), Some(Band::SixGhz));
        assert_eq!(Band::from_frequency(0), None);
        assert_eq!(Band::from_frequency(5910), None);
        assert_eq!(Band::from_frequency(900), None);
    }

    #[test]
    fn observation_deserializes_with_aliases() {
        let obs: NetworkObservation = serde_json::from_str(
            r#"{
                "ssid": "Cafe",
                "bssid": "AA:BB:CC:00:00:01",
                "capabilities": "[WPA2-PSK-CCMP][ESS]",
                "signal_level": -55,
                "timestamp": "2026-01-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(obs.bssid.as_str(), "aa:bb:cc:00:00:01");
        assert_eq!(obs.raw_capabilities, "[WPA2-PSK-CCMP][ESS]");
        assert_eq!(obs.frequency_mhz, 0);
        assert!(obs.band().is_none());
    }
}
