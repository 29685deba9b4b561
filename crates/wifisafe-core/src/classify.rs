//! Capability classifier.
//!
//! Maps a free-text capability string (`[WPA2-PSK-CCMP][ESS]`,
//! `WPA3-SAE`, `[WEP]`, ...) to a [`SecurityScheme`]. Matching is a
//! case-insensitive substring search evaluated in strict priority order:
//!
//! | Priority | Marker                         | Scheme                  |
//! |----------|--------------------------------|-------------------------|
//! | 1        | `WPA3`                         | `Wpa3`                  |
//! | 2        | `SAE`/`OWE` together with `PSK`/`WPA2` | `Wpa2Wpa3Transitional` |
//! | 3        | `SAE`, `OWE`                   | `Wpa3`                  |
//! | 4        | `WPA2`                         | `Wpa2`                  |
//! | 5        | `WPA`                          | `Wpa`                   |
//! | 6        | `WEP`                          | `Wep`                   |
//! | 7        | `EAP`, `802.1X`                | `Enterprise`            |
//! | 8        | `OPEN`, `NONE`, or only non-security flags | `Open`      |
//!
//! A blank string is `Open`; anything else that matches nothing is `Unknown`.

use crate::model::{SecurityScheme, Severity};

/// Bracketed tokens that say nothing about encryption.
const NON_SECURITY_FLAGS: &[&str] = &["ESS", "IBSS", "BSS", "WPS", "P2P", "BLE", "MFPC", "MFPR"];

pub fn classify(raw: &str) -> SecurityScheme {
    let caps = raw.trim().to_ascii_uppercase();
    if caps.is_empty() {
        return SecurityScheme::Open;
    }

    let wpa3_family = caps.contains("SAE") || caps.contains("OWE");

    if caps.contains("WPA3") {
        SecurityScheme::Wpa3
    } else if wpa3_family && (caps.contains("PSK") || caps.contains("WPA2")) {
        SecurityScheme::Wpa2Wpa3Transitional
    } else if wpa3_family {
        SecurityScheme::Wpa3
    } else if caps.contains("WPA2") {
        SecurityScheme::Wpa2
    } else if caps.contains("WPA") {
        SecurityScheme::Wpa
    } else if caps.contains("WEP") {
        SecurityScheme::Wep
    } else if caps.contains("EAP") || caps.contains("802.1X") {
        SecurityScheme::Enterprise
    } else if caps.contains("OPEN") || caps.contains("NONE") || only_non_security_flags(&caps) {
        SecurityScheme::Open
    } else {
        SecurityScheme::Unknown
    }
}

/// Baseline risk tier for a capability string.
pub fn baseline(raw: &str) -> Severity {
    classify(raw).baseline_severity()
}

/// `[ESS][WPS]` and friends: every token is a known non-security flag.
fn only_non_security_flags(caps: &str) -> bool {
    let mut tokens = caps
        .split(|c: char| c == '[' || c == ']' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .peekable();
    tokens.peek().is_some() && tokens.all(|t| NON_SECURITY_FLAGS.contains(&t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_style_strings() {
        assert_eq!(classify("[WPA2-PSK-CCMP][ESS]"), SecurityScheme::Wpa2);
        assert_eq!(classify("[WPA-PSK-TKIP][ESS]"), SecurityScheme::Wpa);
        assert_eq!(classify("[WEP][ESS]"), SecurityScheme::Wep);
        assert_eq!(classify("[ESS]"), SecurityScheme::Open);
        assert_eq!(classify("[ESS][WPS]"), SecurityScheme::Open);
        assert_eq!(classify("[RSN-SAE-CCMP][ESS]"), SecurityScheme::Wpa3);
        assert_eq!(
            classify("[WPA2-PSK+SAE-CCMP][ESS]"),
            SecurityScheme::Wpa2Wpa3Transitional
        );
        assert_eq!(classify("[RSN-EAP-CCMP][ESS]"), SecurityScheme::Enterprise);
    }

    #[test]
    fn empty_is_open_and_garbage_is_unknown() {
        assert_eq!(classify(""), SecurityScheme::Open);
        assert_eq!(classify("   "), SecurityScheme::Open);
        assert_eq!(classify("[XYZ]"), SecurityScheme::Unknown);
        assert_eq!(classify("mystery"), SecurityScheme::Unknown);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify("wpa3-sae"), SecurityScheme::Wpa3);
        assert_eq!(classify("open"), SecurityScheme::Open);
        assert_eq!(classify("wep"), SecurityScheme::Wep);
    }

    #[test]
    fn priority_holds_pairwise() {
        let ordered = [
            ("WPA3", SecurityScheme::Wpa3),
            ("WPA2", SecurityScheme::Wpa2),
            ("WPA", SecurityScheme::Wpa),
            ("WEP", SecurityScheme::Wep),
            ("EAP", SecurityScheme::Enterprise),
            ("OPEN", SecurityScheme::Open),
        ];
        for (i, (hi, expected)) in ordered.iter().enumerate() {
            for (lo, _) in ordered.iter().skip(i + 1) {
                assert_eq!(classify(&format!("[{hi}][{lo}]")), *expected, "{hi}+{lo}");
                assert_eq!(classify(&format!("[{lo}][{hi}]")), *expected, "{lo}+{hi}");
            }
        }
    }

    #[test]
    fn wpa2_enterprise_resolves_by_priority() {
        assert_eq!(classify("[WPA2-EAP-CCMP]"), SecurityScheme::Wpa2);
    }

    #[test]
    fn baseline_follows_scheme() {
        assert_eq!(baseline(""), Severity::Critical);
        assert_eq!(baseline("[WPA3-SAE]"), Severity::Safe);
        assert_eq!(baseline("???"), Severity::Unknown);
    }
}
