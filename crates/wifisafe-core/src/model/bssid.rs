// ── Access point hardware address ──
//
// A BSSID is the MAC address of a single access point radio. Scan sources
// hand us whatever spelling the platform produced; `Bssid` normalizes it
// but does not reject anything. Rejection is the validator's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// BSSID, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Bssid(String);

impl Bssid {
    /// Create a normalized BSSID from any common format.
    /// Accepts colon-separated or dash-separated, any letter case.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the six octets. `None` unless the address is exactly six
    /// two-digit hex groups.
    pub fn octets(&self) -> Option<[u8; 6]> {
        let mut out = [0u8; 6];
        let mut groups = self.0.split(':');
        for slot in &mut out {
            let group = groups.next()?;
            if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            *slot = u8::from_str_radix(group, 16).ok()?;
        }
        if groups.next().is_some() {
            return None;
        }
        Some(out)
    }

    /// Group/multicast bit (least-significant bit of the first octet).
    pub fn is_multicast(&self) -> bool {
        self.octets().is_some_and(|o| o[0] & 0x01 == 0x01)
    }

    /// First four octets. Access points from one vendor block share these.
    pub fn vendor_block(&self) -> Option<[u8; 4]> {
        self.octets().map(|o| [o[0], o[1], o[2], o[3]])
    }

    /// Last two octets as a big-endian integer, used to spot sequential
    /// address runs inside a vendor block.
    pub fn device_suffix(&self) -> Option<u16> {
        self.octets().map(|o| u16::from_be_bytes([o[4], o[5]]))
    }
}

impl fmt::Display for Bssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Bssid {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for Bssid {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Bssid {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Bssid> for String {
    fn from(b: Bssid) -> Self {
        b.0
    }
}
