// ── Station identity ──
//
// Stations are keyed by hardware address everywhere: snapshot ordering,
// rate tracking and the outbound record. Normalizing once here keeps the
// device's casing and separator choice from splitting one station in two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
///
/// Ordering is plain string ordering of the normalized form, which sorts
/// addresses numerically since every octet is two hex digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated or dash-separated input in any case.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_normalizes_dashes() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_normalizes_case() {
        let mac = MacAddress::new("AA:BB:CC:DD:EE:FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_orders_regardless_of_input_case() {
        let mut macs = vec![
            MacAddress::new("00:27:22:FF:00:01"),
            MacAddress::new("00:27:22:0a:00:01"),
            MacAddress::new("00-15-6D-00-00-01"),
        ];
        macs.sort();
        let sorted: Vec<&str> = macs.iter().map(MacAddress::as_str).collect();
        assert_eq!(
            sorted,
            ["00:15:6d:00:00:01", "00:27:22:0a:00:01", "00:27:22:ff:00:01"]
        );
    }

    #[test]
    fn mac_address_serializes_as_plain_string() {
        let json = serde_json::to_string(&MacAddress::new("AA:BB:CC:DD:EE:FF")).unwrap();
        assert_eq!(json, "\"aa:bb:cc:dd:ee:ff\"");
    }
}
