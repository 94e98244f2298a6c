// Raw response shapes of the device CGI endpoints.
//
// These mirror the firmware JSON closely; `airmon-core` converts them into
// outbound records. Required fields are the ones a record cannot be built
// without, so a firmware that drops them fails decoding loudly.

use serde::{Deserialize, Deserializer};

/// Accept a number or a numeric string. Some firmware versions quote
/// the wireless bitrates (`"txrate": "144.4"`).
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ── status.cgi ──────────────────────────────────────────────────────

/// `GET status.cgi`
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatus {
    pub host: HostStatus,
    pub wireless: WirelessStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostStatus {
    #[serde(default)]
    pub hostname: Option<String>,
    pub cpuload: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirelessStatus {
    #[serde(deserialize_with = "lenient_f64")]
    pub txrate: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub rxrate: f64,
    /// Link quality in tenths of a percent.
    pub ccq: u32,
    pub signal: i32,
    pub rssi: i32,
}

// ── iflist.cgi ──────────────────────────────────────────────────────

/// `GET iflist.cgi`
#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceList {
    pub interfaces: Vec<InterfaceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterfaceEntry {
    pub ifname: String,
    #[serde(default)]
    pub stats: InterfaceCounters,
}

/// Monotonic per-interface counters. Absent counters read as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errors: u64,
    pub rx_multicast: u64,
    pub rx_dropped: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    pub tx_multicast: u64,
    pub tx_dropped: u64,
}

// ── sta.cgi ─────────────────────────────────────────────────────────

/// One element of the bare array returned by `GET sta.cgi`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationEntry {
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastip: Option<String>,
    pub signal: i32,
    pub rssi: i32,
    /// Link quality in tenths of a percent.
    pub ccq: u32,
    #[serde(default)]
    pub stats: StationCounters,
}

/// Station traffic counters. `*_data` are packet counts, `*_pps` the
/// device's own instantaneous packet rates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StationCounters {
    pub rx_data: u64,
    pub rx_bytes: u64,
    pub rx_pps: u64,
    pub tx_data: u64,
    pub tx_bytes: u64,
    pub tx_pps: u64,
}
