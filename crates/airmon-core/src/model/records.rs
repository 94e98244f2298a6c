// ── Outbound record types ──
//
// The field sets consumers receive per resource kind. Raw counters are
// passed through untouched; derived rates are optional and only present
// when a previous sample existed.

use std::net::IpAddr;

use serde::Serialize;

use super::mac_address::MacAddress;

/// Instantaneous wireless and host gauges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusRecord {
    /// Current transmit bitrate as reported (Mbit/s).
    pub tx_rate: f64,
    /// Current receive bitrate as reported (Mbit/s).
    pub rx_rate: f64,
    /// Client connection quality, percent.
    pub link_quality: f64,
    pub rssi: i32,
    /// Signal strength, dBm.
    pub signal: i32,
    pub cpu_load: f64,
}

/// Per-interface counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceRecord {
    pub name: String,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<InterfaceRates>,
}

/// Per-second deltas derived for an interface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterfaceRates {
    pub rx_bytes: f64,
    pub tx_bytes: f64,
    pub rx_packets: f64,
    pub tx_packets: f64,
}

/// One associated wireless station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub mac: MacAddress,
    pub name: String,
    pub last_ip: Option<IpAddr>,
    pub signal: i32,
    pub rssi: i32,
    /// Connection quality, percent.
    pub link_quality: f64,
    pub rx_packets: u64,
    pub rx_bytes: u64,
    /// Device-reported receive packet rate.
    pub rx_pps: u64,
    pub tx_packets: u64,
    pub tx_bytes: u64,
    /// Device-reported transmit packet rate.
    pub tx_pps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rates: Option<StationRates>,
}

/// Per-second byte deltas derived for a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationRates {
    pub rx_bytes: f64,
    pub tx_bytes: f64,
}
