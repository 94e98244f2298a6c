// ── Device-to-record conversions ──
//
// Bridges raw `airmon_api` responses into outbound records and applies the
// per-kind rate policies. Interfaces are all-or-nothing per cycle; stations
// are filtered one by one.

use std::collections::HashSet;
use std::net::IpAddr;

use airmon_api::device::{DeviceStatus, InterfaceEntry, InterfaceList, StationEntry};

use crate::model::{
    InterfaceRates, InterfaceRecord, MacAddress, ResourceKind, StationRates, StationRecord,
    StatusRecord,
};
use crate::rate::{RateKey, RateTracker};

// ── Helpers ────────────────────────────────────────────────────────

/// Counters fit in f64 exactly up to 2^53, far beyond any interface total
/// a device reports between reboots.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn counter(value: u64) -> f64 {
    value as f64
}

/// Device link quality arrives in tenths of a percent.
fn link_quality(ccq: u32) -> f64 {
    f64::from(ccq) / 10.0
}

/// Parse an optional string to an `IpAddr`, silently dropping unparseable values.
fn parse_ip(raw: Option<&str>) -> Option<IpAddr> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Borrowed rate state for one conversion.
///
/// `None` in place of a context means rate computation is disabled.
pub struct RateContext<'a> {
    pub tracker: &'a mut RateTracker,
    pub interval_secs: f64,
}

impl RateContext<'_> {
    fn observe(
        &mut self,
        scope: ResourceKind,
        entity: &str,
        metric: &'static str,
        value: u64,
    ) -> Option<f64> {
        self.tracker.observe(
            RateKey::new(scope, entity, metric),
            counter(value),
            self.interval_secs,
        )
    }

    /// Forget entities of `scope` that are absent from this fetch.
    fn forget_absent<'e>(&mut self, scope: ResourceKind, present: impl Iterator<Item = &'e str>) {
        let present: HashSet<&str> = present.collect();
        self.tracker.retain_entities(scope, |entity| present.contains(entity));
    }
}

// ── Status ─────────────────────────────────────────────────────────

impl From<&DeviceStatus> for StatusRecord {
    fn from(raw: &DeviceStatus) -> Self {
        Self {
            tx_rate: raw.wireless.txrate,
            rx_rate: raw.wireless.rxrate,
            link_quality: link_quality(raw.wireless.ccq),
            rssi: raw.wireless.rssi,
            signal: raw.wireless.signal,
            cpu_load: raw.host.cpuload,
        }
    }
}

// ── Interfaces ─────────────────────────────────────────────────────

fn interface_record(raw: InterfaceEntry) -> InterfaceRecord {
    let s = raw.stats;
    InterfaceRecord {
        name: raw.ifname,
        rx_bytes: s.rx_bytes,
        rx_packets: s.rx_packets,
        rx_errors: s.rx_errors,
        rx_multicast: s.rx_multicast,
        rx_dropped: s.rx_dropped,
        tx_bytes: s.tx_bytes,
        tx_packets: s.tx_packets,
        tx_errors: s.tx_errors,
        tx_multicast: s.tx_multicast,
        tx_dropped: s.tx_dropped,
        rates: None,
    }
}

fn interface_rates(ctx: &mut RateContext<'_>, rec: &InterfaceRecord) -> Option<InterfaceRates> {
    const SCOPE: ResourceKind = ResourceKind::Interfaces;
    // Observe every metric before combining so all four are stored on first sight.
    let rx_bytes = ctx.observe(SCOPE, &rec.name, "rx_bytes", rec.rx_bytes);
    let tx_bytes = ctx.observe(SCOPE, &rec.name, "tx_bytes", rec.tx_bytes);
    let rx_packets = ctx.observe(SCOPE, &rec.name, "rx_packets", rec.rx_packets);
    let tx_packets = ctx.observe(SCOPE, &rec.name, "tx_packets", rec.tx_packets);

    Some(InterfaceRates {
        rx_bytes: rx_bytes?,
        tx_bytes: tx_bytes?,
        rx_packets: rx_packets?,
        tx_packets: tx_packets?,
    })
}

/// Convert an interface list into records sorted by name.
///
/// With rates enabled, returns `None` when any interface lacks a previous
/// sample: the whole batch is withheld for this cycle. Counters are still
/// recorded, so the next cycle can publish. Interfaces missing from `raw`
/// lose their stored samples.
pub fn interface_records(
    raw: InterfaceList,
    mut rates: Option<RateContext<'_>>,
) -> Option<Vec<InterfaceRecord>> {
    let mut records: Vec<InterfaceRecord> =
        raw.interfaces.into_iter().map(interface_record).collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));

    let Some(ctx) = rates.as_mut() else {
        return Some(records);
    };
    ctx.forget_absent(ResourceKind::Interfaces, records.iter().map(|r| r.name.as_str()));

    let mut complete = true;
    for rec in &mut records {
        rec.rates = interface_rates(ctx, rec);
        complete &= rec.rates.is_some();
    }

    complete.then_some(records)
}

// ── Stations ───────────────────────────────────────────────────────

impl From<StationEntry> for StationRecord {
    fn from(raw: StationEntry) -> Self {
        let s = raw.stats;
        Self {
            mac: MacAddress::new(&raw.mac),
            name: raw.name,
            last_ip: parse_ip(raw.lastip.as_deref()),
            signal: raw.signal,
            rssi: raw.rssi,
            link_quality: link_quality(raw.ccq),
            rx_packets: s.rx_data,
            rx_bytes: s.rx_bytes,
            rx_pps: s.rx_pps,
            tx_packets: s.tx_data,
            tx_bytes: s.tx_bytes,
            tx_pps: s.tx_pps,
            rates: None,
        }
    }
}

fn station_rates(ctx: &mut RateContext<'_>, rec: &StationRecord) -> Option<StationRates> {
    const SCOPE: ResourceKind = ResourceKind::Stations;
    let mac = rec.mac.as_str();
    let rx_bytes = ctx.observe(SCOPE, mac, "rx_bytes", rec.rx_bytes);
    let tx_bytes = ctx.observe(SCOPE, mac, "tx_bytes", rec.tx_bytes);

    Some(StationRates {
        rx_bytes: rx_bytes?,
        tx_bytes: tx_bytes?,
    })
}

/// Convert a station list into records sorted by hardware address.
///
/// With rates enabled, stations seen for the first time are dropped from
/// the result; the second element counts them. Stations missing from `raw`
/// lose their stored samples, so a station that reassociates starts over.
pub fn station_records(
    raw: Vec<StationEntry>,
    mut rates: Option<RateContext<'_>>,
) -> (Vec<StationRecord>, usize) {
    let mut records: Vec<StationRecord> = raw.into_iter().map(StationRecord::from).collect();
    records.sort_by(|a, b| a.mac.cmp(&b.mac));

    let Some(ctx) = rates.as_mut() else {
        return (records, 0);
    };
    ctx.forget_absent(ResourceKind::Stations, records.iter().map(|r| r.mac.as_str()));

    let total = records.len();
    let kept: Vec<StationRecord> = records
        .into_iter()
        .filter_map(|mut rec| {
            rec.rates = Some(station_rates(ctx, &rec)?);
            Some(rec)
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use airmon_api::device::{InterfaceCounters, StationCounters};
    use serde_json::json;

    use super::*;

    fn iface(name: &str, rx_bytes: u64, tx_bytes: u64) -> InterfaceEntry {
        InterfaceEntry {
            ifname: name.into(),
            stats: InterfaceCounters {
                rx_bytes,
                tx_bytes,
                rx_packets: rx_bytes / 100,
                tx_packets: tx_bytes / 100,
                ..InterfaceCounters::default()
            },
        }
    }

    fn station(mac: &str, rx_bytes: u64, tx_bytes: u64) -> StationEntry {
        StationEntry {
            mac: mac.into(),
            name: format!("sta-{mac}"),
            lastip: Some("10.0.0.9".into()),
            signal: -60,
            rssi: 36,
            ccq: 955,
            stats: StationCounters {
                rx_bytes,
                tx_bytes,
                ..StationCounters::default()
            },
        }
    }

    fn with_rates(tracker: &mut RateTracker, interval_secs: f64) -> Option<RateContext<'_>> {
        Some(RateContext {
            tracker,
            interval_secs,
        })
    }

    fn list(entries: Vec<InterfaceEntry>) -> InterfaceList {
        InterfaceList {
            interfaces: entries,
        }
    }

    #[test]
    fn status_record_scales_link_quality() {
        let raw: DeviceStatus = serde_json::from_value(json!({
            "host": { "hostname": "ap", "cpuload": 7.5 },
            "wireless": { "txrate": "300", "rxrate": "270", "ccq": 945, "signal": -55, "rssi": 41 }
        }))
        .unwrap();

        let rec = StatusRecord::from(&raw);

        assert_eq!(rec.link_quality, 94.5);
        assert_eq!(rec.tx_rate, 300.0);
        assert_eq!(rec.rx_rate, 270.0);
        assert_eq!(rec.signal, -55);
        assert_eq!(rec.rssi, 41);
        assert_eq!(rec.cpu_load, 7.5);
    }

    #[test]
    fn interfaces_without_rates_are_sorted_and_never_suppressed() {
        let records =
            interface_records(list(vec![iface("wlan0", 1, 2), iface("eth0", 3, 4)]), None)
                .unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["eth0", "wlan0"]);
        assert!(records.iter().all(|r| r.rates.is_none()));
    }

    #[test]
    fn first_interface_batch_is_suppressed_then_published() {
        let mut tracker = RateTracker::new();

        let first = interface_records(
            list(vec![iface("eth0", 1_000, 500)]),
            with_rates(&mut tracker, 5.0),
        );
        assert!(first.is_none());

        let second = interface_records(
            list(vec![iface("eth0", 6_000, 1_500)]),
            with_rates(&mut tracker, 5.0),
        )
        .unwrap();
        let rates = second[0].rates.unwrap();
        assert_eq!(rates.rx_bytes, 1_000.0);
        assert_eq!(rates.tx_bytes, 200.0);
        assert_eq!(rates.rx_packets, 10.0);
        assert_eq!(rates.tx_packets, 2.0);
    }

    #[test]
    fn one_new_interface_suppresses_the_whole_batch() {
        let mut tracker = RateTracker::new();

        interface_records(
            list(vec![iface("eth0", 10, 10)]),
            with_rates(&mut tracker, 1.0),
        );
        let batch = interface_records(
            list(vec![iface("eth0", 20, 20), iface("ath0", 5, 5)]),
            with_rates(&mut tracker, 1.0),
        );
        assert!(batch.is_none());

        // ath0 was recorded while suppressed, so the next batch is complete.
        let batch = interface_records(
            list(vec![iface("eth0", 30, 30), iface("ath0", 15, 15)]),
            with_rates(&mut tracker, 1.0),
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].name, "ath0");
        assert_eq!(batch[0].rates.unwrap().rx_bytes, 10.0);
    }

    #[test]
    fn new_station_is_dropped_alone() {
        let mut tracker = RateTracker::new();

        station_records(
            vec![station("00:00:00:00:00:0B", 100, 100)],
            with_rates(&mut tracker, 2.0),
        );

        let (records, dropped) = station_records(
            vec![
                station("00:00:00:00:00:0b", 300, 500),
                station("00:00:00:00:00:0a", 1, 1),
            ],
            with_rates(&mut tracker, 2.0),
        );

        assert_eq!(dropped, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mac.as_str(), "00:00:00:00:00:0b");
        let rates = records[0].rates.unwrap();
        assert_eq!(rates.rx_bytes, 100.0);
        assert_eq!(rates.tx_bytes, 200.0);
    }

    #[test]
    fn departed_station_starts_over_when_it_returns() {
        let mut tracker = RateTracker::new();
        let roamer = "00:00:00:00:00:0c";
        let anchor = "00:00:00:00:00:0d";

        station_records(
            vec![station(roamer, 100, 100), station(anchor, 100, 100)],
            with_rates(&mut tracker, 1.0),
        );
        // The roamer leaves; its samples go with it.
        station_records(
            vec![station(anchor, 200, 200)],
            with_rates(&mut tracker, 1.0),
        );
        assert_eq!(tracker.len(), 2);

        let (records, dropped) = station_records(
            vec![station(roamer, 90_000, 90_000), station(anchor, 300, 300)],
            with_rates(&mut tracker, 1.0),
        );

        assert_eq!(dropped, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mac.as_str(), anchor);
        assert_eq!(records[0].rates.unwrap().rx_bytes, 100.0);
    }

    #[test]
    fn removed_interface_is_forgotten() {
        let mut tracker = RateTracker::new();

        interface_records(
            list(vec![iface("eth0", 10, 10), iface("ath0", 10, 10)]),
            with_rates(&mut tracker, 1.0),
        );
        let batch = interface_records(
            list(vec![iface("eth0", 20, 20)]),
            with_rates(&mut tracker, 1.0),
        )
        .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(tracker.len(), 4);

        // ath0 comes back with no history, so the batch is withheld again.
        let batch = interface_records(
            list(vec![iface("eth0", 30, 30), iface("ath0", 5_000, 5_000)]),
            with_rates(&mut tracker, 1.0),
        );
        assert!(batch.is_none());
    }

    #[test]
    fn stations_without_rates_keep_everyone_sorted() {
        let (records, dropped) = station_records(
            vec![
                station("00:00:00:00:00:02", 1, 1),
                station("00:00:00:00:00:01", 1, 1),
            ],
            None,
        );

        assert_eq!(dropped, 0);
        let macs: Vec<&str> = records.iter().map(|r| r.mac.as_str()).collect();
        assert_eq!(macs, ["00:00:00:00:00:01", "00:00:00:00:00:02"]);
        assert_eq!(records[0].link_quality, 95.5);
        assert_eq!(records[0].last_ip, Some("10.0.0.9".parse().unwrap()));
    }

    #[test]
    fn unparseable_station_ip_is_dropped() {
        let mut raw = station("00:00:00:00:00:01", 1, 1);
        raw.lastip = Some("n/a".into());
        let rec = StationRecord::from(raw);
        assert_eq!(rec.last_ip, None);
    }
}
