// ── Snapshot envelope ──

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::Display;

/// The three resource collections polled every cycle.
///
/// Also the rate-tracking scope: counters from different kinds never share
/// state even when entity and metric names coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Status,
    Interfaces,
    Stations,
}

/// Shared header of every snapshot produced in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    /// Cycle start time.
    pub stamp: DateTime<Utc>,
    /// Device hostname, configured override, or device address.
    pub source: String,
}

/// One cycle's view of one resource kind.
///
/// `records` is sorted by each record's identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<T> {
    pub header: Header,
    pub records: Vec<T>,
}

impl<T> Snapshot<T> {
    pub fn new(header: Header, records: Vec<T>) -> Self {
        Self { header, records }
    }
}
