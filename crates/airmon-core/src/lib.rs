//! Polling, rate derivation and snapshot publication for one airOS device.
//!
//! - **[`Poller`]** drives the cycle: resolve the source identifier, fetch
//!   status, interfaces and stations through an
//!   [`airmon_api::SessionClient`], convert them into records and publish
//!   them. [`Poller::poll_once`] runs one cycle and returns a
//!   [`CycleReport`]; [`Poller::run`] loops until cancelled.
//!
//! - **[`RateTracker`]** turns monotonic counters into per-second rates,
//!   keyed by resource kind, entity and metric.
//!
//! - **Sinks** ([`SnapshotSink`], [`BroadcastSink`]) carry snapshots to
//!   consumers. A kind nobody subscribes to is never fetched.
//!
//! - **Domain model** ([`model`]): [`Snapshot`], [`Header`] and the
//!   per-kind record types.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod poller;
pub mod rate;
pub mod sink;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::PollerConfig;
pub use error::CoreError;
pub use poller::{CycleReport, Outcome, Poller};
pub use rate::{RateKey, RateTracker};
pub use sink::{BroadcastSink, Sinks, SnapshotSink};

pub use model::{
    Header, InterfaceRates, InterfaceRecord, MacAddress, ResourceKind, Snapshot, StationRates,
    StationRecord, StatusRecord,
};
