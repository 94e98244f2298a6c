// ── Poll loop ──
//
// One cycle: resolve the source identifier, stamp a shared header, then
// fetch, transform and publish status, interfaces and stations in order.
// A failure in one kind never affects the other two.

use std::fmt;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use airmon_api::{Credentials, SessionClient, TransportConfig};

use crate::config::PollerConfig;
use crate::convert::{RateContext, interface_records, station_records};
use crate::error::CoreError;
use crate::model::{Header, ResourceKind, Snapshot, StatusRecord};
use crate::rate::RateTracker;
use crate::sink::Sinks;

// ── CycleReport ──────────────────────────────────────────────────

/// What happened to one resource kind during a cycle.
#[derive(Debug)]
pub enum Outcome {
    /// A snapshot went out carrying this many records.
    Published { records: usize },
    /// Fetched, but withheld because some rates were not yet available.
    Suppressed,
    /// Nobody was listening; nothing fetched and the rate scope was reset.
    Skipped,
    /// Fetch or transform failed. Nothing published for this kind.
    Failed(CoreError),
}

impl Outcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published { records } => write!(f, "published {records}"),
            Self::Suppressed => f.write_str("suppressed"),
            Self::Skipped => f.write_str("skipped"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Per-kind results of one [`Poller::poll_once`] call.
#[derive(Debug)]
pub struct CycleReport {
    pub header: Header,
    pub status: Outcome,
    pub interfaces: Outcome,
    pub stations: Outcome,
}

// ── Poller ───────────────────────────────────────────────────────

/// Periodic poller for a single device.
///
/// Owns the session client and the rate tracker; nothing is shared with
/// other tasks except through the sinks.
pub struct Poller {
    client: SessionClient,
    config: PollerConfig,
    sinks: Sinks,
    rates: RateTracker,
    source: Option<String>,
}

impl Poller {
    /// Validate `config` and build an unauthenticated client for it.
    pub fn new(config: PollerConfig, sinks: Sinks) -> Result<Self, CoreError> {
        config.validate()?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = SessionClient::new(config.device.clone(), credentials, transport)?;

        Ok(Self::with_client(client, config, sinks))
    }

    /// Use an already constructed client. `config.device` is only used for
    /// the fallback source identifier.
    pub fn with_client(client: SessionClient, config: PollerConfig, sinks: Sinks) -> Self {
        let source = config.source_id.clone();
        Self {
            client,
            config,
            sinks,
            rates: RateTracker::new(),
            source,
        }
    }

    /// The resolved source identifier, once known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn rates(&self) -> &RateTracker {
        &self.rates
    }

    /// Run cycles until `cancel` fires, then log out.
    ///
    /// Cancellation is checked between cycles and interrupts the sleep; an
    /// in-flight cycle always completes.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            device = %self.config.device,
            period = ?self.config.period,
            rates = self.config.rates,
            "poller started"
        );

        while !cancel.is_cancelled() {
            let report = self.poll_once().await;
            debug!(
                source = %report.header.source,
                status = %report.status,
                interfaces = %report.interfaces,
                stations = %report.stations,
                "cycle complete"
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.config.period) => {}
            }
        }

        if self.client.is_authenticated() {
            if let Err(e) = self.client.logout().await {
                debug!(error = %e, "logout failed");
            }
        }
        info!("poller stopped");
    }

    /// Run exactly one cycle.
    pub async fn poll_once(&mut self) -> CycleReport {
        let stamp = Utc::now();
        let source = self.resolve_source().await;
        let header = Header { stamp, source };

        let status = self.poll_status(&header).await;
        log_failure(ResourceKind::Status, &status);

        let interfaces = self.poll_interfaces(&header).await;
        log_failure(ResourceKind::Interfaces, &interfaces);

        let stations = self.poll_stations(&header).await;
        log_failure(ResourceKind::Stations, &stations);

        CycleReport {
            header,
            status,
            interfaces,
            stations,
        }
    }

    // ── Source identifier ────────────────────────────────────────

    /// Resolved once: an override, the device hostname, or the device
    /// address when the hostname is unavailable.
    async fn resolve_source(&mut self) -> String {
        if let Some(source) = &self.source {
            return source.clone();
        }

        let source = match self.client.status().await {
            Ok(status) => match status.host.hostname.filter(|h| !h.trim().is_empty()) {
                Some(hostname) => {
                    info!(hostname = %hostname, "resolved device hostname");
                    hostname
                }
                None => {
                    let fallback = self.config.fallback_source();
                    warn!(source = %fallback, "device reports no hostname, using address");
                    fallback
                }
            },
            Err(e) => {
                let fallback = self.config.fallback_source();
                warn!(source = %fallback, error = %e, "hostname lookup failed, using address");
                fallback
            }
        };

        self.source = Some(source.clone());
        source
    }

    // ── Per-kind polling ─────────────────────────────────────────

    /// Reset and report `true` when a kind has no consumers.
    fn skip_unobserved(&mut self, kind: ResourceKind, subscribers: usize) -> bool {
        if subscribers > 0 {
            return false;
        }
        let dropped = self.rates.reset(kind);
        debug!(resource = %kind, dropped, "no subscribers, skipping");
        true
    }

    fn rate_context(&mut self) -> Option<RateContext<'_>> {
        if !self.config.rates {
            return None;
        }
        Some(RateContext {
            tracker: &mut self.rates,
            interval_secs: self.config.interval_secs(),
        })
    }

    async fn poll_status(&mut self, header: &Header) -> Outcome {
        const KIND: ResourceKind = ResourceKind::Status;
        if self.skip_unobserved(KIND, self.sinks.status.subscriber_count()) {
            return Outcome::Skipped;
        }

        let raw = match self.client.status().await {
            Ok(raw) => raw,
            Err(e) => return Outcome::Failed(CoreError::from(e).for_resource(KIND)),
        };

        let snapshot = Snapshot::new(header.clone(), vec![StatusRecord::from(&raw)]);
        self.sinks.status.publish(snapshot);
        Outcome::Published { records: 1 }
    }

    async fn poll_interfaces(&mut self, header: &Header) -> Outcome {
        const KIND: ResourceKind = ResourceKind::Interfaces;
        if self.skip_unobserved(KIND, self.sinks.interfaces.subscriber_count()) {
            return Outcome::Skipped;
        }

        let raw = match self.client.interfaces().await {
            Ok(raw) => raw,
            Err(e) => return Outcome::Failed(CoreError::from(e).for_resource(KIND)),
        };

        let Some(records) = interface_records(raw, self.rate_context()) else {
            debug!(resource = %KIND, "rates incomplete, snapshot withheld");
            return Outcome::Suppressed;
        };

        let count = records.len();
        self.sinks
            .interfaces
            .publish(Snapshot::new(header.clone(), records));
        Outcome::Published { records: count }
    }

    async fn poll_stations(&mut self, header: &Header) -> Outcome {
        const KIND: ResourceKind = ResourceKind::Stations;
        if self.skip_unobserved(KIND, self.sinks.stations.subscriber_count()) {
            return Outcome::Skipped;
        }

        let raw = match self.client.stations().await {
            Ok(raw) => raw,
            Err(e) => return Outcome::Failed(CoreError::from(e).for_resource(KIND)),
        };

        let (records, dropped) = station_records(raw, self.rate_context());
        if dropped > 0 {
            debug!(resource = %KIND, dropped, "stations without rates left out");
        }

        let count = records.len();
        self.sinks
            .stations
            .publish(Snapshot::new(header.clone(), records));
        Outcome::Published { records: count }
    }
}

fn log_failure(kind: ResourceKind, outcome: &Outcome) {
    if let Outcome::Failed(e) = outcome {
        warn!(resource = %kind, error = %e, "poll failed");
    }
}
