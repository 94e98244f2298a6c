// ── Counter-to-rate tracking ──
//
// Turns monotonically increasing device counters into per-second rates by
// remembering the previous sample of every (scope, entity, metric) key.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::time::Instant;

use tracing::trace;

use crate::model::ResourceKind;

/// Identity of one tracked counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey {
    scope: ResourceKind,
    entity: String,
    metric: &'static str,
}

impl RateKey {
    pub fn new(scope: ResourceKind, entity: impl Into<String>, metric: &'static str) -> Self {
        Self {
            scope,
            entity: entity.into(),
            metric,
        }
    }

    pub fn scope(&self) -> ResourceKind {
        self.scope
    }
}

impl fmt::Display for RateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.scope, self.entity, self.metric)
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    value: f64,
    observed_at: Instant,
}

/// Previous-sample store for every tracked counter.
///
/// Rates are divided by the nominal polling interval, not the measured gap
/// between samples, so identical counter sequences always give identical
/// rates. Counter resets are not special-cased and show up as negative
/// rates.
///
/// Entities that leave a scope are forgotten via [`RateTracker::retain_entities`],
/// so one that returns later starts over instead of reporting the counter
/// growth of its whole absence as a single-period rate.
#[derive(Debug, Default)]
pub struct RateTracker {
    samples: HashMap<RateKey, Sample>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `key` and return the rate since the previous sample.
    ///
    /// Returns `None` the first time a key is seen.
    pub fn observe(&mut self, key: RateKey, value: f64, interval_secs: f64) -> Option<f64> {
        let now = Instant::now();
        let sample = Sample {
            value,
            observed_at: now,
        };

        match self.samples.entry(key) {
            Entry::Vacant(slot) => {
                trace!(key = %slot.key(), value, "first sample");
                slot.insert(sample);
                None
            }
            Entry::Occupied(mut slot) => {
                let previous = slot.insert(sample);
                let rate = (value - previous.value) / interval_secs;
                trace!(
                    key = %slot.key(),
                    rate,
                    gap = ?now.duration_since(previous.observed_at),
                    nominal_secs = interval_secs,
                    "rate sample"
                );
                Some(rate)
            }
        }
    }

    /// Forget every counter under `scope`. Returns how many were dropped.
    pub fn reset(&mut self, scope: ResourceKind) -> usize {
        let before = self.samples.len();
        self.samples.retain(|key, _| key.scope != scope);
        before - self.samples.len()
    }

    /// Forget every counter under `scope` whose entity fails `keep`.
    /// Returns how many were dropped.
    pub fn retain_entities(&mut self, scope: ResourceKind, keep: impl Fn(&str) -> bool) -> usize {
        let before = self.samples.len();
        self.samples.retain(|key, _| key.scope != scope || keep(&key.entity));
        let dropped = before - self.samples.len();
        if dropped > 0 {
            trace!(%scope, dropped, "forgot departed entities");
        }
        dropped
    }

    /// Number of tracked counters across all scopes.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
