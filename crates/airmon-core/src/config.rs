// ── Runtime poller configuration ──
//
// Describes *what* to poll and *how often*. Carries credential data but
// never touches disk: `airmon-config` builds a `PollerConfig` and hands
// it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Configuration for polling a single device.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Device base URL (e.g., `https://192.168.1.20`).
    pub device: Url,
    pub username: String,
    pub password: SecretString,
    /// Fixed source identifier. When unset the device hostname is used.
    pub source_id: Option<String>,
    /// Nominal polling period, also the divisor for every derived rate.
    pub period: Duration,
    /// Derive per-second rates from counters.
    pub rates: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl PollerConfig {
    /// Reject configurations the poll loop cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.period.is_zero() {
            return Err(CoreError::Config {
                message: "polling period must be greater than zero".into(),
            });
        }
        if self.username.is_empty() {
            return Err(CoreError::Config {
                message: "device username must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Rate divisor in seconds.
    pub fn interval_secs(&self) -> f64 {
        self.period.as_secs_f64()
    }

    /// Source identifier used when the device hostname cannot be read.
    pub fn fallback_source(&self) -> String {
        self.device
            .host_str()
            .map_or_else(|| self.device.to_string(), str::to_owned)
    }
}
