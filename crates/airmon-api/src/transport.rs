// Transport configuration for building reqwest::Client instances.
//
// Every login starts from a fresh client and cookie jar, so the builder
// logic lives here rather than inline in the session code.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

const USER_AGENT: &str = concat!("airmon/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` bound to the given cookie jar.
    ///
    /// Certificate validation is disabled: airOS devices ship a
    /// self-signed certificate and there is no CA to pin against.
    pub fn build_client(&self, jar: &Arc<Jar>) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .cookie_provider(Arc::clone(jar))
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
