// ── Core error types ──
//
// Errors the poller reports per resource kind. Consumers never see raw
// HTTP exchanges; the `From<airmon_api::Error>` impl folds transport-layer
// failures into the auth / request / transform taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Request errors ───────────────────────────────────────────────
    #[error("Cannot reach device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request failed: {message}")]
    Request {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected {resource} payload: {message}")]
    Transform { resource: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Attach the resource kind to a decoding failure.
    ///
    /// Errors raised below the poller do not know which snapshot they
    /// belonged to; other variants pass through unchanged.
    pub fn for_resource(self, resource: impl std::fmt::Display) -> Self {
        match self {
            Self::Transform { message, .. } => Self::Transform {
                resource: resource.to_string(),
                message,
            },
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<airmon_api::Error> for CoreError {
    fn from(err: airmon_api::Error) -> Self {
        match err {
            airmon_api::Error::Authentication { .. } => CoreError::AuthenticationFailed {
                message: err.to_string(),
            },
            airmon_api::Error::SessionExpired { status } => CoreError::Request {
                message: "session expired".into(),
                status: Some(status),
            },
            airmon_api::Error::Http {
                status,
                path,
                message,
            } => CoreError::Request {
                message: format!("{path}: {message}"),
                status: Some(status),
            },
            airmon_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Request {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            airmon_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            airmon_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            airmon_api::Error::Deserialization { message, body: _ } => CoreError::Transform {
                resource: "device".into(),
                message,
            },
        }
    }
}
