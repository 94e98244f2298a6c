use thiserror::Error;

/// Top-level error type for the `airmon-api` crate.
///
/// Covers every failure mode of a device session: login, HTTP status,
/// transport and response decoding. `airmon-core` maps these into
/// per-resource diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login was answered with something other than the JSON landing page.
    ///
    /// `preview` holds at most the first 100 bytes of the response body.
    #[error("Authentication failed: unexpected content type {content_type:?} (body: {preview:?})")]
    Authentication {
        content_type: String,
        preview: String,
    },

    /// The device no longer honours the session cookie.
    ///
    /// Internal signal: `SessionClient::get` absorbs it with a single
    /// re-login, and surfaces `Http` once the retry is exhausted.
    #[error("Session expired (HTTP {status})")]
    SessionExpired { status: u16 },

    // ── Request ─────────────────────────────────────────────────────
    /// Non-success HTTP status from an API endpoint.
    #[error("HTTP {status} from {path}: {message}")]
    Http {
        status: u16,
        path: String,
        message: String,
    },

    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for login failures (`AuthError`).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` for request-level failures (`RequestError`),
    /// including a session that stayed expired after the retry.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::SessionExpired { .. }
                | Self::Transport(_)
                | Self::InvalidUrl(_)
                | Self::Tls(_)
        )
    }

    /// Returns `true` if the response arrived but could not be decoded.
    pub fn is_transform_failure(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}
