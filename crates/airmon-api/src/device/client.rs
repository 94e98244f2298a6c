// Device session client
//
// Owns the cookie-based session against one device and turns raw HTTP
// exchanges into classified responses. Login lives in `auth.rs`, typed
// endpoints in `endpoints.rs`; this module keeps the session state and
// the request path that hides expiry from callers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::cookie::Jar;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::retry::{MAX_ATTEMPTS, retry_with_reauth};
use crate::transport::TransportConfig;

/// The only content type the device labels its JSON with.
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// A fully buffered device response.
///
/// The body is read eagerly because expiry detection needs its first byte,
/// and the caller usually decodes it right after.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Bytes,
}

impl ApiResponse {
    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status();
        let content_type = content_type_of(&resp);
        let body = resp.bytes().await.map_err(Error::Transport)?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decode the body as JSON, keeping a preview of the raw text on failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| {
            let preview = preview(&self.body, 200);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: String::from_utf8_lossy(&self.body).into_owned(),
            }
        })
    }

    /// Whether this response means the device dropped our session.
    ///
    /// A 403 always does. Otherwise a non-JSON content type does too,
    /// unless the body is a bare JSON array: `sta.cgi` serves its array
    /// with the wrong content type and must not trigger a re-login.
    pub fn is_session_expired(&self) -> bool {
        if self.status == StatusCode::FORBIDDEN {
            return true;
        }
        self.content_type() != Some(JSON_CONTENT_TYPE) && self.body.first() != Some(&b'[')
    }
}

/// Lossy UTF-8 rendering of at most `limit` leading bytes of a body.
pub(crate) fn preview(body: &[u8], limit: usize) -> String {
    String::from_utf8_lossy(&body[..body.len().min(limit)]).into_owned()
}

pub(crate) fn content_type_of(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Per-login session state. Replaced wholesale on every login.
struct Session {
    http: reqwest::Client,
    authenticated: bool,
}

/// Authenticated HTTP client for one device's CGI API.
///
/// Starts unauthenticated. [`get`](Self::get) logs in on demand and
/// re-authenticates once when the device reports an expired session, so
/// callers only ever see success or a final error.
pub struct SessionClient {
    base_url: Url,
    credentials: Credentials,
    transport: TransportConfig,
    session: Mutex<Session>,
}

impl SessionClient {
    /// Create an unauthenticated client. No network traffic happens here.
    ///
    /// `base_url` is the device root, e.g. `https://192.168.1.20`.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(&Arc::new(Jar::default()))?;
        Ok(Self {
            base_url,
            credentials,
            transport,
            session: Mutex::new(Session {
                http,
                authenticated: false,
            }),
        })
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Whether the last login succeeded and no response has invalidated it since.
    pub fn is_authenticated(&self) -> bool {
        self.lock_session().authenticated
    }

    // ── Session state ────────────────────────────────────────────────

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The HTTP client of the current session.
    pub(crate) fn http(&self) -> reqwest::Client {
        self.lock_session().http.clone()
    }

    /// Swap in a fresh client, dropping the old cookie jar.
    pub(crate) fn reset_session(&self, http: reqwest::Client) {
        let mut session = self.lock_session();
        session.http = http;
        session.authenticated = false;
    }

    pub(crate) fn set_authenticated(&self, authenticated: bool) {
        self.lock_session().authenticated = authenticated;
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}` for a CGI endpoint.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
    }

    // ── Request path ─────────────────────────────────────────────────

    /// GET `{base}/{path}` with the current session.
    ///
    /// Logs in first when unauthenticated. A response classified as an
    /// expired session triggers one re-login and one retry; if the retry is
    /// rejected too, the result is [`Error::Http`]. Other error statuses are
    /// returned without retrying.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, Error> {
        if !self.is_authenticated() {
            self.login().await?;
        }

        let outcome =
            retry_with_reauth(MAX_ATTEMPTS, move || self.get_once(path), move || self.relogin())
                .await;

        match outcome {
            Err(Error::SessionExpired { status }) => {
                self.set_authenticated(false);
                Err(Error::Http {
                    status,
                    path: path.to_owned(),
                    message: "session still rejected after re-login".into(),
                })
            }
            other => other,
        }
    }

    /// One GET attempt, classified but never retried.
    async fn get_once(&self, path: &str) -> Result<ApiResponse, Error> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let resp = ApiResponse::read(resp).await?;
        trace!(
            status = resp.status().as_u16(),
            content_type = resp.content_type().unwrap_or(""),
            len = resp.body().len(),
            "response"
        );

        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            return Err(Error::SessionExpired {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                path: path.to_owned(),
                message: preview(resp.body(), 200),
            });
        }

        if resp.is_session_expired() {
            return Err(Error::SessionExpired {
                status: status.as_u16(),
            });
        }

        Ok(resp)
    }

    async fn relogin(&self) -> Result<(), Error> {
        self.set_authenticated(false);
        self.login().await
    }
}
