// Device form login
//
// airOS authenticates through `login.cgi`: a priming GET hands out the
// pre-auth session cookie, then a multipart POST submits the credentials.
// A good login redirects to the JSON status page; a bad one re-renders
// the HTML login form.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::auth::Endpoint;
use crate::device::client::{JSON_CONTENT_TYPE, SessionClient, content_type_of, preview};
use crate::error::Error;

/// Fixed multipart boundary. The device only needs a boundary that never
/// occurs inside the submitted field values.
const MULTIPART_BOUNDARY: &str = "----airmonFormBoundaryq8vKjZ3uH2rXw5Tn";

/// Bytes of a rejected login body kept for diagnostics.
const LOGIN_PREVIEW_LEN: usize = 100;

/// Encode `fields` as a `multipart/form-data` body delimited by
/// [`MULTIPART_BOUNDARY`].
fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str("--");
        body.push_str(MULTIPART_BOUNDARY);
        body.push_str("\r\nContent-Disposition: form-data; name=\"");
        body.push_str(name);
        body.push_str("\"\r\n\r\n");
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str("--");
    body.push_str(MULTIPART_BOUNDARY);
    body.push_str("--\r\n");
    body
}

impl SessionClient {
    /// Authenticate against the device with the configured credentials.
    ///
    /// Always starts from a clean session: the previous client and its
    /// cookie jar are dropped before the priming request. Success iff the
    /// login response is served as exactly `application/json`; anything
    /// else is [`Error::Authentication`] and leaves the session
    /// unauthenticated.
    pub async fn login(&self) -> Result<(), Error> {
        let http = self.transport().build_client(&Arc::new(Jar::default()))?;
        self.reset_session(http.clone());

        let url = self.endpoint_url(Endpoint::Login.path())?;
        debug!("priming login at {}", url);

        let _primer = http
            .get(url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let credentials = self.credentials();
        let body = multipart_body(&[
            ("uri", Endpoint::login_target()),
            ("username", &credentials.username),
            ("password", credentials.password.expose_secret()),
        ]);

        debug!(username = %credentials.username, "submitting login form");
        let resp = http
            .post(url)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let content_type = content_type_of(&resp).unwrap_or_default();
        if content_type != JSON_CONTENT_TYPE {
            let body = resp.bytes().await.unwrap_or_default();
            warn!(%content_type, "login rejected");
            return Err(Error::Authentication {
                content_type,
                preview: preview(&body, LOGIN_PREVIEW_LEN),
            });
        }

        self.set_authenticated(true);
        info!(device = %self.base_url(), "logged in");
        Ok(())
    }

    /// End the current session. Best effort: the local session is marked
    /// unauthenticated whether or not the device answers.
    pub async fn logout(&self) -> Result<(), Error> {
        self.set_authenticated(false);

        let url = self.endpoint_url(Endpoint::Logout.path())?;
        debug!("logging out at {}", url);

        let _resp = self.http().get(url).send().await.map_err(Error::Transport)?;

        debug!("logout complete");
        Ok(())
    }
}
