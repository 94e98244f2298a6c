// Bounded retry around session expiry.
//
// The device signals an expired session through the response shape, not a
// dedicated status, so the classification happens in the client and this
// module only decides how many times to re-authenticate.

use std::future::Future;

use tracing::debug;

use crate::error::Error;

/// Total attempts for a request whose session may have expired:
/// the original request plus one retry after re-login.
pub const MAX_ATTEMPTS: u32 = 2;

/// Run `op`, re-authenticating with `reauth` whenever it reports
/// [`Error::SessionExpired`] and attempts remain.
///
/// Returns the outcome of the last attempt unchanged, so a session that is
/// still rejected after `max_attempts` comes back as `SessionExpired`.
/// A failing `reauth` aborts immediately with its own error.
pub async fn retry_with_reauth<T, Op, OpFut, Reauth, ReauthFut>(
    max_attempts: u32,
    mut op: Op,
    mut reauth: Reauth,
) -> Result<T, Error>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, Error>>,
    Reauth: FnMut() -> ReauthFut,
    ReauthFut: Future<Output = Result<(), Error>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(Error::SessionExpired { status }) if attempt < max_attempts => {
                debug!(attempt, status, "session expired, re-authenticating");
                reauth().await?;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}
