// airmon-api: Async session client for the airOS device HTTP management API

pub mod auth;
pub mod device;
pub mod error;
pub mod retry;
pub mod transport;

pub use auth::{Credentials, Endpoint};
pub use device::{ApiResponse, SessionClient};
pub use error::Error;
pub use retry::{MAX_ATTEMPTS, retry_with_reauth};
pub use transport::TransportConfig;
