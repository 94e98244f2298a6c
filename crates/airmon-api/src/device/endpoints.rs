// Typed device endpoints
//
// Thin wrappers over `SessionClient::get` that decode each CGI response
// into its raw model.

use tracing::debug;

use crate::auth::Endpoint;
use crate::device::client::SessionClient;
use crate::device::models::{DeviceStatus, InterfaceList, StationEntry};
use crate::error::Error;

impl SessionClient {
    /// Fetch host and wireless gauges.
    ///
    /// `GET status.cgi`
    pub async fn status(&self) -> Result<DeviceStatus, Error> {
        debug!("fetching status");
        self.get(Endpoint::Status.path()).await?.json()
    }

    /// Fetch per-interface counters.
    ///
    /// `GET iflist.cgi`
    pub async fn interfaces(&self) -> Result<InterfaceList, Error> {
        debug!("fetching interface list");
        self.get(Endpoint::Interfaces.path()).await?.json()
    }

    /// Fetch associated stations.
    ///
    /// `GET sta.cgi`. The body is a bare JSON array.
    pub async fn stations(&self) -> Result<Vec<StationEntry>, Error> {
        debug!("fetching station list");
        self.get(Endpoint::Stations.path()).await?.json()
    }
}
