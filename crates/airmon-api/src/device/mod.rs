pub mod auth;
pub mod client;
pub mod endpoints;
pub mod models;

pub use client::{ApiResponse, SessionClient};
pub use models::{
    DeviceStatus, HostStatus, InterfaceCounters, InterfaceEntry, InterfaceList, StationCounters,
    StationEntry, WirelessStatus,
};
