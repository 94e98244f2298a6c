// ── Domain model ──

pub mod mac_address;
pub mod records;
pub mod snapshot;

pub use mac_address::MacAddress;
pub use records::{InterfaceRates, InterfaceRecord, StationRates, StationRecord, StatusRecord};
pub use snapshot::{Header, ResourceKind, Snapshot};
