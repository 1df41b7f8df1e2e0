//! Persistence of device records.

mod schema;
mod sql;

pub use sql::SqlDeviceStore;

use crate::error::DeviceError;
use crate::model::{Device, DeviceSpec};

/// Storage contract the device service relies on.
///
/// Implementations assign identifiers and timestamps; `list` returns
/// devices in insertion order.
pub trait DeviceStore: Send + Sync {
    /// Persist a new device and return it with its assigned id.
    fn create(&self, spec: &DeviceSpec) -> Result<Device, DeviceError>;

    fn find(&self, id: i64) -> Result<Option<Device>, DeviceError>;

    fn list(&self) -> Result<Vec<Device>, DeviceError>;

    /// Overwrite an existing device and return the stored version.
    /// Fails with `NotFound` if the id is unknown.
    fn save(&self, device: Device) -> Result<Device, DeviceError>;
}
