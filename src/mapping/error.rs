//! Error types of the mapping module

use thiserror::Error;

use crate::controller::DeviceId;

/// Faults raised while translating input events
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The event names a device that was never added or has already been removed
    #[error("Unknown device: {0}")]
    UnknownDevice(DeviceId),
}
