//! Translation of controller input into MIDI messages.
//!
//! [`ChannelRegistry`] decides which channel a device plays on,
//! [`EventMapper`] turns individual input events into messages and
//! [`scaling`] holds the numeric conversions between the two value ranges.

pub mod engine;
pub mod error;
pub mod registry;
pub mod scaling;

pub use engine::EventMapper;
pub use error::MappingError;
pub use registry::{Channel, ChannelRegistry, RetiredDevice};
