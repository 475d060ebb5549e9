//! Controller subsystem for gamepad input handling
//!
//! 1. [`input_event`] - Classified input events and device metadata
//! 2. [`input_source`] - The blocking [`InputSource`] seam plus a scripted replay source
//! 3. [`event_collector`] - gilrs backed source with hot-plug support
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► gilrs ──► EventCollector ──► Vec<InputEvent> (one batch per poll)
//! ```

pub mod event_collector;
pub mod input_event;
pub mod input_source;

pub use event_collector::{
    next_hat, CollectionState, Collecting, CollectorError, CollectorSettings, DeviceTracker,
    EventCollector, HatUpdate, Initializing,
};
pub use input_event::{DeviceId, DeviceInfo, HatDirection, InputEvent};
pub use input_source::{InputSource, ScriptedSource};
