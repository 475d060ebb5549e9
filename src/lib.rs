//! joymidi - turns game controllers into MIDI instruments
//!
//! Every connected gamepad gets its own MIDI channel for the lifetime of the
//! process. Buttons become notes, the first axis drives pitch bend, the other
//! axes and the d-pad become control changes.
//!
//! ```text
//! gilrs ──► EventCollector ──► Bridge (ChannelRegistry + EventMapper) ──► MidiOutSink
//!           (InputEvent)                                                  (MidiMessage)
//! ```

pub mod bridge;
pub mod config;
pub mod controller;
pub mod mapping;
pub mod midi;

pub use bridge::{Bridge, BridgeError, BridgeStats, RunOutcome};
pub use controller::{DeviceId, DeviceInfo, HatDirection, InputEvent, InputSource};
pub use mapping::{Channel, ChannelRegistry, EventMapper, MappingError};
pub use midi::{MessageSink, MidiMessage, SinkError};
