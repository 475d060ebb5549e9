//! MIDI side of the bridge: messages, their wire encoding and the output sink

pub mod message;
pub mod output;
pub mod sink;

pub use message::{EncodeError, MidiMessage, MAX_CHANNEL};
pub use output::{choose_port, MidiOutSink, OutputError};
pub use sink::{MessageSink, SinkError};
