use thiserror::Error;

use super::message::{EncodeError, MidiMessage};

/// Failure to hand a message to the output
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Message not encodable: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to send MIDI message: {0}")]
    Send(String),
}

/// Destination for MIDI messages. One call per message, no buffering.
pub trait MessageSink {
    fn send(&mut self, message: &MidiMessage) -> Result<(), SinkError>;
}

/// Records messages in memory
impl MessageSink for Vec<MidiMessage> {
    fn send(&mut self, message: &MidiMessage) -> Result<(), SinkError> {
        self.push(*message);
        Ok(())
    }
}

impl<T: MessageSink + ?Sized> MessageSink for &mut T {
    fn send(&mut self, message: &MidiMessage) -> Result<(), SinkError> {
        (**self).send(message)
    }
}
