use std::fmt;

use thiserror::Error;

use crate::mapping::Channel;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;
const PITCH_BEND: u8 = 0xE0;

/// Highest channel a MIDI 1.0 status byte can address
pub const MAX_CHANNEL: Channel = 15;

/// Offset between the signed pitch bend value and its 14-bit wire form
const PITCH_BEND_CENTER: i32 = 8192;

/// Outbound MIDI channel message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: Channel,
        note: u8,
        velocity: u8,
    },
    /// Signed bend in -8192..=8191, 0 is centered
    PitchBend { channel: Channel, value: i16 },
    ControlChange {
        channel: Channel,
        controller: i32,
        value: u8,
    },
}

/// A message that cannot be expressed as MIDI 1.0 bytes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("channel {0} is outside 0..=15")]
    Channel(Channel),

    #[error("{field} {value} is outside 0..=127")]
    DataByte { field: &'static str, value: i32 },

    #[error("pitch bend {0} is outside -8192..=8191")]
    PitchBend(i16),
}

impl MidiMessage {
    pub fn channel(&self) -> Channel {
        match self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::PitchBend { channel, .. }
            | MidiMessage::ControlChange { channel, .. } => *channel,
        }
    }

    /// Encodes the message as a three byte MIDI 1.0 channel message
    pub fn to_bytes(&self) -> Result<[u8; 3], EncodeError> {
        let channel = self.channel();
        if channel > MAX_CHANNEL {
            return Err(EncodeError::Channel(channel));
        }
        let channel = channel as u8;

        match *self {
            MidiMessage::NoteOn { note, velocity, .. } => Ok([
                NOTE_ON | channel,
                data_byte("note", i32::from(note))?,
                data_byte("velocity", i32::from(velocity))?,
            ]),
            MidiMessage::NoteOff { note, velocity, .. } => Ok([
                NOTE_OFF | channel,
                data_byte("note", i32::from(note))?,
                data_byte("velocity", i32::from(velocity))?,
            ]),
            MidiMessage::PitchBend { value, .. } => {
                let raw = i32::from(value) + PITCH_BEND_CENTER;
                if !(0..=0x3FFF).contains(&raw) {
                    return Err(EncodeError::PitchBend(value));
                }
                Ok([
                    PITCH_BEND | channel,
                    (raw & 0x7F) as u8,
                    ((raw >> 7) & 0x7F) as u8,
                ])
            }
            MidiMessage::ControlChange {
                controller, value, ..
            } => Ok([
                CONTROL_CHANGE | channel,
                data_byte("controller", controller)?,
                data_byte("value", i32::from(value))?,
            ]),
        }
    }
}

fn data_byte(field: &'static str, value: i32) -> Result<u8, EncodeError> {
    if (0..=127).contains(&value) {
        Ok(value as u8)
    } else {
        Err(EncodeError::DataByte { field, value })
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiMessage::NoteOn {
                channel,
                note,
                velocity,
            } => write!(f, "note_on channel={channel} note={note} velocity={velocity}"),
            MidiMessage::NoteOff {
                channel,
                note,
                velocity,
            } => write!(f, "note_off channel={channel} note={note} velocity={velocity}"),
            MidiMessage::PitchBend { channel, value } => {
                write!(f, "pitchwheel channel={channel} pitch={value}")
            }
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => write!(
                f,
                "control_change channel={channel} control={controller} value={value}"
            ),
        }
    }
}
