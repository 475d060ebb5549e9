//! Event mapper
//!
//! Translates one [`InputEvent`] at a time into MIDI messages. The mapper
//! itself holds no state; everything that persists between events lives in
//! the [`ChannelRegistry`].
//!
//! | Input                | Output                                              |
//! |----------------------|-----------------------------------------------------|
//! | button down / up     | note on / off, note = button index                  |
//! | axis 0               | pitch bend                                          |
//! | axis n > 0           | control change n - 1                                |
//! | hat h                | two control changes after the axis controls         |

use tracing::{debug, info};

use crate::controller::{DeviceId, HatDirection, InputEvent};
use crate::mapping::registry::ChannelRegistry;
use crate::mapping::scaling::{
    control_value_from_axis, control_value_from_hat, pitch_bend_from_axis,
};
use crate::mapping::MappingError;
use crate::midi::MidiMessage;

/// Velocity sent with every note on
pub const NOTE_ON_VELOCITY: u8 = 64;

/// Velocity sent with every note off
pub const NOTE_OFF_VELOCITY: u8 = 0;

#[derive(Debug, Default, Clone, Copy)]
pub struct EventMapper;

impl EventMapper {
    pub fn new() -> Self {
        Self
    }

    /// Maps `event` to zero or more messages, updating `registry` on hot plug
    pub fn map(
        &self,
        event: &InputEvent,
        registry: &mut ChannelRegistry,
    ) -> Result<Vec<MidiMessage>, MappingError> {
        match event {
            InputEvent::DeviceAdded { device, info } => {
                registry.register_handle(*device, info.clone());
                let channel = registry.ensure_channel(*device);
                info!(
                    "Joystick {} ({}) connected to channel #{}",
                    info.name, device, channel
                );
                Ok(Vec::new())
            }
            InputEvent::DeviceRemoved { device } => {
                let retired = registry.retire(*device)?;
                info!(
                    "Joystick {} ({}) on channel #{} disconnected",
                    retired.info.name, device, retired.channel
                );
                Ok(Vec::new())
            }
            InputEvent::ButtonDown { device, button } => {
                let channel = registry.channel(*device)?;
                Ok(vec![MidiMessage::NoteOn {
                    channel,
                    note: *button,
                    velocity: NOTE_ON_VELOCITY,
                }])
            }
            InputEvent::ButtonUp { device, button } => {
                let channel = registry.channel(*device)?;
                Ok(vec![MidiMessage::NoteOff {
                    channel,
                    note: *button,
                    velocity: NOTE_OFF_VELOCITY,
                }])
            }
            InputEvent::AxisMotion {
                device,
                axis,
                value,
            } => {
                let channel = registry.channel(*device)?;
                let message = if *axis == 0 {
                    MidiMessage::PitchBend {
                        channel,
                        value: pitch_bend_from_axis(*value),
                    }
                } else {
                    MidiMessage::ControlChange {
                        channel,
                        controller: i32::from(*axis) - 1,
                        value: control_value_from_axis(*value),
                    }
                };
                Ok(vec![message])
            }
            InputEvent::HatMotion {
                device,
                hat,
                direction,
            } => self.map_hat(*device, *hat, *direction, registry),
        }
    }

    // Hats take the control numbers right after the axis controls, two per hat
    fn map_hat(
        &self,
        device: DeviceId,
        hat: u8,
        direction: HatDirection,
        registry: &ChannelRegistry,
    ) -> Result<Vec<MidiMessage>, MappingError> {
        let channel = registry.channel(device)?;
        let axis_count = registry.handle(device)?.axis_count;

        // Negative for axis-less devices; passed through unchanged
        let base = (axis_count as i32 - 1) + i32::from(hat) * 2;
        if base < 0 {
            debug!(
                "Hat {} of device {} maps to negative controller {}",
                hat, device, base
            );
        }

        Ok(vec![
            MidiMessage::ControlChange {
                channel,
                controller: base,
                value: control_value_from_hat(direction.x()),
            },
            MidiMessage::ControlChange {
                channel,
                controller: base + 1,
                value: control_value_from_hat(direction.y()),
            },
        ])
    }
}
