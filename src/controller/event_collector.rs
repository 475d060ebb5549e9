use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::Duration;

use chrono::Local;
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use tracing::{debug, error, info, warn};

use super::input_event::{DeviceId, DeviceInfo, HatDirection, InputEvent};
use super::input_source::InputSource;

/// Axes reported as MIDI controls, in index order. A device's layout is the
/// subset of these it actually exposes.
const STANDARD_AXES: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::LeftZ,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::RightZ,
];

// Collector settings
#[derive(Clone, Debug)]
pub struct CollectorSettings {
    pub poll_interval_ms: u64,
    pub joystick_deadzone: f32,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            joystick_deadzone: 0.0,
        }
    }
}

// Collector errors
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("Failed to initialize collector: {0}")]
    InitializationError(String),
}

/// Change to a device's d-pad reported by gilrs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HatUpdate {
    X(i8),
    Y(i8),
    ReleaseX(i8),
    ReleaseY(i8),
}

/// Direction after applying `update` to `current`.
///
/// Releasing a d-pad button only centers its axis while that axis still
/// points the released way.
pub fn next_hat(current: HatDirection, update: HatUpdate) -> HatDirection {
    match update {
        HatUpdate::X(x) => current.with_x(x),
        HatUpdate::Y(y) => current.with_y(y),
        HatUpdate::ReleaseX(x) if current.x() == x => current.with_x(0),
        HatUpdate::ReleaseY(y) if current.y() == y => current.with_y(0),
        HatUpdate::ReleaseX(_) | HatUpdate::ReleaseY(_) => current,
    }
}

/// Per-device bookkeeping of the collector: axis layout and d-pad state
#[derive(Debug, Default)]
pub struct DeviceTracker {
    // Axes each connected device exposes, in MIDI index order
    layouts: HashMap<DeviceId, Vec<Axis>>,

    // Last reported d-pad direction per device
    hats: HashMap<DeviceId, HatDirection>,
}

impl DeviceTracker {
    pub fn is_connected(&self, device: DeviceId) -> bool {
        self.layouts.contains_key(&device)
    }

    pub fn connect(&mut self, device: DeviceId, layout: Vec<Axis>) {
        self.layouts.insert(device, layout);
        self.hats.insert(device, HatDirection::CENTERED);
    }

    /// Device-removed event, only for devices that were announced
    pub fn disconnect(&mut self, device: DeviceId) -> Option<InputEvent> {
        self.hats.remove(&device);
        match self.layouts.remove(&device) {
            Some(_) => Some(InputEvent::DeviceRemoved { device }),
            None => {
                debug!("Ignoring disconnect of unannounced device {}", device);
                None
            }
        }
    }

    pub fn axis_motion(
        &self,
        device: DeviceId,
        axis: Axis,
        value: f32,
        deadzone: f32,
    ) -> Option<InputEvent> {
        let index = self
            .layouts
            .get(&device)
            .and_then(|layout| layout.iter().position(|a| *a == axis));
        match index {
            Some(index) => Some(InputEvent::AxisMotion {
                device,
                axis: index as u8,
                value: apply_deadzone(value, deadzone).clamp(-1.0, 1.0),
            }),
            None => {
                debug!("Ignoring axis {:?} outside layout of {}", axis, device);
                None
            }
        }
    }

    /// Hat-motion event when `update` changes the device's direction
    pub fn hat_motion(&mut self, device: DeviceId, update: HatUpdate) -> Option<InputEvent> {
        let current = self.hats.entry(device).or_default();
        let next = next_hat(*current, update);
        if next == *current {
            return None;
        }
        *current = next;
        Some(InputEvent::HatMotion {
            device,
            hat: 0,
            direction: next,
        })
    }
}

/// Lifecycle states of [`EventCollector`]
pub trait CollectionState: std::fmt::Debug {}

#[derive(Debug, Clone)]
pub struct Initializing;

#[derive(Debug, Clone)]
pub struct Collecting;

impl CollectionState for Initializing {}
impl CollectionState for Collecting {}

#[derive(Debug)]
pub struct EventCollector<S: CollectionState> {
    // Gilrs context
    gilrs: Gilrs,

    settings: CollectorSettings,

    devices: DeviceTracker,

    // Events produced outside of gilrs' queue (startup enumeration)
    pending: Vec<InputEvent>,

    state: PhantomData<S>,
}

impl<S: CollectionState> EventCollector<S> {
    fn transition<T: CollectionState>(self) -> EventCollector<T> {
        EventCollector {
            gilrs: self.gilrs,
            settings: self.settings,
            devices: self.devices,
            pending: self.pending,
            state: PhantomData,
        }
    }

    fn announce(&mut self, id: GamepadId) -> Option<InputEvent> {
        let device = DeviceId::from(usize::from(id));
        if self.devices.is_connected(device) {
            debug!("Device {} already announced", device);
            return None;
        }

        let (name, layout) = match self.gilrs.connected_gamepad(id) {
            Some(gamepad) => (gamepad.name().to_string(), axis_layout(&gamepad)),
            None => {
                warn!("Connected event for unknown gamepad {}", id);
                ("Unknown gamepad".to_string(), Vec::new())
            }
        };

        info!(
            "Gamepad {} ({}) connected with {} axes at {}",
            name,
            device,
            layout.len(),
            Local::now().format("%H:%M:%S.%3f")
        );

        let info = DeviceInfo::new(name, layout.len() as u32);
        self.devices.connect(device, layout);
        Some(InputEvent::DeviceAdded { device, info })
    }
}

impl EventCollector<Initializing> {
    pub fn create(settings: Option<CollectorSettings>) -> Result<Self, CollectorError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating Event Collector with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(CollectorError::InitializationError(e.to_string()));
            }
        };

        Ok(Self {
            gilrs,
            settings,
            devices: DeviceTracker::default(),
            pending: Vec::new(),
            state: PhantomData,
        })
    }

    /// Queues a device-added event for every gamepad that was plugged in
    /// before the collector started, then starts collecting.
    pub fn initialize(mut self) -> EventCollector<Collecting> {
        let ids: Vec<GamepadId> = self.gilrs.gamepads().map(|(id, _)| id).collect();

        if ids.is_empty() {
            warn!("No gamepad connected, waiting for hot plug");
        } else {
            info!("Found {} gamepads", ids.len());
        }

        for id in ids {
            if let Some(event) = self.announce(id) {
                self.pending.push(event);
            }
        }

        info!("Event Collector initialized, transitioning to Collecting state");
        self.transition()
    }
}

impl EventCollector<Collecting> {
    fn convert_gilrs_event(&mut self, id: GamepadId, event: EventType) -> Option<InputEvent> {
        let device = DeviceId::from(usize::from(id));

        match event {
            EventType::Connected => self.announce(id),
            EventType::Disconnected => {
                warn!("Gamepad {} disconnected", device);
                self.devices.disconnect(device)
            }
            EventType::ButtonPressed(button, _) => {
                if let Some(update) = dpad_button(button, true) {
                    return self.devices.hat_motion(device, update);
                }
                button_index(button).map(|button| InputEvent::ButtonDown { device, button })
            }
            EventType::ButtonReleased(button, _) => {
                if let Some(update) = dpad_button(button, false) {
                    return self.devices.hat_motion(device, update);
                }
                button_index(button).map(|button| InputEvent::ButtonUp { device, button })
            }
            EventType::ButtonRepeated(button, _) => {
                debug!("Button repeat ignored: {:?}", button);
                None
            }
            EventType::AxisChanged(Axis::DPadX, value, _) => self
                .devices
                .hat_motion(device, HatUpdate::X(axis_to_hat(value))),
            EventType::AxisChanged(Axis::DPadY, value, _) => self
                .devices
                .hat_motion(device, HatUpdate::Y(axis_to_hat(value))),
            EventType::AxisChanged(axis, value, _) => {
                self.devices
                    .axis_motion(device, axis, value, self.settings.joystick_deadzone)
            }
            _ => {
                debug!("Unhandled event type: {:?}", event);
                None
            }
        }
    }
}

impl InputSource for EventCollector<Collecting> {
    fn next_batch(&mut self) -> Option<Vec<InputEvent>> {
        let mut batch = std::mem::take(&mut self.pending);

        let timeout = Duration::from_millis(self.settings.poll_interval_ms);
        let mut next = if batch.is_empty() {
            self.gilrs.next_event_blocking(Some(timeout))
        } else {
            self.gilrs.next_event()
        };

        while let Some(Event { id, event, .. }) = next {
            if let Some(input) = self.convert_gilrs_event(id, event) {
                batch.push(input);
            }
            next = self.gilrs.next_event();
        }

        if !batch.is_empty() {
            debug!("Collected batch of {} input events", batch.len());
        }
        // gilrs never ends the stream on its own
        Some(batch)
    }
}

fn axis_layout(gamepad: &Gamepad<'_>) -> Vec<Axis> {
    STANDARD_AXES
        .iter()
        .copied()
        .filter(|axis| gamepad.axis_code(*axis).is_some())
        .collect()
}

// Button numbering follows the usual SDL ordering
fn button_index(button: Button) -> Option<u8> {
    let index = match button {
        Button::South => 0,
        Button::East => 1,
        Button::West => 2,
        Button::North => 3,
        Button::Select => 4,
        Button::Mode => 5,
        Button::Start => 6,
        Button::LeftThumb => 7,
        Button::RightThumb => 8,
        Button::LeftTrigger => 9,
        Button::RightTrigger => 10,
        Button::LeftTrigger2 => 11,
        Button::RightTrigger2 => 12,
        Button::C => 13,
        Button::Z => 14,
        _ => {
            debug!("Ignoring unmapped button: {:?}", button);
            return None;
        }
    };
    Some(index)
}

fn dpad_button(button: Button, pressed: bool) -> Option<HatUpdate> {
    let update = match (button, pressed) {
        (Button::DPadUp, true) => HatUpdate::Y(1),
        (Button::DPadDown, true) => HatUpdate::Y(-1),
        (Button::DPadLeft, true) => HatUpdate::X(-1),
        (Button::DPadRight, true) => HatUpdate::X(1),
        (Button::DPadUp, false) => HatUpdate::ReleaseY(1),
        (Button::DPadDown, false) => HatUpdate::ReleaseY(-1),
        (Button::DPadLeft, false) => HatUpdate::ReleaseX(-1),
        (Button::DPadRight, false) => HatUpdate::ReleaseX(1),
        _ => return None,
    };
    Some(update)
}

fn axis_to_hat(value: f32) -> i8 {
    if value > 0.5 {
        1
    } else if value < -0.5 {
        -1
    } else {
        0
    }
}

// Helper function to apply deadzone to analog stick values
fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if deadzone <= 0.0 {
        return value;
    }
    if value.abs() < deadzone {
        0.0
    } else {
        // Rescale the value to the range outside the deadzone
        let sign = if value < 0.0 { -1.0 } else { 1.0 };
        sign * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}
