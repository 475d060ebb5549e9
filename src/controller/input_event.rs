use std::fmt;

/// Identity of a connected input device as issued by the input backend.
///
/// Unique among the devices connected at any instant. The backend may hand the
/// same value out again after a disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for DeviceId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Metadata snapshot of a device, taken when it is connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub axis_count: u32,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, axis_count: u32) -> Self {
        Self {
            name: name.into(),
            axis_count,
        }
    }
}

/// Discrete direction of a hat (d-pad). Both components are always -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HatDirection {
    x: i8,
    y: i8,
}

impl HatDirection {
    pub const CENTERED: HatDirection = HatDirection { x: 0, y: 0 };

    /// Builds a direction, collapsing each component to its sign.
    pub fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn with_x(self, x: i8) -> Self {
        Self::new(x, self.y)
    }

    pub fn with_y(self, y: i8) -> Self {
        Self::new(self.x, y)
    }
}

/// One classified input event as delivered by an [`InputSource`](super::InputSource)
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    DeviceAdded {
        device: DeviceId,
        info: DeviceInfo,
    },
    DeviceRemoved {
        device: DeviceId,
    },
    ButtonDown {
        device: DeviceId,
        button: u8,
    },
    ButtonUp {
        device: DeviceId,
        button: u8,
    },
    /// Raw axis position in [-1, 1]
    AxisMotion {
        device: DeviceId,
        axis: u8,
        value: f32,
    },
    HatMotion {
        device: DeviceId,
        hat: u8,
        direction: HatDirection,
    },
}

impl InputEvent {
    /// Device the event refers to
    pub fn device(&self) -> DeviceId {
        match self {
            InputEvent::DeviceAdded { device, .. }
            | InputEvent::DeviceRemoved { device }
            | InputEvent::ButtonDown { device, .. }
            | InputEvent::ButtonUp { device, .. }
            | InputEvent::AxisMotion { device, .. }
            | InputEvent::HatMotion { device, .. } => *device,
        }
    }
}
