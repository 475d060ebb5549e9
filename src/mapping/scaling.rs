//! Numeric scaling from raw axis positions to MIDI value ranges

pub const PITCH_BEND_MIN: i16 = -8192;
pub const PITCH_BEND_MAX: i16 = 8191;
pub const CONTROL_MAX: u8 = 127;

/// `left + amount * (right - left)`. Not clamped; callers clamp where the
/// target range has hard bounds.
pub fn lerp(left: f64, right: f64, amount: f64) -> f64 {
    amount * (right - left) + left
}

// Axis positions arrive as f32 but are scaled in f64, where the product with
// the range width is exact and the floor lands on the right integer.

/// Maps an axis position in [-1, 1] onto the signed pitch bend range
pub fn pitch_bend_from_axis(value: f32) -> i16 {
    lerp(0.0, 8192.0, f64::from(value))
        .clamp(f64::from(PITCH_BEND_MIN), f64::from(PITCH_BEND_MAX))
        .floor() as i16
}

/// Maps the magnitude of an axis position onto a 7-bit controller value
pub fn control_value_from_axis(value: f32) -> u8 {
    lerp(0.0, f64::from(CONTROL_MAX), f64::from(value.abs())).floor() as u8
}

/// Full scale for an active hat component, zero when centered
pub fn control_value_from_hat(component: i8) -> u8 {
    CONTROL_MAX * component.unsigned_abs()
}
