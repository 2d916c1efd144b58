//! Joint-angle to pulse-width mapping for the PCA9685 channels.
//!
//! Each servo has a calibrated pulse range recorded against the 0–90° joint
//! travel. Mirrored installation shows up as an *inverted* range (min pulse
//! greater than max pulse); the interpolation is directionless, so inverted
//! ranges need no special case.
//!
//! The arithmetic must match the firmware's integer `map()` primitive
//! bit-for-bit — truncating division, no rounding — because the firmware
//! recomputes the same pulses from the generated header and both sides have
//! to land on identical values for the calibration to mean anything.

/// Lower joint limit in degrees.
pub const DEG_MIN: i32 = 0;
/// Upper joint limit in degrees.
pub const DEG_MAX: i32 = 90;

/// Map an angle to a pulse width over a linear per-servo range.
///
/// The angle is clamped to [`DEG_MIN`]..=[`DEG_MAX`] first; out-of-range
/// input is never an error. `degrees_to_pulse(0, ..)` is exactly `min_pulse`
/// and `degrees_to_pulse(90, ..)` is exactly `max_pulse`, for normal and
/// inverted ranges alike.
#[inline]
pub fn degrees_to_pulse(degrees: i32, min_pulse: i32, max_pulse: i32) -> i32 {
    let degrees = degrees.clamp(DEG_MIN, DEG_MAX);
    min_pulse + (max_pulse - min_pulse) * degrees / DEG_MAX
}

/// Calibrated pulse range of one servo and the channel it is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoRange {
    /// PCA9685 output index (0–15).
    pub channel: u8,
    /// Pulse width commanded at 0°.
    pub min_pulse: i32,
    /// Pulse width commanded at 90°.
    pub max_pulse: i32,
}

impl ServoRange {
    /// True for mirrored servos whose pulse decreases as the angle grows.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.min_pulse > self.max_pulse
    }

    /// Pulse width for an angle, clamped into the servo's safe band.
    #[inline]
    pub fn pulse_for(&self, degrees: i32) -> i32 {
        let pulse = degrees_to_pulse(degrees, self.min_pulse, self.max_pulse);
        let (lo, hi) = self.band();
        pulse.clamp(lo, hi)
    }

    /// Whether a raw pulse width lies inside the calibrated band.
    #[inline]
    pub fn is_pulse_safe(&self, pulse: i32) -> bool {
        let (lo, hi) = self.band();
        (lo..=hi).contains(&pulse)
    }

    /// Calibrated band in ascending order, regardless of inversion.
    fn band(&self) -> (i32, i32) {
        if self.is_inverted() {
            (self.max_pulse, self.min_pulse)
        } else {
            (self.min_pulse, self.max_pulse)
        }
    }
}
