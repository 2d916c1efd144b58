//! The JSON animation description and its loader.
//!
//! The whole document is loaded once, read-only, and discarded after header
//! emission. Every field is required — there is no defaulting, so a missing
//! or mistyped key fails the load rather than silently drifting from the
//! hardware calibration.

use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::mapping::ServoRange;
use crate::{Error, Result};

/// Longest animation name the firmware accepts: its name buffer is 64 bytes
/// including the NUL terminator.
pub const MAX_NAME_LEN: usize = 63;

/// Highest PCA9685 output index.
const MAX_CHANNEL: u8 = 15;

/// Fixed hardware attributes of the prop.
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareConfig {
    /// PCA9685 bus address, kept as spelled in the JSON (e.g. `"0x40"`) so
    /// it reaches the generated header verbatim.
    pub i2c_address: String,
    pub servo_frequency: u32,
    pub left_leg: LegConfig,
    pub right_leg: LegConfig,
    pub trigger_pin: u32,
}

/// Channel wiring and calibrated pulse ranges for one leg.
#[derive(Debug, Clone, Deserialize)]
pub struct LegConfig {
    pub shoulder_channel: u8,
    pub elbow_channel: u8,
    pub shoulder_min_pulse: i32,
    pub shoulder_max_pulse: i32,
    pub elbow_min_pulse: i32,
    pub elbow_max_pulse: i32,
}

impl LegConfig {
    pub fn shoulder(&self) -> ServoRange {
        ServoRange {
            channel: self.shoulder_channel,
            min_pulse: self.shoulder_min_pulse,
            max_pulse: self.shoulder_max_pulse,
        }
    }

    pub fn elbow(&self) -> ServoRange {
        ServoRange {
            channel: self.elbow_channel,
            min_pulse: self.elbow_min_pulse,
            max_pulse: self.elbow_max_pulse,
        }
    }
}

/// Segment lengths and joint limits. Documentation for the firmware and the
/// preview tooling; nothing here is enforced algorithmically.
#[derive(Debug, Clone, Deserialize)]
pub struct KinematicsConfig {
    pub upper_segment_length: u32,
    pub lower_segment_length: u32,
    pub shoulder_min_angle: i32,
    pub shoulder_max_angle: i32,
    pub elbow_min_angle: i32,
    pub elbow_max_angle: i32,
}

/// A timestamped pose: the four joint angles at one point in an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Keyframe {
    pub time_ms: u32,
    pub left_shoulder_deg: i32,
    pub left_elbow_deg: i32,
    pub right_shoulder_deg: i32,
    pub right_elbow_deg: i32,
}

impl Keyframe {
    /// The four joints in emission order (left shoulder, left elbow, right
    /// shoulder, right elbow).
    pub fn angles(&self) -> [i32; 4] {
        [
            self.left_shoulder_deg,
            self.left_elbow_deg,
            self.right_shoulder_deg,
            self.right_elbow_deg,
        ]
    }
}

/// One named motion sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct Animation {
    /// Display name shown by the firmware's status report.
    pub name: String,
    pub duration_ms: u32,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub keyframes: Vec<Keyframe>,
}

/// The whole animation description: hardware, kinematics and the ordered
/// animation table.
///
/// `animations` keeps the JSON object's insertion order. The firmware indexes
/// animations positionally, so reordering entries would silently retarget
/// every index — ordering is a correctness requirement here, not cosmetics.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationSet {
    pub hardware: HardwareConfig,
    pub kinematics: KinematicsConfig,
    #[serde(deserialize_with = "ordered_animations")]
    pub animations: Vec<(String, Animation)>,
    pub default_animation: String,
}

impl AnimationSet {
    /// Load and parse a description from disk.
    ///
    /// Fails with [`Error::Parse`] when required keys are absent or
    /// malformed, including a `default_animation` that names no entry.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let set: AnimationSet = serde_json::from_str(&contents)?;
        set.default_index()?;
        debug!(
            "loaded {} animations ({} keyframes) from {}",
            set.animations.len(),
            set.keyframe_total(),
            path.display()
        );
        Ok(set)
    }

    /// Positional index of the default animation in the table.
    pub fn default_index(&self) -> Result<usize> {
        self.animations
            .iter()
            .position(|(id, _)| *id == self.default_animation)
            .ok_or_else(|| {
                Error::Parse(format!(
                    "default_animation '{}' does not name an animation",
                    self.default_animation
                ))
            })
    }

    /// Look up an animation by its JSON key.
    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.animations
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, anim)| anim)
    }

    /// Total keyframe count across all animations.
    pub fn keyframe_total(&self) -> usize {
        self.animations
            .iter()
            .map(|(_, anim)| anim.keyframes.len())
            .sum()
    }

    /// Check the description against the firmware's hard limits.
    ///
    /// These are the pre-upload safety checks: every keyframe angle within
    /// 0–90°, every name within the firmware's 64-byte buffer, no empty
    /// keyframe tables, channels within the PCA9685's 16 outputs.
    pub fn validate(&self) -> Result<()> {
        for (side, leg) in [("left", &self.hardware.left_leg), ("right", &self.hardware.right_leg)]
        {
            for range in [leg.shoulder(), leg.elbow()] {
                if range.channel > MAX_CHANNEL {
                    return Err(Error::Validation(format!(
                        "{side} leg channel {} exceeds PCA9685 output {MAX_CHANNEL}",
                        range.channel
                    )));
                }
            }
        }

        for (id, anim) in &self.animations {
            if anim.name.len() > MAX_NAME_LEN {
                return Err(Error::Validation(format!(
                    "animation '{id}' name is {} bytes, firmware buffer holds {MAX_NAME_LEN}",
                    anim.name.len()
                )));
            }
            if anim.keyframes.is_empty() {
                return Err(Error::Validation(format!(
                    "animation '{id}' has no keyframes"
                )));
            }
            for (i, kf) in anim.keyframes.iter().enumerate() {
                for angle in kf.angles() {
                    if !(crate::mapping::DEG_MIN..=crate::mapping::DEG_MAX).contains(&angle) {
                        return Err(Error::Validation(format!(
                            "animation '{id}' keyframe {i}: angle {angle} outside 0-90"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Deserialize the `animations` object into a vec of `(key, animation)`
/// pairs, preserving document order.
fn ordered_animations<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, Animation)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<(String, Animation)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of animation id to animation")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Animation>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(OrderedVisitor)
}
