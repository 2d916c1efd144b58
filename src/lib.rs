//! Animation toolchain for a two-legged animatronic prop.
//!
//! The prop is driven by a PCA9685 servo controller: two legs, each with a
//! shoulder and an elbow servo. Animations are described as keyframed joint
//! angles in `animation-config.json` and compiled into a static C header the
//! firmware includes, so the firmware and this toolchain always agree on
//! calibration and motion data.
//!
//! Two binaries ship with the library:
//!
//! - `animgen` — loads the JSON description, validates it against the
//!   firmware's limits and compiles the header.
//! - `serial-probe` — exercises a connected board over its single-character
//!   serial command protocol and prints the responses.

pub mod config;
pub mod emit;
mod error;
pub mod mapping;
pub mod probe;

pub use error::{Error, Result};
