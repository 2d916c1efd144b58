//! Compiles an [`AnimationSet`] into the C header the firmware includes.
//!
//! The artifact is a set of `#define` constants plus PROGMEM lookup tables,
//! one keyframe table per animation and one combined animation table.
//! Rendering is deterministic: the same input always produces a byte-identical
//! header, and table rows follow the JSON insertion order because the
//! firmware addresses animations by position.

use std::fs;
use std::path::Path;

use log::info;

use crate::config::AnimationSet;
use crate::Result;

/// Render the header text for a description.
///
/// Pure and deterministic; the only failure mode is a `default_animation`
/// that resolves to no table entry.
pub fn render_header(set: &AnimationSet) -> Result<String> {
    let default_index = set.default_index()?;
    let hw = &set.hardware;
    let kin = &set.kinematics;

    let mut lines: Vec<String> = vec![
        "// AUTO-GENERATED - DO NOT EDIT".into(),
        "// Generated from animation-config.json".into(),
        "// Run: cargo run --bin animgen".into(),
        String::new(),
        "#ifndef ANIMATION_CONFIG_H".into(),
        "#define ANIMATION_CONFIG_H".into(),
        String::new(),
        "// Hardware Configuration".into(),
        format!("#define I2C_ADDRESS {}", hw.i2c_address),
        format!("#define SERVO_FREQ {}", hw.servo_frequency),
        String::new(),
        "// Left Leg Servos".into(),
        format!("#define LEFT_SHOULDER_CHANNEL {}", hw.left_leg.shoulder_channel),
        format!("#define LEFT_ELBOW_CHANNEL {}", hw.left_leg.elbow_channel),
        format!("#define LEFT_SHOULDER_MIN_PULSE {}", hw.left_leg.shoulder_min_pulse),
        format!("#define LEFT_SHOULDER_MAX_PULSE {}", hw.left_leg.shoulder_max_pulse),
        format!("#define LEFT_ELBOW_MIN_PULSE {}", hw.left_leg.elbow_min_pulse),
        format!("#define LEFT_ELBOW_MAX_PULSE {}", hw.left_leg.elbow_max_pulse),
        String::new(),
        "// Right Leg Servos".into(),
        format!("#define RIGHT_SHOULDER_CHANNEL {}", hw.right_leg.shoulder_channel),
        format!("#define RIGHT_ELBOW_CHANNEL {}", hw.right_leg.elbow_channel),
        format!("#define RIGHT_SHOULDER_MIN_PULSE {}", hw.right_leg.shoulder_min_pulse),
        format!("#define RIGHT_SHOULDER_MAX_PULSE {}", hw.right_leg.shoulder_max_pulse),
        format!("#define RIGHT_ELBOW_MIN_PULSE {}", hw.right_leg.elbow_min_pulse),
        format!("#define RIGHT_ELBOW_MAX_PULSE {}", hw.right_leg.elbow_max_pulse),
        String::new(),
        format!("#define TRIGGER_PIN {}", hw.trigger_pin),
        String::new(),
        "// Kinematics".into(),
        format!("#define UPPER_SEGMENT_LENGTH {}", kin.upper_segment_length),
        format!("#define LOWER_SEGMENT_LENGTH {}", kin.lower_segment_length),
        format!("#define SHOULDER_MIN_ANGLE {}", kin.shoulder_min_angle),
        format!("#define SHOULDER_MAX_ANGLE {}", kin.shoulder_max_angle),
        format!("#define ELBOW_MIN_ANGLE {}", kin.elbow_min_angle),
        format!("#define ELBOW_MAX_ANGLE {}", kin.elbow_max_angle),
        String::new(),
        "// Animation Keyframe Structure".into(),
        "struct Keyframe {".into(),
        "  unsigned long time_ms;".into(),
        "  int left_shoulder_deg;".into(),
        "  int left_elbow_deg;".into(),
        "  int right_shoulder_deg;".into(),
        "  int right_elbow_deg;".into(),
        "};".into(),
        String::new(),
        "struct Animation {".into(),
        "  const char* name;".into(),
        "  unsigned long duration_ms;".into(),
        "  bool loop;".into(),
        "  int keyframe_count;".into(),
        "  const Keyframe* keyframes;".into(),
        "};".into(),
        String::new(),
    ];

    // Name string constants.
    for (id, anim) in &set.animations {
        lines.push(format!(
            "const char {}_NAME[] PROGMEM = \"{}\";",
            symbol(id),
            anim.name
        ));
    }
    lines.push(String::new());

    // One keyframe table per animation.
    for (id, anim) in &set.animations {
        lines.push(format!("// {}", anim.name));
        lines.push(format!("const Keyframe {}_KEYFRAMES[] PROGMEM = {{", symbol(id)));
        for kf in &anim.keyframes {
            let [ls, le, rs, re] = kf.angles();
            lines.push(format!("  {{{}, {ls}, {le}, {rs}, {re}}},", kf.time_ms));
        }
        lines.push("};".into());
        lines.push(String::new());
    }

    // Combined animation table, insertion order.
    lines.push("// Animation Definitions".into());
    lines.push("const Animation ANIMATIONS[] PROGMEM = {".into());
    for (id, anim) in &set.animations {
        lines.push(format!(
            "  {{{sym}_NAME, {}, {}, {}, {sym}_KEYFRAMES}},",
            anim.duration_ms,
            anim.looped,
            anim.keyframes.len(),
            sym = symbol(id)
        ));
    }
    lines.push("};".into());
    lines.push(String::new());

    lines.push(format!("#define ANIMATION_COUNT {}", set.animations.len()));
    lines.push(format!(
        "#define DEFAULT_ANIMATION {default_index}  // {}",
        set.default_animation
    ));
    lines.push(String::new());
    lines.push("#endif // ANIMATION_CONFIG_H".into());
    lines.push(String::new());

    Ok(lines.join("\n"))
}

/// Write the header to `path`, creating parent directories as needed and
/// overwriting any existing artifact.
pub fn write_header(set: &AnimationSet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_header(set)?)?;
    info!("generated {}", path.display());
    Ok(())
}

/// Uppercased C identifier for an animation key. Keys are snake_case in the
/// JSON, so uppercasing is all it takes.
fn symbol(id: &str) -> String {
    id.to_ascii_uppercase()
}
