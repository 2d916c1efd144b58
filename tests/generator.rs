//! End-to-end tests for the header generator against the checked-in
//! `animation-config.json` — the same pre-upload gate the firmware relies on.

use std::fs;
use std::path::Path;

use hatchling::config::{AnimationSet, MAX_NAME_LEN};
use hatchling::emit::write_header;
use hatchling::mapping::degrees_to_pulse;

fn project_config() -> AnimationSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("animation-config.json");
    AnimationSet::load(&path).expect("checked-in config must load")
}

/// Value of a `#define KEY ...` line, with any trailing `// comment` dropped.
fn define_value(header: &str, key: &str) -> String {
    let prefix = format!("#define {key} ");
    header
        .lines()
        .find_map(|l| l.strip_prefix(prefix.as_str()))
        .unwrap_or_else(|| panic!("missing #define {key}"))
        .split("//")
        .next()
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn generator_writes_artifact_and_creates_directories() {
    let set = project_config();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("arduino").join("animation_config.h");

    write_header(&set, &out).unwrap();
    let header = fs::read_to_string(&out).unwrap();
    assert!(header.starts_with("// AUTO-GENERATED - DO NOT EDIT"));
    assert!(header.ends_with("#endif // ANIMATION_CONFIG_H\n"));
}

#[test]
fn generator_is_idempotent() {
    let set = project_config();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("animation_config.h");

    write_header(&set, &out).unwrap();
    let first = fs::read(&out).unwrap();
    write_header(&set, &out).unwrap();
    let second = fs::read(&out).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hardware_and_kinematics_constants_round_trip() {
    let set = project_config();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("animation_config.h");
    write_header(&set, &out).unwrap();
    let header = fs::read_to_string(&out).unwrap();

    let hw = &set.hardware;
    assert_eq!(define_value(&header, "I2C_ADDRESS"), hw.i2c_address);
    assert_eq!(define_value(&header, "SERVO_FREQ").parse::<u32>().unwrap(), hw.servo_frequency);
    assert_eq!(define_value(&header, "TRIGGER_PIN").parse::<u32>().unwrap(), hw.trigger_pin);

    for (side, leg) in [("LEFT", &hw.left_leg), ("RIGHT", &hw.right_leg)] {
        let val = |suffix: &str| define_value(&header, &format!("{side}_{suffix}")).parse::<i32>().unwrap();
        assert_eq!(val("SHOULDER_CHANNEL"), leg.shoulder_channel as i32);
        assert_eq!(val("ELBOW_CHANNEL"), leg.elbow_channel as i32);
        assert_eq!(val("SHOULDER_MIN_PULSE"), leg.shoulder_min_pulse);
        assert_eq!(val("SHOULDER_MAX_PULSE"), leg.shoulder_max_pulse);
        assert_eq!(val("ELBOW_MIN_PULSE"), leg.elbow_min_pulse);
        assert_eq!(val("ELBOW_MAX_PULSE"), leg.elbow_max_pulse);
    }

    let kin = &set.kinematics;
    assert_eq!(define_value(&header, "UPPER_SEGMENT_LENGTH").parse::<u32>().unwrap(), kin.upper_segment_length);
    assert_eq!(define_value(&header, "LOWER_SEGMENT_LENGTH").parse::<u32>().unwrap(), kin.lower_segment_length);
    assert_eq!(define_value(&header, "SHOULDER_MIN_ANGLE").parse::<i32>().unwrap(), kin.shoulder_min_angle);
    assert_eq!(define_value(&header, "SHOULDER_MAX_ANGLE").parse::<i32>().unwrap(), kin.shoulder_max_angle);
    assert_eq!(define_value(&header, "ELBOW_MIN_ANGLE").parse::<i32>().unwrap(), kin.elbow_min_angle);
    assert_eq!(define_value(&header, "ELBOW_MAX_ANGLE").parse::<i32>().unwrap(), kin.elbow_max_angle);
}

#[test]
fn animation_count_and_default_match_the_table() {
    let set = project_config();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("animation_config.h");
    write_header(&set, &out).unwrap();
    let header = fs::read_to_string(&out).unwrap();

    let count: usize = define_value(&header, "ANIMATION_COUNT").parse().unwrap();
    assert_eq!(count, set.animations.len());
    // One descriptor row per animation between the table braces.
    let table = header
        .split("const Animation ANIMATIONS[] PROGMEM = {")
        .nth(1)
        .unwrap()
        .split("};")
        .next()
        .unwrap();
    assert_eq!(table.matches("_NAME,").count(), count);

    let default: usize = define_value(&header, "DEFAULT_ANIMATION").parse().unwrap();
    assert_eq!(default, set.default_index().unwrap());
    // slow_struggle is the fourth entry in insertion order.
    assert_eq!(default, 3);
}

#[test]
fn project_config_passes_the_preupload_gate() {
    let set = project_config();
    set.validate().unwrap();

    for (id, anim) in &set.animations {
        assert!(anim.name.len() <= MAX_NAME_LEN, "{id} name too long");
        assert!(!anim.keyframes.is_empty(), "{id} has no keyframes");
        for kf in &anim.keyframes {
            for angle in kf.angles() {
                assert!((0..=90).contains(&angle), "{id}: angle {angle} out of range");
            }
        }
    }
}

#[test]
fn project_config_matches_the_wiring() {
    let hw = project_config().hardware;
    assert_eq!(hw.right_leg.elbow_channel, 0);
    assert_eq!(hw.right_leg.shoulder_channel, 1);
    assert_eq!(hw.left_leg.shoulder_channel, 14);
    assert_eq!(hw.left_leg.elbow_channel, 15);

    // Calibrated endpoints from the bench: right elbow normal, left side
    // mirrored (inverted ranges).
    assert_eq!(degrees_to_pulse(0, hw.right_leg.elbow_min_pulse, hw.right_leg.elbow_max_pulse), 150);
    assert_eq!(degrees_to_pulse(90, hw.right_leg.elbow_min_pulse, hw.right_leg.elbow_max_pulse), 330);
    assert_eq!(degrees_to_pulse(0, hw.left_leg.shoulder_min_pulse, hw.left_leg.shoulder_max_pulse), 440);
    assert_eq!(degrees_to_pulse(90, hw.left_leg.shoulder_min_pulse, hw.left_leg.shoulder_max_pulse), 300);
    assert!(hw.left_leg.shoulder().is_inverted());
    assert!(hw.left_leg.elbow().is_inverted());
    assert!(!hw.right_leg.shoulder().is_inverted());
}

#[test]
fn project_animations_are_symmetric_and_move() {
    let set = project_config();
    let symmetric = ["resting", "slow_struggle", "breaking_through", "grasping"];

    for id in symmetric {
        let anim = set.animation(id).unwrap_or_else(|| panic!("missing {id}"));
        for (i, kf) in anim.keyframes.iter().enumerate() {
            assert_eq!(kf.left_shoulder_deg, kf.right_shoulder_deg, "{id} keyframe {i}: shoulders");
            assert_eq!(kf.left_elbow_deg, kf.right_elbow_deg, "{id} keyframe {i}: elbows");
        }
        // Not a frozen pose: some keyframe differs from the first.
        let first = anim.keyframes[0];
        assert!(
            anim.keyframes.iter().any(|kf| kf.angles() != first.angles()),
            "{id} has no movement"
        );
    }

    // Resting stays within the gentle curled-up band.
    let resting = set.animation("resting").unwrap();
    for kf in &resting.keyframes {
        for angle in kf.angles() {
            assert!((0..=15).contains(&angle), "resting angle {angle} too large");
        }
    }
}
