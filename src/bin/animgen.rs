//! Compile `animation-config.json` into the firmware's animation header.
//!
//! ```sh
//! cargo run --bin animgen
//! cargo run --bin animgen -- --config other.json --output build/animation_config.h
//! ```
//!
//! The input is validated against the firmware's hard limits (0–90° angles,
//! 63-byte names, non-empty keyframe tables) before anything is written, so a
//! bad description never reaches the hardware.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hatchling::config::AnimationSet;
use hatchling::emit;
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "animgen", about = "Compile the JSON animation description into a firmware header")]
struct Args {
    /// Animation description to compile.
    #[arg(long, default_value = "animation-config.json")]
    config: PathBuf,

    /// Destination header. Parent directories are created; an existing
    /// artifact is overwritten.
    #[arg(long, default_value = "arduino/animation_config.h")]
    output: PathBuf,
}

fn run(args: &Args) -> hatchling::Result<()> {
    let set = AnimationSet::load(&args.config)?;
    set.validate()?;
    emit::write_header(&set, &args.output)?;
    info!("  - {} animations", set.animations.len());
    info!("  - {} total keyframes", set.keyframe_total());
    info!("  - default: '{}' (index {})", set.default_animation, set.default_index()?);
    Ok(())
}

fn main() -> ExitCode {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("logger init");

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
