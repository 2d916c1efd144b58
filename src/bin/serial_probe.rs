//! Exercise a connected board over its serial command console.
//!
//! ```sh
//! cargo run --bin serial-probe
//! cargo run --bin serial-probe -- /dev/ttyUSB0 --baud 9600
//! ```
//!
//! Opens the port, waits out the board's auto-reset, prints the startup
//! banner, then sends the fixed `i` / `s` / `h` script and prints each
//! response. Any transport failure aborts the whole sequence with a non-zero
//! exit; Ctrl-C aborts cleanly. The port is owned by the session and released
//! on every exit path.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use hatchling::probe::{Command, Probe};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Read timeout on the port itself; response windows are layered on top.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "serial-probe", about = "Run the fixed diagnostic script against the board")]
struct Args {
    /// Serial device the board is attached to.
    #[arg(default_value = "/dev/ttyACM0")]
    port: String,

    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// Seconds to wait for the board to reset after the port opens.
    #[arg(long, default_value_t = 2)]
    settle: u64,

    /// Seconds to listen for the startup banner before sending commands.
    #[arg(long, default_value_t = 5)]
    startup_window: u64,
}

fn run(args: &Args, stop: Arc<AtomicBool>) -> io::Result<()> {
    info!("opening {} at {} baud", args.port, args.baud);
    let port = serialport::new(&args.port, args.baud)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|e| io::Error::other(format!("cannot open {}: {e}", args.port)))?;

    let mut probe = Probe::connect(port, Duration::from_secs(args.settle), stop)?;

    info!("startup output:");
    for line in probe.drain(Duration::from_secs(args.startup_window))? {
        println!("{line}");
    }

    for cmd in Command::SCRIPT {
        info!("sending '{}' ({})", cmd.byte() as char, cmd.label());
        for line in probe.exchange(cmd)? {
            println!("{line}");
        }
    }

    info!("probe complete");
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

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)).expect("Ctrl-C handler");

    match run(&args, stop) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => {
            error!("aborted by user");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
