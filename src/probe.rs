//! Serial diagnostic session against the board's command console.
//!
//! The firmware answers single-byte ASCII commands with newline-delimited
//! text. A session walks a fixed script: open the port, let the board reset,
//! drain its startup banner, then exchange each command in order. The session
//! logic is generic over any `Read + Write` transport so it can be exercised
//! in tests without hardware; the `serial-probe` binary plugs in a real
//! `serialport` handle.
//!
//! All reads are bounded by an explicit time window. The transport's own read
//! timeout provides the pacing; `TimedOut`/`WouldBlock` just mean "no data
//! yet" and the window keeps ticking.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

/// The board's command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `i` — scan the I2C bus and report discovered devices.
    I2cScan,
    /// `s` — report servo and animation status.
    Status,
    /// `h` — print the command help.
    Help,
}

impl Command {
    /// The fixed diagnostic script, in send order.
    pub const SCRIPT: [Command; 3] = [Command::I2cScan, Command::Status, Command::Help];

    /// Byte written on the wire.
    pub fn byte(self) -> u8 {
        match self {
            Command::I2cScan => b'i',
            Command::Status => b's',
            Command::Help => b'h',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::I2cScan => "I2C scan",
            Command::Status => "status report",
            Command::Help => "help",
        }
    }

    /// How long to listen for this command's response. The I2C scan probes
    /// every address and needs the longer budget.
    pub fn window(self) -> Duration {
        match self {
            Command::I2cScan => Duration::from_secs(2),
            Command::Status | Command::Help => Duration::from_secs(1),
        }
    }
}

/// Splits a byte stream into trimmed, non-empty text lines.
///
/// Bytes after the last newline stay buffered until the line completes on a
/// later push, so lines split across read chunks come out whole.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Feed a chunk; completed lines are appended to `out`.
    pub fn push(&mut self, chunk: &[u8], out: &mut Vec<String>) {
        self.pending.extend_from_slice(chunk);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line);
            let text = text.trim();
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
    }
}

/// A connected diagnostic session.
///
/// Constructing one via [`Probe::connect`] is the disconnected→connected
/// transition; [`Probe::exchange`] performs one awaiting-response cycle. The
/// transport is owned, so dropping the probe releases the port on every exit
/// path.
pub struct Probe<T: Read + Write> {
    transport: T,
    lines: LineBuffer,
    stop: Arc<AtomicBool>,
}

impl<T: Read + Write> Probe<T> {
    /// Take ownership of an open transport and wait out the board's reset.
    ///
    /// Boards with auto-reset-on-open (classic Arduino behavior) reboot when
    /// the port opens; `settle` covers that. The wait is sliced so a Ctrl-C
    /// flagged through `stop` aborts promptly with `ErrorKind::Interrupted`.
    pub fn connect(transport: T, settle: Duration, stop: Arc<AtomicBool>) -> io::Result<Self> {
        let start = Instant::now();
        while start.elapsed() < settle {
            if stop.load(Ordering::Relaxed) {
                return Err(interrupted());
            }
            let remaining = settle.saturating_sub(start.elapsed());
            thread::sleep(Duration::from_millis(50).min(remaining));
        }
        Ok(Probe {
            transport,
            lines: LineBuffer::default(),
            stop,
        })
    }

    /// Collect response lines until `window` elapses.
    ///
    /// Used directly for the startup banner and by [`Probe::exchange`] for
    /// command responses.
    pub fn drain(&mut self, window: Duration) -> io::Result<Vec<String>> {
        let start = Instant::now();
        let mut out = Vec::new();
        let mut chunk = [0u8; 256];
        while start.elapsed() < window {
            if self.stop.load(Ordering::Relaxed) {
                return Err(interrupted());
            }
            match self.transport.read(&mut chunk) {
                Ok(n) if n > 0 => self.lines.push(&chunk[..n], &mut out),
                // No data yet. The port's read timeout does most of the
                // pacing; the short sleep keeps transports that return
                // immediately from spinning hot.
                Ok(_) => thread::sleep(Duration::from_millis(1)),
                Err(e)
                    if e.kind() == io::ErrorKind::TimedOut
                        || e.kind() == io::ErrorKind::WouldBlock =>
                {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Write one command byte and collect its response lines.
    pub fn exchange(&mut self, cmd: Command) -> io::Result<Vec<String>> {
        debug!("sending '{}' ({})", cmd.byte() as char, cmd.label());
        self.transport.write_all(&[cmd.byte()])?;
        self.transport.flush()?;
        self.drain(cmd.window())
    }
}

fn interrupted() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "interrupted by user")
}
