use std::fmt;
use std::io;

/// Errors surfaced by the toolchain.
///
/// Nothing here is retried: a parse or validation failure means the input
/// must be fixed, an I/O failure means the environment must be fixed, and in
/// both cases the affected operation terminates immediately.
#[derive(Debug)]
pub enum Error {
    /// The JSON description is missing required fields or has the wrong
    /// shape for them.
    Parse(String),
    /// The description parsed but violates a firmware limit (angle range,
    /// name buffer size, empty keyframe list).
    Validation(String),
    /// Reading the input, writing the artifact or talking to the serial
    /// device failed.
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(msg) => write!(f, "parse error: {msg}"),
            Error::Validation(msg) => write!(f, "validation error: {msg}"),
            Error::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
