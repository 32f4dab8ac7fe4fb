use std::fmt;
use std::io;

use crate::key::Key;

/// Error type for table, export and console operations.
#[derive(Debug)]
pub enum Error {
    /// The input does not match the `DDLLDD` key format. Carries the rejected input.
    InvalidKey(String),
    /// `remove` found no live slot holding the key.
    NotFound(Key),
    /// The probe sequence of the key offers no slot it can land in.
    TableFull(Key),
    /// A `Config` value is out of range.
    InvalidConfig(&'static str),
    /// Export file or console stream failure.
    Io(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKey(input) => write!(
                f,
                "invalid key {:?}: expected DDLLDD (two digits, two uppercase letters, two digits)",
                input
            ),
            Error::NotFound(key) => write!(f, "key {} not found", key),
            Error::TableFull(key) => write!(f, "table is full: no slot available for key {}", key),
            Error::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for keyslot operations.
pub type Result<T> = std::result::Result<T, Error>;
