//! Error type shared by queries and deserialization.

use core::fmt;

/// Errors reported by bit vector operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An index or occurrence count was outside the addressable range.
    OutOfBounds,

    /// Serialized input is shorter than the fixed header.
    InvalidLength,

    /// Serialized input disagrees with its declared layout.
    InvalidFormat,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds => write!(f, "index out of bounds"),
            Error::InvalidLength => write!(f, "serialized data shorter than the minimum header"),
            Error::InvalidFormat => write!(f, "serialized data does not match its declared layout"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// A specialized `Result` for bit vector operations.
pub type Result<T> = core::result::Result<T, Error>;
