//! Slot map error types.

use std::error::Error;
use std::fmt;

use strata_arena::ArenaError;

/// Errors returned by [`SlotMap`](crate::SlotMap) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotMapError {
    /// The handle is out of range, stale, or its value was already removed.
    InvalidHandle {
        /// Index encoded in the handle.
        index: u32,
        /// Version encoded in the handle.
        version: u32,
    },
    /// The value arena issued an index that does not fit in a handle.
    IndexSpaceExhausted {
        /// The offending global index.
        index: usize,
    },
    /// The underlying arena could not provide a slot.
    Arena(ArenaError),
}

impl fmt::Display for SlotMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle { index, version } => {
                write!(f, "invalid handle: index {index}, version {version}")
            }
            Self::IndexSpaceExhausted { index } => {
                write!(f, "index {index} does not fit in a 32-bit handle")
            }
            Self::Arena(err) => write!(f, "slot allocation failed: {err}"),
        }
    }
}

impl Error for SlotMapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArenaError> for SlotMapError {
    fn from(err: ArenaError) -> Self {
        Self::Arena(err)
    }
}
