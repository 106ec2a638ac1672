//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// A bounds-checked access named an index that was never issued.
    OutOfBounds {
        /// The requested global index.
        index: usize,
        /// The arena's high-water mark at the time of the access.
        len: usize,
    },
    /// `pop()` was called on an empty [`IndexPool`](crate::IndexPool).
    EmptyPool,
    /// The system allocator could not provide a page buffer.
    AllocationFailed {
        /// Size of the buffer that was requested, in bytes.
        bytes: usize,
        /// Alignment of the buffer that was requested.
        align: usize,
    },
    /// The request can never be satisfied within the configured limits,
    /// either because it is larger than a page or because `max_pages`
    /// would be exceeded.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Total capacity available, in bytes.
        capacity: usize,
    },
    /// An alignment that is not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// Construction-time configuration was rejected.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for arena of size {len}")
            }
            Self::EmptyPool => write!(f, "pop called on an empty index pool"),
            Self::AllocationFailed { bytes, align } => {
                write!(
                    f,
                    "page allocation failed: {bytes} bytes with alignment {align}"
                )
            }
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}
