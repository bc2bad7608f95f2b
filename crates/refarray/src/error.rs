//! Array-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during array operations.
///
/// Every operation that returns one of these has left the array exactly as
/// it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// The allocation backend could not supply the requested block, or the
    /// requested size is not representable.
    AllocationFailure {
        /// Number of bytes requested.
        requested: usize,
    },
    /// An index outside the range accepted by the operation.
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Length of the array at the time of the call.
        len: usize,
    },
    /// An [`ArrayConfig`](crate::ArrayConfig) that cannot produce a usable array.
    InvalidConfig {
        /// What was wrong with the configuration.
        reason: &'static str,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure { requested } => {
                write!(f, "allocation failed: requested {requested} bytes")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid array config: {reason}")
            }
        }
    }
}

impl Error for ArrayError {}
