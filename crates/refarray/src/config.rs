//! Array configuration parameters.

use crate::error::ArrayError;

/// Configuration for a [`DynArray`](crate::DynArray).
///
/// Controls the size of the first buffer and how fast it grows.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayConfig {
    /// Number of slots allocated by `create`.
    ///
    /// Default: 16. Must be at least 1.
    pub initial_capacity: usize,

    /// Multiplier applied to the capacity when an insertion finds the
    /// buffer full.
    ///
    /// Default: 2. Must be at least 2 so that growth always makes room.
    pub growth_factor: usize,
}

impl ArrayConfig {
    /// Default number of slots in a fresh array.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Default capacity multiplier.
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Create a config with the given initial capacity and the default
    /// growth factor.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Check that this config can produce a usable array.
    pub fn validate(&self) -> Result<(), ArrayError> {
        if self.initial_capacity == 0 {
            return Err(ArrayError::InvalidConfig {
                reason: "initial_capacity must be at least 1",
            });
        }
        if self.growth_factor < 2 {
            return Err(ArrayError::InvalidConfig {
                reason: "growth_factor must be at least 2",
            });
        }
        Ok(())
    }

    /// Capacity after one growth step from `capacity`, or `None` on overflow.
    pub fn grown_capacity(&self, capacity: usize) -> Option<usize> {
        capacity.checked_mul(self.growth_factor)
    }
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
