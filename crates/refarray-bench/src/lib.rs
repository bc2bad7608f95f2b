//! Benchmark inputs for the refarray container.
//!
//! - [`scrambled_values`]: deterministic pseudo-random keys via seed
//! - [`filled_array`]: an array of references to a caller-owned slice

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use refarray::{ArrayError, DynArray};

/// Generate `n` pseudo-random keys from `seed`.
///
/// Same seed, same keys.
pub fn scrambled_values(n: usize, seed: u64) -> Vec<u64> {
    (0..n as u64)
        .map(|i| {
            seed.wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407))
                .rotate_left(17)
        })
        .collect()
}

/// Build an array holding a reference to each of `values`, in order.
pub fn filled_array(values: &[u64]) -> Result<DynArray<&u64>, ArrayError> {
    let mut array = DynArray::create()?;
    for v in values {
        array.push(v)?;
    }
    Ok(array)
}
