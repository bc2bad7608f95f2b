//! Growable, ordered array of caller-owned references.
//!
//! [`DynArray`] stores references (or any `Copy` handle) in insertion
//! order, supports shifting insertion and removal at any index, indexed
//! access, and comparator-based sorting. It never dereferences, copies
//! through, or frees what it stores.
//!
//! # Architecture
//!
//! ```text
//! DynArray<T, A> (length, config, all bounds checks)
//! └── RawBuf<T, A> (capacity slots of Option<T>, grow-or-rollback)
//!     └── A: Backend (allocate / reallocate / deallocate)
//! ```
//!
//! # Failure model
//!
//! Out-of-range indices are rejected with
//! [`ArrayError::IndexOutOfBounds`] (or `None` for removals and reads).
//! A backend that cannot supply memory yields
//! [`ArrayError::AllocationFailure`]. In every failure case the array is
//! left exactly as it was; growth is rolled back rather than partially
//! applied.
//!
//! # Safety
//!
//! `unsafe` is confined to `raw.rs` and the [`Backend`] seam, each block
//! with a `// SAFETY:` comment.
//!
//! ```rust
//! use refarray::DynArray;
//!
//! let values = [8, 3, 25];
//! let mut array = DynArray::<&i32>::create().unwrap();
//! for v in &values {
//!     array.push(v).unwrap();
//! }
//! array.sort_by(|a, b| a.cmp(b));
//! assert_eq!(array.get(0), Some(&3));
//! assert_eq!(array.last(), Some(&25));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod array;
pub mod backend;
pub mod config;
pub mod error;
mod raw;

// Public re-exports for the primary API surface.
pub use array::DynArray;
pub use backend::{Backend, System};
pub use config::ArrayConfig;
pub use error::ArrayError;
