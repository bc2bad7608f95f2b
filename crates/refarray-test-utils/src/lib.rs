//! Test utilities for refarray development.
//!
//! Provides allocation backends with scripted behaviour:
//! [`FailingBackend`] refuses requests on command, and
//! [`CountingBackend`] records every request it forwards.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod counting;
mod failing;

pub use counting::CountingBackend;
pub use failing::FailingBackend;
