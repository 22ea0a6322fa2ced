//! Utility functions and supporting infrastructure.
//!
//! Provides the bounds-checked chunk reader, error types and the per-thread
//! diagnostics slot used by the status-code boundary.

pub mod chunk_reader;
pub mod diagnostics;
pub mod errors;

#[cfg(test)]
pub(crate) mod fixtures;
