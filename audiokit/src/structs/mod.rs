//! Data structures representing WAVE format components.
//!
//! Contains the RIFF chunk framing, the `fmt ` block, the assembled header
//! and the decoded sample buffer.

pub mod chunk;
pub mod format;
pub mod header;
pub mod sample_buffer;
