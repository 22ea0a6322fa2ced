//! Parser and sample decoder for RIFF/WAVE linear PCM files, with basic
//! signal features computed over the decoded samples.
//!
//! ## Technical Overview
//!
//! ### Container Layout
//!
//! **Descriptor**: `RIFF`, declared size, `WAVE`.
//! **Format**: a `fmt ` chunk that must follow the descriptor directly. Bytes
//! beyond the canonical 16 are skipped.
//! **Payload**: the first `data` chunk. Chunks between `fmt ` and `data` are
//! skipped, including their pad byte.
//!
//! ### Sample Formats
//!
//! - 8-bit unsigned PCM
//! - 16, 24 and 32-bit signed PCM
//! - 32-bit IEEE float
//!
//! ### Damaged Input
//!
//! A `data` chunk that declares more bytes than the source holds is truncated
//! to what is there. A trailing partial frame is dropped. Inconsistent
//! `block_align`/`byte_rate`/RIFF size fields are reported as header warnings
//! unless the parser runs in strict mode.
//!
//! ## Quick Start
//!
//! 1. Parse the header and extract samples using [`process::parse::Parser`]
//! 2. Compute features using [`process::analyze`]
//! 3. Re-emit canonical WAVE using [`process::write::WavWriter`]
//!
//! ```rust
//! use audiokit::join_bytes_le;
//! use audiokit::process::analyze::{AnalysisConfig, zero_crossing_rate};
//! use audiokit::process::parse::Parser;
//!
//! // mono, 8 kHz, 16-bit, four samples
//! let wav = join_bytes_le!(
//!     *b"RIFF", 44u32, *b"WAVE",
//!     *b"fmt ", 16u32, 1u16, 1u16, 8000u32, 16000u32, 2u16, 16u16,
//!     *b"data", 8u32, 1000i16, -1000i16, 1000i16, -1000i16
//! );
//!
//! let decoded = Parser::default().decode(&wav)?;
//! assert_eq!(decoded.frame_count(), 4);
//!
//! let zcr = zero_crossing_rate(&decoded.samples, &AnalysisConfig::global())?;
//! assert_eq!(zcr.as_global(), Some(1.0));
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Status-code entry points with a thread-local last-error slot.
pub mod boundary;

/// Little-endian serialization used for headers and test fixtures.
pub mod byteorder;

/// Processing pipeline.
///
/// 1. **Parsing** ([`process::parse`]): validates the RIFF/WAVE layout.
///
/// 2. **Extraction** ([`process::extract`]): decodes the `data` payload.
///
/// 3. **Analysis** ([`process::analyze`]): zero-crossing rate, RMS, envelope.
///
/// 4. **Writing** ([`process::write`]): canonical WAVE output.
pub mod process;

/// Data structures representing WAVE format components.
///
/// - **Chunks** ([`structs::chunk`]): tags, chunk headers, the RIFF descriptor
/// - **Format** ([`structs::format`]): the `fmt ` chunk and sample formats
/// - **Header** ([`structs::header`]): the parsed header and its warnings
/// - **Samples** ([`structs::sample_buffer`]): interleaved decoded samples
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Chunk Reader** ([`utils::chunk_reader`]): bounds-checked little-endian reads
/// - **Diagnostics** ([`utils::diagnostics`]): last-error slot
/// - **Error Handling** ([`utils::errors`]): Error types
pub mod utils;
