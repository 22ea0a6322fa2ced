//! Parsed WAVE header.

use std::fmt::{self, Display};

use anyhow::{Context, Result};

use crate::byteorder::WriteBytesLe;
use crate::structs::chunk::{
    ChunkHeader, DATA_TAG, FMT_TAG, FourCC, RIFF_TAG, RiffChunk, RiffDescriptor, WAVE_TAG,
};
use crate::structs::format::{CANONICAL_FMT_LEN, FmtChunk, SampleFormat};

/// Length of a canonical header: descriptor, 16-byte fmt chunk and the data
/// chunk header.
pub const CANONICAL_HEADER_LEN: usize = 44;

/// Header of a RIFF/WAVE file.
///
/// Raw declared values are kept as read. Where they disagree with what can be
/// derived from other fields or from the source length, the finding is listed
/// in [`warnings`](Self::warnings) and the derived value is available through
/// the `derived_*` accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveHeader {
    pub riff: RiffDescriptor,
    pub fmt_marker: FourCC,
    pub fmt_chunk_size: u32,
    pub fmt: FmtChunk,
    pub data_marker: FourCC,
    /// Declared payload size.
    pub data_size: u32,
    /// Offset of the first payload byte in the source.
    pub data_offset: u64,
    /// Payload bytes actually present: `min(data_size, available)`.
    pub data_len: u32,
    /// Chunks between `fmt ` and `data` that were stepped over.
    pub skipped_chunks: Vec<ChunkHeader>,
    pub warnings: Vec<HeaderWarning>,
}

/// Recoverable findings recorded while parsing a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderWarning {
    BlockAlignMismatch { declared: u16, derived: u32 },
    ByteRateMismatch { declared: u32, derived: u64 },
    ChunkSizeMismatch { declared: u32, actual: u64 },
    DataTruncated { declared: u32, available: u32 },
}

impl Display for HeaderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderWarning::BlockAlignMismatch { declared, derived } => write!(
                f,
                "block_align {declared} does not match channel_count * bits_per_sample / 8 = {derived}"
            ),
            HeaderWarning::ByteRateMismatch { declared, derived } => write!(
                f,
                "byte_rate {declared} does not match sample_rate * block_align = {derived}"
            ),
            HeaderWarning::ChunkSizeMismatch { declared, actual } => write!(
                f,
                "RIFF chunk_size {declared} does not match source length - 8 = {actual}"
            ),
            HeaderWarning::DataTruncated {
                declared,
                available,
            } => write!(
                f,
                "data_size {declared} exceeds the {available} bytes available, truncating"
            ),
        }
    }
}

impl WaveHeader {
    pub fn riff_tag(&self) -> FourCC {
        self.riff.riff_tag
    }

    pub fn chunk_size(&self) -> u32 {
        self.riff.chunk_size
    }

    pub fn format_tag(&self) -> FourCC {
        self.riff.format_tag
    }

    pub fn audio_format(&self) -> u16 {
        self.fmt.audio_format
    }

    pub fn channel_count(&self) -> u16 {
        self.fmt.channel_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.fmt.sample_rate
    }

    pub fn byte_rate(&self) -> u32 {
        self.fmt.byte_rate
    }

    pub fn block_align(&self) -> u16 {
        self.fmt.block_align
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.fmt.bits_per_sample
    }

    pub fn sample_format(&self) -> Option<SampleFormat> {
        self.fmt.sample_format()
    }

    pub fn derived_block_align(&self) -> u32 {
        self.fmt.derived_block_align()
    }

    pub fn derived_byte_rate(&self) -> u64 {
        self.fmt.derived_byte_rate()
    }

    /// Whole frames in the available payload, from the derived block size.
    pub fn frame_count(&self) -> u32 {
        match self.derived_block_align() {
            0 => 0,
            block => self.data_len / block,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.fmt.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.fmt.sample_rate as f64
    }

    pub fn is_truncated(&self) -> bool {
        self.data_len < self.data_size
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Serializes a 44-byte canonical header for this layout: fmt size 16,
    /// derived block_align/byte_rate, and the available payload length.
    ///
    /// Fails when a derived field does not fit the canonical layout.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        let block_align = self.derived_block_align();
        let fmt = FmtChunk {
            block_align: u16::try_from(block_align)
                .with_context(|| format!("derived block_align {block_align} exceeds 16 bits"))?,
            byte_rate: u32::try_from(self.derived_byte_rate()).with_context(|| {
                format!("derived byte_rate {} exceeds 32 bits", self.derived_byte_rate())
            })?,
            ..self.fmt
        };
        let data_len = self.frame_count() * block_align;
        let chunk_size = u32::try_from(
            (4 + 8 + CANONICAL_FMT_LEN + 8) as u64 + data_len as u64 + (data_len & 1) as u64,
        )
        .context("canonical RIFF chunk exceeds 4 GiB")?;

        let mut out = Vec::with_capacity(CANONICAL_HEADER_LEN);
        RiffDescriptor {
            riff_tag: RIFF_TAG,
            chunk_size,
            format_tag: WAVE_TAG,
        }
        .write_le(&mut out);
        fmt.write_chunk(&mut out);
        ChunkHeader {
            id: DATA_TAG,
            size: data_len,
        }
        .write_le(&mut out);

        Ok(out)
    }
}

impl Default for WaveHeader {
    fn default() -> Self {
        Self {
            riff: RiffDescriptor {
                riff_tag: RIFF_TAG,
                chunk_size: 36,
                format_tag: WAVE_TAG,
            },
            fmt_marker: FMT_TAG,
            fmt_chunk_size: CANONICAL_FMT_LEN,
            fmt: FmtChunk::default(),
            data_marker: DATA_TAG,
            data_size: 0,
            data_offset: CANONICAL_HEADER_LEN as u64,
            data_len: 0,
            skipped_chunks: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
