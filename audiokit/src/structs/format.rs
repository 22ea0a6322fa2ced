//! The `fmt ` chunk.
//!
//! ## Layout (16 canonical bytes, little-endian)
//!
//! | Field | Size |
//! |---|---|
//! | audio_format | u16 |
//! | channel_count | u16 |
//! | sample_rate | u32 |
//! | byte_rate | u32 |
//! | block_align | u16 |
//! | bits_per_sample | u16 |
//!
//! Larger chunks carry an extension block after these fields which is
//! skipped, never interpreted.

use std::fmt::Display;
use std::io;
use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use audiokit_macros::{ToBytes, riff_chunk};

use crate::utils::chunk_reader::ChunkReader;
use crate::utils::errors::ReadError;

/// Size of the canonical PCM field block.
pub const CANONICAL_FMT_LEN: u32 = 16;

pub const WAVE_FORMAT_PCM: u16 = 1;
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 3;

#[riff_chunk(b"fmt ")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ToBytes)]
pub struct FmtChunk {
    pub audio_format: u16,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FmtChunk {
    /// Reads the canonical 16 bytes; the caller owns skipping any extension.
    pub fn read<R: io::Read>(reader: &mut ChunkReader<R>) -> Result<Self, ReadError> {
        Ok(Self {
            audio_format: reader.read_u16_le()?,
            channel_count: reader.read_u16_le()?,
            sample_rate: reader.read_u32_le()?,
            byte_rate: reader.read_u32_le()?,
            block_align: reader.read_u16_le()?,
            bits_per_sample: reader.read_u16_le()?,
        })
    }

    /// Builds a consistent fmt block for the given layout.
    ///
    /// Fails when the derived block_align or byte_rate does not fit its field.
    pub fn canonical(
        sample_format: SampleFormat,
        channel_count: u16,
        sample_rate: u32,
    ) -> Result<Self> {
        let block_align =
            u16::try_from(channel_count as u32 * sample_format.bytes_per_sample() as u32)
                .with_context(|| {
                    format!("block_align of {channel_count} x {sample_format} exceeds 16 bits")
                })?;
        let byte_rate = u32::try_from(sample_rate as u64 * block_align as u64)
            .with_context(|| format!("byte_rate of {sample_rate} Hz x {block_align} exceeds 32 bits"))?;

        Ok(Self {
            audio_format: sample_format.audio_format(),
            channel_count,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample: sample_format.bits_per_sample(),
        })
    }

    pub fn sample_format(&self) -> Option<SampleFormat> {
        SampleFormat::from_fields(self.audio_format, self.bits_per_sample)
    }

    /// `channel_count * bits_per_sample / 8`
    pub fn derived_block_align(&self) -> u32 {
        self.channel_count as u32 * (self.bits_per_sample / 8) as u32
    }

    /// `sample_rate * derived_block_align`
    pub fn derived_byte_rate(&self) -> u64 {
        self.sample_rate as u64 * self.derived_block_align() as u64
    }
}

/// Supported sample encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Unsigned offset-binary.
    U8,
    I16,
    I24,
    I32,
    F32,
}

impl SampleFormat {
    pub fn from_fields(audio_format: u16, bits_per_sample: u16) -> Option<Self> {
        match (audio_format, bits_per_sample) {
            (WAVE_FORMAT_PCM, 8) => Some(Self::U8),
            (WAVE_FORMAT_PCM, 16) => Some(Self::I16),
            (WAVE_FORMAT_PCM, 24) => Some(Self::I24),
            (WAVE_FORMAT_PCM, 32) => Some(Self::I32),
            (WAVE_FORMAT_IEEE_FLOAT, 32) => Some(Self::F32),
            _ => None,
        }
    }

    pub fn audio_format(self) -> u16 {
        match self {
            Self::F32 => WAVE_FORMAT_IEEE_FLOAT,
            _ => WAVE_FORMAT_PCM,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        match self {
            Self::U8 => 8,
            Self::I16 => 16,
            Self::I24 => 24,
            Self::I32 | Self::F32 => 32,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        self.bits_per_sample() as usize / 8
    }

    pub fn is_float(self) -> bool {
        self == Self::F32
    }

    /// Values an integer format can store, `None` for float.
    pub fn int_range(self) -> Option<RangeInclusive<i32>> {
        match self {
            Self::U8 => Some(-128..=127),
            Self::I16 => Some(i16::MIN as i32..=i16::MAX as i32),
            Self::I24 => Some(-8_388_608..=8_388_607),
            Self::I32 => Some(i32::MIN..=i32::MAX),
            Self::F32 => None,
        }
    }
}

impl Display for SampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleFormat::U8 => write!(f, "8-bit unsigned PCM"),
            SampleFormat::I16 => write!(f, "16-bit PCM"),
            SampleFormat::I24 => write!(f, "24-bit PCM"),
            SampleFormat::I32 => write!(f, "32-bit PCM"),
            SampleFormat::F32 => write!(f, "32-bit IEEE float"),
        }
    }
}
