use anyhow::{Result, anyhow, bail};
use log::Level::{Info, Warn};
use log::{debug, warn};

use crate::log_or_err;
use crate::process::Decoded;
use crate::process::extract::extract;
use crate::structs::chunk::{
    CHUNK_HEADER_LEN, ChunkHeader, DATA_TAG, FMT_TAG, RIFF_TAG, RiffDescriptor, WAVE_TAG,
};
use crate::structs::format::{
    CANONICAL_FMT_LEN, FmtChunk, SampleFormat, WAVE_FORMAT_IEEE_FLOAT, WAVE_FORMAT_PCM,
};
use crate::structs::header::{HeaderWarning, WaveHeader};
use crate::utils::chunk_reader::ChunkSliceReader;
use crate::utils::errors::{ExtractError, ParseError};

/// Parses RIFF/WAVE sources into a [`WaveHeader`].
///
/// The `fmt ` chunk must be the first chunk after the RIFF descriptor. Any
/// chunks between `fmt ` and `data` are skipped.
///
/// A `data_size` larger than the bytes left in the source is always
/// truncated to what is available and recorded as
/// [`HeaderWarning::DataTruncated`]; it never fails the parse.
#[derive(Debug, Clone)]
pub struct Parser {
    pub(crate) fail_level: log::Level,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            fail_level: log::Level::Error,
        }
    }
}

impl Parser {
    /// Sets the failure level for header consistency findings.
    ///
    /// - `log::Level::Error`: findings are logged and kept in the header (default)
    /// - `log::Level::Warn`: `block_align`/`byte_rate` mismatches fail the parse (strict mode)
    /// - `log::Level::Info`: RIFF `chunk_size` mismatches fail as well
    pub fn set_fail_level(&mut self, level: log::Level) {
        self.fail_level = level;
    }

    pub fn fail_level(&self) -> log::Level {
        self.fail_level
    }

    /// Parses the header of an in-memory WAVE source.
    pub fn parse(&self, source: &[u8]) -> Result<WaveHeader> {
        let reader = &mut ChunkSliceReader::from_slice(source);
        let mut warnings = Vec::new();

        let riff = self.read_descriptor(reader, &mut warnings)?;

        if reader.remaining() < CHUNK_HEADER_LEN {
            bail!(ParseError::MissingFmtChunk);
        }
        let fmt_header = ChunkHeader::read(reader)?;
        if fmt_header.id != FMT_TAG {
            bail!(ParseError::UnexpectedChunk {
                found: fmt_header.id
            });
        }
        if fmt_header.size < CANONICAL_FMT_LEN {
            bail!(ParseError::FmtChunkTooSmall(fmt_header.size));
        }

        let fmt = FmtChunk::read(reader)?;

        if fmt_header.size > CANONICAL_FMT_LEN {
            let extension = ChunkHeader {
                id: fmt_header.id,
                size: fmt_header.size - CANONICAL_FMT_LEN,
            };
            debug!("Skipping {} bytes of fmt extension", extension.size);
            extension.skip_body(reader)?;
        }

        match fmt.audio_format {
            WAVE_FORMAT_PCM | WAVE_FORMAT_IEEE_FLOAT => {}
            other => bail!(ParseError::UnsupportedFormat(other)),
        }
        if fmt.channel_count == 0 {
            bail!(ParseError::InvalidChannelCount);
        }
        if fmt.sample_rate == 0 {
            bail!(ParseError::InvalidSampleRate);
        }

        debug!(
            "fmt: audio_format={} channels={} sample_rate={} byte_rate={} block_align={} bits_per_sample={}",
            fmt.audio_format,
            fmt.channel_count,
            fmt.sample_rate,
            fmt.byte_rate,
            fmt.block_align,
            fmt.bits_per_sample
        );

        let (data_header, skipped_chunks) = Self::find_data_chunk(reader)?;

        let data_offset = reader.position();
        let available = u32::try_from(reader.remaining()).unwrap_or(u32::MAX);
        let data_len = data_header.size.min(available);

        if data_header.size > available {
            let warning = HeaderWarning::DataTruncated {
                declared: data_header.size,
                available,
            };
            warn!("{warning}");
            warnings.push(warning);
        }

        if SampleFormat::from_fields(fmt.audio_format, fmt.bits_per_sample).is_none() {
            bail!(ParseError::UnsupportedBitDepth {
                bits: fmt.bits_per_sample,
                audio_format: fmt.audio_format,
            });
        }

        self.check_derived_fields(&fmt, &mut warnings)?;

        debug!(
            "data: {} bytes declared, {data_len} available at offset {data_offset}",
            data_header.size
        );

        Ok(WaveHeader {
            riff,
            fmt_marker: fmt_header.id,
            fmt_chunk_size: fmt_header.size,
            fmt,
            data_marker: data_header.id,
            data_size: data_header.size,
            data_offset,
            data_len,
            skipped_chunks,
            warnings,
        })
    }

    /// Parses the header and extracts the samples it describes.
    pub fn decode(&self, source: &[u8]) -> Result<Decoded> {
        let header = self.parse(source)?;

        let start = usize::try_from(header.data_offset)?;
        let end = start + header.data_len as usize;
        let Some(payload) = source.get(start..end) else {
            bail!(ExtractError::PayloadOutOfBounds {
                start: start as u64,
                end: end as u64,
                len: source.len() as u64,
            });
        };

        let samples = extract(&header, payload)?;

        Ok(Decoded { header, samples })
    }

    fn read_descriptor(
        &self,
        reader: &mut ChunkSliceReader,
        warnings: &mut Vec<HeaderWarning>,
    ) -> Result<RiffDescriptor> {
        let riff = RiffDescriptor::read(reader)?;
        if riff.riff_tag != RIFF_TAG {
            bail!(ParseError::BadMagic {
                expected: RIFF_TAG,
                found: riff.riff_tag,
            });
        }
        if riff.format_tag != WAVE_TAG {
            bail!(ParseError::BadMagic {
                expected: WAVE_TAG,
                found: riff.format_tag,
            });
        }

        let actual = reader.position() + reader.remaining() - CHUNK_HEADER_LEN;
        if riff.chunk_size as u64 != actual {
            self.report(
                Info,
                HeaderWarning::ChunkSizeMismatch {
                    declared: riff.chunk_size,
                    actual,
                },
                warnings,
            )?;
        }

        Ok(riff)
    }

    /// Walks chunks until `data`, returning its header and whatever was
    /// skipped on the way.
    fn find_data_chunk(
        reader: &mut ChunkSliceReader,
    ) -> Result<(ChunkHeader, Vec<ChunkHeader>)> {
        let mut skipped = Vec::new();

        loop {
            if reader.remaining() < CHUNK_HEADER_LEN {
                bail!(ParseError::MissingDataChunk);
            }

            let header = ChunkHeader::read(reader)?;
            if header.id == DATA_TAG {
                return Ok((header, skipped));
            }

            if header.size as u64 > reader.remaining() {
                debug!(
                    "Chunk {:?} declares {} bytes, only {} remain",
                    header.id,
                    header.size,
                    reader.remaining()
                );
                bail!(ParseError::MissingDataChunk);
            }

            debug!("Skipping chunk {:?} ({} bytes)", header.id, header.size);
            header.skip_body(reader)?;
            skipped.push(header);
        }
    }

    fn check_derived_fields(
        &self,
        fmt: &FmtChunk,
        warnings: &mut Vec<HeaderWarning>,
    ) -> Result<()> {
        let derived_block_align = fmt.derived_block_align();
        if fmt.block_align as u32 != derived_block_align {
            self.report(
                Warn,
                HeaderWarning::BlockAlignMismatch {
                    declared: fmt.block_align,
                    derived: derived_block_align,
                },
                warnings,
            )?;
        }

        let derived_byte_rate = fmt.derived_byte_rate();
        if fmt.byte_rate as u64 != derived_byte_rate {
            self.report(
                Warn,
                HeaderWarning::ByteRateMismatch {
                    declared: fmt.byte_rate,
                    derived: derived_byte_rate,
                },
                warnings,
            )?;
        }

        Ok(())
    }

    fn report(
        &self,
        level: log::Level,
        warning: HeaderWarning,
        warnings: &mut Vec<HeaderWarning>,
    ) -> Result<()> {
        log_or_err!(self, level, anyhow!(ParseError::Inconsistent(warning)));
        warnings.push(warning);
        Ok(())
    }
}
