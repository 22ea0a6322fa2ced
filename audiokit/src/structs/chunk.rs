//! RIFF chunk framing.
//!
//! A RIFF file is a `"RIFF" | size | form type` descriptor followed by
//! sub-chunks, each `id | size | body`, with bodies of odd size followed by
//! one pad byte.

use std::fmt::{self, Display};
use std::io;

use audiokit_macros::ToBytes;
use log::trace;

use crate::byteorder::WriteBytesLe;
use crate::utils::chunk_reader::ChunkReader;
use crate::utils::errors::ReadError;

pub const RIFF_TAG: FourCC = FourCC(*b"RIFF");
pub const WAVE_TAG: FourCC = FourCC(*b"WAVE");
pub const FMT_TAG: FourCC = FourCC(*b"fmt ");
pub const DATA_TAG: FourCC = FourCC(*b"data");

/// Size in bytes of a chunk id plus its size field.
pub const CHUNK_HEADER_LEN: u64 = 8;

/// Four-character chunk identifier, printed as text when it is ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, ToBytes)]
pub struct FourCC(pub [u8; 4]);

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            write!(f, "\"{self}\"")
        } else {
            write!(f, "{:02X?}", self.0)
        }
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

/// The outer `RIFF` descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToBytes)]
pub struct RiffDescriptor {
    pub riff_tag: FourCC,
    pub chunk_size: u32,
    pub format_tag: FourCC,
}

impl RiffDescriptor {
    pub fn read<R: io::Read>(reader: &mut ChunkReader<R>) -> Result<Self, ReadError> {
        Ok(Self {
            riff_tag: FourCC(reader.read_tag()?),
            chunk_size: reader.read_u32_le()?,
            format_tag: FourCC(reader.read_tag()?),
        })
    }
}

/// Sub-chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToBytes)]
pub struct ChunkHeader {
    pub id: FourCC,
    pub size: u32,
}

impl ChunkHeader {
    pub fn read<R: io::Read>(reader: &mut ChunkReader<R>) -> Result<Self, ReadError> {
        let offset = reader.position();
        let header = Self {
            id: FourCC(reader.read_tag()?),
            size: reader.read_u32_le()?,
        };

        trace!(
            "chunk {:?} at offset {offset}, {} bytes",
            header.id, header.size
        );

        Ok(header)
    }

    /// Bytes occupied by the body including the pad byte of odd sizes.
    pub fn padded_size(&self) -> u64 {
        self.size as u64 + (self.size & 1) as u64
    }

    /// Skips the body and its pad byte. A pad byte missing at the very end of
    /// the source is tolerated.
    pub fn skip_body<R: io::Read>(&self, reader: &mut ChunkReader<R>) -> Result<(), ReadError> {
        reader.skip(self.size as u64)?;
        if self.size & 1 == 1 && !reader.is_exhausted() {
            reader.skip(1)?;
        }
        Ok(())
    }
}

/// A structure that serializes to a complete RIFF sub-chunk.
///
/// Implemented with `#[riff_chunk(b"....")]`.
pub trait RiffChunk {
    fn chunk_id(&self) -> &[u8; 4];
    fn chunk_data(&self) -> Vec<u8>;

    fn write_chunk(&self, dst: &mut Vec<u8>) {
        let data = self.chunk_data();
        self.chunk_id().write_le(dst);
        (data.len() as u32).write_le(dst);
        dst.extend_from_slice(&data);
        if data.len() & 1 == 1 {
            dst.push(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join_bytes_le;
    use crate::utils::chunk_reader::ChunkSliceReader;

    #[test]
    fn fourcc_debug() {
        assert_eq!(format!("{:?}", FourCC(*b"fmt ")), "\"fmt \"");
        assert_eq!(format!("{:?}", FourCC([0, 1, 2, 3])), "[00, 01, 02, 03]");
    }

    #[test]
    fn odd_chunk_skips_pad_byte() {
        let data = join_bytes_le!(*b"LIST", 3u32, [1u8, 2, 3], 0u8, *b"data");
        let mut reader = ChunkSliceReader::from_slice(&data);

        let header = ChunkHeader::read(&mut reader).unwrap();
        assert_eq!(header.id, FourCC(*b"LIST"));
        assert_eq!(header.padded_size(), 4);

        header.skip_body(&mut reader).unwrap();
        assert_eq!(&reader.read_tag::<4>().unwrap(), b"data");
    }

    #[test]
    fn missing_trailing_pad_is_tolerated() {
        let data = join_bytes_le!(*b"junk", 1u32, 9u8);
        let mut reader = ChunkSliceReader::from_slice(&data);

        let header = ChunkHeader::read(&mut reader).unwrap();
        header.skip_body(&mut reader).unwrap();
        assert!(reader.is_exhausted());
    }

    #[test]
    fn descriptor_serializes_back() {
        let bytes = join_bytes_le!(*b"RIFF", 36u32, *b"WAVE");
        let mut reader = ChunkSliceReader::from_slice(&bytes);
        let desc = RiffDescriptor::read(&mut reader).unwrap();

        assert_eq!(desc.riff_tag, RIFF_TAG);
        assert_eq!(desc.chunk_size, 36);
        assert_eq!(desc.format_tag, WAVE_TAG);

        let mut out = Vec::new();
        desc.write_le(&mut out);
        assert_eq!(out, bytes);
    }
}
