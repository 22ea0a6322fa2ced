//! Byte-level cursor for walking RIFF chunks.
//!
//! Every read is bounds-checked against the declared source length before it
//! reaches the underlying reader, so a short source fails with
//! [`ReadError::Truncated`] instead of a partial read.

use std::io;

use bitstream_io::{ByteRead, ByteReader, LittleEndian};

use crate::utils::errors::ReadError;

pub struct ChunkReader<R: io::Read> {
    bs: ByteReader<R, LittleEndian>,
    len: u64,
    pos: u64,
}

pub type ChunkSliceReader<'a> = ChunkReader<io::Cursor<&'a [u8]>>;

impl<R> ChunkReader<R>
where
    R: io::Read,
{
    pub fn new(read: R, len_bytes: u64) -> Self {
        Self {
            bs: ByteReader::endian(read, LittleEndian),
            len: len_bytes,
            pos: 0,
        }
    }

    #[inline(always)]
    fn ensure(&self, n: u64) -> Result<(), ReadError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(ReadError::Truncated {
                requested: n,
                remaining,
                offset: self.pos,
            });
        }
        Ok(())
    }

    /// Reads the next `N` bytes as a tag, without validating them.
    #[inline(always)]
    pub fn read_tag<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        self.ensure(N as u64)?;
        let mut tag = [0u8; N];
        self.bs.read_bytes(&mut tag)?;
        self.pos += N as u64;
        Ok(tag)
    }

    #[inline(always)]
    pub fn read_u16_le(&mut self) -> Result<u16, ReadError> {
        self.ensure(2)?;
        let value = self.bs.read::<u16>()?;
        self.pos += 2;
        Ok(value)
    }

    #[inline(always)]
    pub fn read_u32_le(&mut self) -> Result<u32, ReadError> {
        self.ensure(4)?;
        let value = self.bs.read::<u32>()?;
        self.pos += 4;
        Ok(value)
    }

    /// Advances past `n` bytes without reading them.
    pub fn skip(&mut self, n: u64) -> Result<(), ReadError> {
        self.ensure(n)?;

        // ByteRead::skip takes a u32 count
        let mut left = n;
        while left > 0 {
            let step = left.min(u32::MAX as u64);
            self.bs.skip(step as u32)?;
            left -= step;
        }
        self.pos += n;

        Ok(())
    }

    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline(always)]
    pub fn remaining(&self) -> u64 {
        self.len - self.pos
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.len
    }
}

impl<'a> ChunkSliceReader<'a> {
    pub fn from_slice(buf: &'a [u8]) -> Self {
        let len = buf.len() as u64;
        let read = io::Cursor::new(buf);

        Self::new(read, len)
    }
}

impl Default for ChunkSliceReader<'_> {
    fn default() -> Self {
        Self::from_slice(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let data = [b'R', b'I', b'F', b'F', 0x24, 0x08, 0x00, 0x00, 0x01, 0x00];
        let mut reader = ChunkSliceReader::from_slice(&data);

        assert_eq!(&reader.read_tag::<4>().unwrap(), b"RIFF");
        assert_eq!(reader.read_u32_le().unwrap(), 0x0824);
        assert_eq!(reader.read_u16_le().unwrap(), 1);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn short_read_does_not_advance() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = ChunkSliceReader::from_slice(&data);

        let err = reader.read_u32_le().unwrap_err();
        assert!(matches!(
            err,
            ReadError::Truncated {
                requested: 4,
                remaining: 3,
                offset: 0
            }
        ));
        assert_eq!(reader.position(), 0);

        // the bytes that are there are still readable
        assert_eq!(reader.read_u16_le().unwrap(), 0x0201);
        assert!(reader.read_u16_le().is_err());
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn skip_is_bounded() {
        let data = [0u8; 10];
        let mut reader = ChunkSliceReader::from_slice(&data);

        reader.skip(6).unwrap();
        assert_eq!(reader.position(), 6);
        assert!(matches!(
            reader.skip(5),
            Err(ReadError::Truncated { requested: 5, .. })
        ));
        reader.skip(4).unwrap();
        assert!(reader.is_exhausted());
        assert!(reader.read_tag::<1>().is_err());
    }

    #[test]
    fn empty_source() {
        let mut reader = ChunkSliceReader::default();
        assert!(reader.is_exhausted());
        assert!(reader.read_tag::<4>().is_err());
        reader.skip(0).unwrap();
    }
}
