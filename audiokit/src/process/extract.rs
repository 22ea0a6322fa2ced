use anyhow::{Result, bail};
use log::{debug, trace};

use crate::structs::format::{SampleFormat, WAVE_FORMAT_IEEE_FLOAT, WAVE_FORMAT_PCM};
use crate::structs::header::WaveHeader;
use crate::structs::sample_buffer::{SampleBuffer, Samples};
use crate::utils::errors::{ExtractError, ParseError};

/// Decodes the `data` payload described by `header` into a [`SampleBuffer`].
///
/// At most `min(header.data_size, raw.len())` bytes are consumed. A trailing
/// partial frame is dropped. 8-bit PCM is re-centred to `[-128, 127]`, wider
/// integer PCM is sign-extended to `i32`, IEEE float is read as-is.
pub fn extract(header: &WaveHeader, raw: &[u8]) -> Result<SampleBuffer> {
    let bits = header.bits_per_sample();
    let format = match SampleFormat::from_fields(header.audio_format(), bits) {
        Some(format) => format,
        None => match header.audio_format() {
            WAVE_FORMAT_PCM | WAVE_FORMAT_IEEE_FLOAT => {
                bail!(ExtractError::UnsupportedBitDepth { bits })
            }
            other => bail!(ParseError::UnsupportedFormat(other)),
        },
    };

    let channel_count = header.channel_count();
    if channel_count == 0 {
        bail!(ParseError::InvalidChannelCount);
    }

    let bytes_per_sample = format.bytes_per_sample();
    let frame_bytes = bytes_per_sample * channel_count as usize;
    let usable = raw.len().min(header.data_size as usize);
    let frame_count = usable / frame_bytes;
    let payload = &raw[..frame_count * frame_bytes];

    if usable != payload.len() {
        debug!(
            "Dropping {} trailing bytes of a partial frame",
            usable - payload.len()
        );
    }

    let sample_count = frame_count as u64 * channel_count as u64;
    trace!("Extracting {frame_count} frames of {format}, {sample_count} samples");

    let samples = match format {
        SampleFormat::F32 => {
            let mut out = allocate::<f32>(sample_count)?;
            out.extend(
                payload
                    .chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
            Samples::Float(out)
        }
        _ => {
            let mut out = allocate::<i32>(sample_count)?;
            let decode: fn(&[u8]) -> i32 = match format {
                SampleFormat::U8 => decode_u8,
                SampleFormat::I16 => decode_i16,
                SampleFormat::I24 => decode_i24,
                _ => decode_i32,
            };
            out.extend(payload.chunks_exact(bytes_per_sample).map(decode));
            Samples::Int(out)
        }
    };

    let buffer = match samples {
        Samples::Int(v) => SampleBuffer::from_i32(format, channel_count, v)?,
        Samples::Float(v) => SampleBuffer::from_f32(channel_count, v)?,
    };

    Ok(buffer)
}

/// Reserves exactly `len` elements, reporting failure as
/// [`ExtractError::OutOfMemory`] instead of aborting.
pub(crate) fn allocate<T>(len: u64) -> Result<Vec<T>> {
    let oom = ExtractError::OutOfMemory { samples: len };
    let Ok(len) = usize::try_from(len) else {
        bail!(oom);
    };

    let mut out = Vec::new();
    if out.try_reserve_exact(len).is_err() {
        bail!(oom);
    }
    Ok(out)
}

#[inline(always)]
fn decode_u8(b: &[u8]) -> i32 {
    b[0] as i32 - 128
}

#[inline(always)]
fn decode_i16(b: &[u8]) -> i32 {
    i16::from_le_bytes([b[0], b[1]]) as i32
}

#[inline(always)]
fn decode_i24(b: &[u8]) -> i32 {
    // place the 24 bits at the top, then shift back down arithmetically
    i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8
}

#[inline(always)]
fn decode_i32(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join_bytes_le;
    use crate::process::parse::Parser;
    use crate::structs::format::FmtChunk;
    use crate::utils::errors::ErrorCode;
    use crate::utils::fixtures::{WavSpec, pcm16, wav_bytes};

    fn header(format: SampleFormat, channels: u16, data_size: u32) -> WaveHeader {
        WaveHeader {
            fmt: FmtChunk::canonical(format, channels, 48000).unwrap(),
            data_size,
            data_len: data_size,
            ..Default::default()
        }
    }

    #[test]
    fn sixteen_bit_stereo() {
        let raw = pcm16(&[100, -100, i16::MAX, i16::MIN, 0, 1]);
        let buffer = extract(&header(SampleFormat::I16, 2, raw.len() as u32), &raw).unwrap();

        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(
            buffer.as_i32().unwrap(),
            [100, -100, 32767, -32768, 0, 1]
        );
    }

    #[test]
    fn eight_bit_is_offset_binary() {
        let raw = [0u8, 128, 255, 129];
        let buffer = extract(&header(SampleFormat::U8, 1, 4), &raw).unwrap();
        assert_eq!(buffer.as_i32().unwrap(), [-128, 0, 127, 1]);
    }

    #[test]
    fn twenty_four_bit_sign_extension() {
        let raw = [
            0xFF, 0xFF, 0x7F, // 8388607
            0x00, 0x00, 0x80, // -8388608
            0xFF, 0xFF, 0xFF, // -1
            0x01, 0x00, 0x00, // 1
        ];
        let buffer = extract(&header(SampleFormat::I24, 2, 12), &raw).unwrap();
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.as_i32().unwrap(), [8_388_607, -8_388_608, -1, 1]);
    }

    #[test]
    fn thirty_two_bit_int_and_float() {
        let raw = join_bytes_le!(i32::MIN, -5i32);
        let buffer = extract(&header(SampleFormat::I32, 1, 8), &raw).unwrap();
        assert_eq!(buffer.as_i32().unwrap(), [i32::MIN, -5]);

        let raw = join_bytes_le!(0.5f32, -1.0f32, 0.0f32, 0.25f32);
        let buffer = extract(&header(SampleFormat::F32, 2, 16), &raw).unwrap();
        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.as_f32().unwrap(), [0.5, -1.0, 0.0, 0.25]);
    }

    #[test]
    fn never_reads_past_declared_size() {
        // 8 bytes present, 4 declared
        let raw = pcm16(&[1, 2, 3, 4]);
        let buffer = extract(&header(SampleFormat::I16, 1, 4), &raw).unwrap();
        assert_eq!(buffer.as_i32().unwrap(), [1, 2]);
    }

    #[test]
    fn never_reads_past_source() {
        // 1000 declared, 6 present
        let raw = pcm16(&[7, 8, 9]);
        let buffer = extract(&header(SampleFormat::I16, 1, 1000), &raw).unwrap();
        assert_eq!(buffer.as_i32().unwrap(), [7, 8, 9]);
    }

    #[test]
    fn partial_trailing_frame_is_dropped() {
        // 2.5 stereo frames of 16-bit
        let raw = pcm16(&[1, 2, 3, 4, 5]);
        let buffer = extract(&header(SampleFormat::I16, 2, 10), &raw).unwrap();

        assert_eq!(buffer.frame_count(), 2);
        assert_eq!(buffer.as_i32().unwrap(), [1, 2, 3, 4]);
        assert!(
            buffer.frame_count() as usize * buffer.channel_count() as usize * 2 <= raw.len()
        );
    }

    #[test]
    fn unsupported_depth() {
        let mut h = header(SampleFormat::I16, 1, 4);
        h.fmt.bits_per_sample = 12;
        let err = extract(&h, &[0; 4]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::UnsupportedBitDepth { bits: 12 })
        ));
        assert_eq!(ErrorCode::of(&err), ErrorCode::Format);
    }

    #[test]
    fn allocation_failure_is_distinguishable() {
        let err = allocate::<i32>(u64::MAX).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::OutOfMemory { samples: u64::MAX })
        ));
        assert_eq!(ErrorCode::of(&err), ErrorCode::OutOfMemory);
    }

    #[test]
    fn through_parser() {
        let bytes = wav_bytes(&WavSpec::pcm(2, 44100, 16), &pcm16(&[5, -5, 6, -6]));
        let decoded = Parser::default().decode(&bytes).unwrap();

        assert_eq!(decoded.header.frame_count(), 2);
        assert_eq!(decoded.frame_count(), 2);
        assert_eq!(decoded.samples.as_i32().unwrap(), [5, -5, 6, -6]);
    }
}
