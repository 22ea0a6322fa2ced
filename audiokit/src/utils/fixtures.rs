//! In-memory WAVE sources for tests.

use crate::join_bytes_le;

/// Layout of a synthetic WAVE file. `None` overrides mean "derive it".
#[derive(Debug, Clone)]
pub struct WavSpec {
    pub audio_format: u16,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub block_align: Option<u16>,
    pub byte_rate: Option<u32>,
    pub chunk_size: Option<u32>,
    pub data_size: Option<u32>,
    pub fmt_extension: Vec<u8>,
    pub extra_chunks: Vec<([u8; 4], Vec<u8>)>,
    pub omit_data_chunk: bool,
}

impl WavSpec {
    pub fn pcm(channel_count: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            audio_format: 1,
            channel_count,
            sample_rate,
            bits_per_sample,
            block_align: None,
            byte_rate: None,
            chunk_size: None,
            data_size: None,
            fmt_extension: Vec::new(),
            extra_chunks: Vec::new(),
            omit_data_chunk: false,
        }
    }

    pub fn float(channel_count: u16, sample_rate: u32) -> Self {
        Self {
            audio_format: 3,
            ..Self::pcm(channel_count, sample_rate, 32)
        }
    }
}

fn pad(mut body: Vec<u8>) -> Vec<u8> {
    if body.len() & 1 == 1 {
        body.push(0);
    }
    body
}

/// Assembles `RIFF | fmt | extra chunks | data` around `payload`.
pub fn wav_bytes(spec: &WavSpec, payload: &[u8]) -> Vec<u8> {
    let block_align = spec
        .block_align
        .unwrap_or(spec.channel_count * (spec.bits_per_sample / 8));
    let byte_rate = spec
        .byte_rate
        .unwrap_or(spec.sample_rate * block_align as u32);

    let mut body = join_bytes_le!(
        *b"WAVE",
        *b"fmt ",
        16u32 + spec.fmt_extension.len() as u32,
        spec.audio_format,
        spec.channel_count,
        spec.sample_rate,
        byte_rate,
        block_align,
        spec.bits_per_sample,
        pad(spec.fmt_extension.clone())
    );

    for (id, data) in &spec.extra_chunks {
        body.extend(join_bytes_le!(*id, data.len() as u32, pad(data.clone())));
    }

    if !spec.omit_data_chunk {
        let data_size = spec.data_size.unwrap_or(payload.len() as u32);
        body.extend(join_bytes_le!(*b"data", data_size));
        body.extend_from_slice(payload);
    }

    let chunk_size = spec.chunk_size.unwrap_or(body.len() as u32);
    let mut out = join_bytes_le!(*b"RIFF", chunk_size);
    out.extend(body);
    out
}

/// Little-endian 16-bit payload.
pub fn pcm16(samples: &[i16]) -> Vec<u8> {
    join_bytes_le!(samples.to_vec())
}
