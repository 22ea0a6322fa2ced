use anyhow::Result;

use crate::structs::header::WaveHeader;
use crate::structs::sample_buffer::SampleBuffer;

/// Header parsing.
///
/// Provides the [`Parser`](parse::Parser) that validates the RIFF/WAVE layout
/// and produces a [`WaveHeader`](crate::structs::header::WaveHeader).
pub mod parse;

/// Sample extraction.
///
/// Turns the `data` payload described by a header into a
/// [`SampleBuffer`](crate::structs::sample_buffer::SampleBuffer).
pub mod extract;

/// Feature computation over decoded samples.
///
/// Zero-crossing rate, RMS and amplitude envelope, globally or per window.
pub mod analyze;

/// Canonical WAVE output.
///
/// Provides the [`WavWriter`](write::WavWriter) used to re-emit decoded audio
/// with a canonical 44-byte header.
pub mod write;

/// A parsed header together with the samples it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub header: WaveHeader,
    pub samples: SampleBuffer,
}

impl Decoded {
    /// Whole frames actually extracted, which can be fewer than the header
    /// promises when the source was truncated mid-frame.
    pub fn frame_count(&self) -> u32 {
        self.samples.frame_count()
    }

    pub fn channel_count(&self) -> u16 {
        self.samples.channel_count()
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate()
    }
}

/// Parses and extracts an in-memory WAVE source with default settings.
pub fn decode(source: &[u8]) -> Result<Decoded> {
    parse::Parser::default().decode(source)
}
