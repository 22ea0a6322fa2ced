use std::io::{self, BufWriter, Cursor, Seek, SeekFrom, Write};

use anyhow::{Result, bail};
use log::trace;

use crate::byteorder::WriteBytesLe;
use crate::structs::chunk::{ChunkHeader, DATA_TAG, RIFF_TAG, RiffChunk, RiffDescriptor, WAVE_TAG};
use crate::structs::format::{FmtChunk, SampleFormat};
use crate::structs::sample_buffer::{SampleBuffer, Samples};

/// RIFF/WAVE writer producing a canonical 44-byte header.
///
/// Size fields are written as zero by [`write_header`](Self::write_header) and
/// patched by [`finish`](Self::finish) once the payload length is known.
pub struct WavWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    riff_size_position: u64,
    data_size_position: u64,
    data_written: u64,
    sample_rate: u32,
    channels: u16,
    format: SampleFormat,
    header_written: bool,
}

impl<W: Write + Seek> WavWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            riff_size_position: 0,
            data_size_position: 0,
            data_written: 0,
            sample_rate: 48000,
            channels: 2,
            format: SampleFormat::I16,
            header_written: false,
        }
    }

    /// Configure audio format parameters
    pub fn configure_audio_format(
        &mut self,
        sample_rate: u32,
        channels: u16,
        format: SampleFormat,
    ) -> io::Result<()> {
        if self.header_written {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Cannot change format after writing the header",
            ));
        }
        if channels == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "channel count must be at least 1",
            ));
        }
        FmtChunk::canonical(format, channels, sample_rate).map_err(invalid_input)?;

        self.sample_rate = sample_rate;
        self.channels = channels;
        self.format = format;
        Ok(())
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        let mut header = Vec::with_capacity(44);

        let start = self.writer.stream_position()?;
        self.riff_size_position = start + 4;
        RiffDescriptor {
            riff_tag: RIFF_TAG,
            chunk_size: 0,
            format_tag: WAVE_TAG,
        }
        .write_le(&mut header);

        FmtChunk::canonical(self.format, self.channels, self.sample_rate)
            .map_err(invalid_input)?
            .write_chunk(&mut header);

        self.data_size_position = start + header.len() as u64 + 4;
        ChunkHeader {
            id: DATA_TAG,
            size: 0,
        }
        .write_le(&mut header);

        self.writer.write_all(&header)?;
        self.header_written = true;
        Ok(())
    }

    /// Writes interleaved samples in the configured format.
    ///
    /// Integer formats take `i32` samples at their native scale; 8-bit values
    /// in `[-128, 127]` are stored offset-binary. Nothing is written when any
    /// sample falls outside the format's range.
    pub fn write_samples(&mut self, samples: &[i32]) -> io::Result<()> {
        let Some(range) = self.format.int_range() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "float output takes f32 samples",
            ));
        };
        if let Some(sample) = samples.iter().find(|&&s| !range.contains(&s)) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("sample {sample} does not fit {} output", self.format),
            ));
        }

        let width = self.format.bytes_per_sample();
        for &sample in samples {
            match self.format {
                SampleFormat::U8 => self.writer.write_all(&[(sample + 128) as u8])?,
                _ => self.writer.write_all(&sample.to_le_bytes()[..width])?,
            }
            self.data_written += width as u64;
        }
        Ok(())
    }

    pub fn write_float_samples(&mut self, samples: &[f32]) -> io::Result<()> {
        if self.format != SampleFormat::F32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} output takes i32 samples", self.format),
            ));
        }
        for &sample in samples {
            self.writer.write_all(&sample.to_le_bytes())?;
            self.data_written += 4;
        }
        Ok(())
    }

    /// Writes every sample of `buffer`.
    pub fn write_buffer(&mut self, buffer: &SampleBuffer) -> io::Result<()> {
        match buffer.samples() {
            Samples::Int(v) => self.write_samples(v),
            Samples::Float(v) => self.write_float_samples(v),
        }
    }

    /// Pads the `data` chunk to an even length and patches both size fields.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.data_written & 1 == 1 {
            self.writer.write_all(&[0])?;
        }
        self.writer.flush()?;

        let current_pos = self.writer.stream_position()?;
        let data_size = u32::try_from(self.data_written)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "data chunk exceeds 4 GiB"))?;
        let riff_size = u32::try_from(current_pos - self.riff_size_position - 4)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "RIFF chunk exceeds 4 GiB"))?;

        trace!("Patching data size {data_size}, RIFF size {riff_size}");

        self.writer.seek(SeekFrom::Start(self.data_size_position))?;
        self.writer.write_all(&data_size.to_le_bytes())?;

        self.writer.seek(SeekFrom::Start(self.riff_size_position))?;
        self.writer.write_all(&riff_size.to_le_bytes())?;

        self.writer.seek(SeekFrom::Start(current_pos))?;
        self.writer.flush()?;

        Ok(())
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }

    pub fn stats(&self) -> WavStats {
        WavStats {
            data_written: self.data_written,
            sample_rate: self.sample_rate,
            channels: self.channels,
            format: self.format,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WavStats {
    pub data_written: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
}

impl WavStats {
    pub fn duration_seconds(&self) -> f64 {
        let bytes_per_second =
            self.sample_rate as u64 * self.channels as u64 * self.format.bytes_per_sample() as u64;
        if bytes_per_second == 0 {
            0.0
        } else {
            self.data_written as f64 / bytes_per_second as f64
        }
    }

    pub fn total_samples(&self) -> u64 {
        self.data_written / self.format.bytes_per_sample() as u64
    }
}

fn invalid_input(err: anyhow::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

/// Serializes `buffer` as a complete canonical WAVE file.
pub fn to_wav_bytes(buffer: &SampleBuffer, sample_rate: u32) -> Result<Vec<u8>> {
    if buffer.channel_count() == 0 {
        bail!("cannot write a buffer without channels");
    }

    let mut writer = WavWriter::new(Cursor::new(Vec::new()));
    writer.configure_audio_format(sample_rate, buffer.channel_count(), buffer.sample_format())?;
    writer.write_header()?;
    writer.write_buffer(buffer)?;
    writer.finish()?;

    Ok(writer.into_inner()?.into_inner())
}
