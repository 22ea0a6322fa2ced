//! Decoded, interleaved sample storage.

use anyhow::{Result, bail, ensure};

use crate::structs::format::SampleFormat;
use crate::utils::errors::AnalysisError;

/// Canonical sample storage.
///
/// Integer PCM of every depth widens to `i32` (8-bit is re-centred around
/// zero first); IEEE float stays `f32`.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Int(Vec<i32>),
    Float(Vec<f32>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Int(v) => v.len(),
            Samples::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frame-major, channel-minor samples: all channels of frame 0, then frame 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    format: SampleFormat,
    channel_count: u16,
    frame_count: u32,
    samples: Samples,
}

impl SampleBuffer {
    /// Fails for float formats and for samples outside the format's range.
    pub fn from_i32(format: SampleFormat, channel_count: u16, samples: Vec<i32>) -> Result<Self> {
        let Some(range) = format.int_range() else {
            bail!("{format} samples cannot be stored as integers");
        };
        if let Some(sample) = samples.iter().find(|&&s| !range.contains(&s)) {
            bail!(
                "sample {sample} outside the {format} range {}..={}",
                range.start(),
                range.end()
            );
        }
        Self::with_samples(format, channel_count, Samples::Int(samples))
    }

    pub fn from_f32(channel_count: u16, samples: Vec<f32>) -> Result<Self> {
        Self::with_samples(SampleFormat::F32, channel_count, Samples::Float(samples))
    }

    fn with_samples(format: SampleFormat, channel_count: u16, samples: Samples) -> Result<Self> {
        ensure!(channel_count > 0, "channel_count must be at least 1");
        ensure!(
            samples.len() % channel_count as usize == 0,
            "{} samples do not form whole frames of {channel_count} channels",
            samples.len()
        );

        let frame_count = u32::try_from(samples.len() / channel_count as usize)?;

        Ok(Self {
            format,
            channel_count,
            frame_count,
            samples,
        })
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.format
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Total samples, `frame_count * channel_count`.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    pub fn as_i32(&self) -> Option<&[i32]> {
        match &self.samples {
            Samples::Int(v) => Some(v),
            Samples::Float(_) => None,
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.samples {
            Samples::Float(v) => Some(v),
            Samples::Int(_) => None,
        }
    }

    /// Magnitude that maps an integer sample onto `[-1.0, 1.0]`.
    pub fn full_scale(&self) -> f64 {
        match self.format {
            SampleFormat::U8 => 128.0,
            SampleFormat::I16 => 32768.0,
            SampleFormat::I24 => 8_388_608.0,
            SampleFormat::I32 => 2_147_483_648.0,
            SampleFormat::F32 => 1.0,
        }
    }

    /// Normalized sample at (`frame`, `channel`).
    pub fn get(&self, frame: usize, channel: usize) -> Option<f32> {
        if channel >= self.channel_count as usize {
            return None;
        }
        let index = frame * self.channel_count as usize + channel;
        match &self.samples {
            Samples::Int(v) => v
                .get(index)
                .map(|&s| (s as f64 / self.full_scale()) as f32),
            Samples::Float(v) => v.get(index).copied(),
        }
    }

    /// De-interleaves one channel, normalized to `[-1.0, 1.0]`.
    ///
    /// Non-zero integer samples stay non-zero and keep their sign.
    pub fn channel(&self, channel: usize) -> Result<Vec<f32>> {
        let channels = self.channel_count as usize;
        if channel >= channels {
            bail!(AnalysisError::ChannelOutOfRange { channel, channels });
        }

        let out = match &self.samples {
            Samples::Int(v) => {
                let scale = self.full_scale();
                v.iter()
                    .skip(channel)
                    .step_by(channels)
                    .map(|&s| (s as f64 / scale) as f32)
                    .collect()
            }
            Samples::Float(v) => v.iter().skip(channel).step_by(channels).copied().collect(),
        };

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaving_order() {
        let buffer =
            SampleBuffer::from_i32(SampleFormat::I16, 2, vec![100, -100, 200, -200, 300, -300])
                .unwrap();

        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.len(), 6);
        assert_eq!(
            buffer.channel(0).unwrap(),
            vec![100.0 / 32768.0, 200.0 / 32768.0, 300.0 / 32768.0]
        );
        assert_eq!(buffer.get(1, 1), Some(-200.0 / 32768.0));
        assert_eq!(buffer.get(3, 0), None);
        assert_eq!(buffer.get(0, 2), None);
    }

    #[test]
    fn partial_frames_are_rejected() {
        assert!(SampleBuffer::from_i32(SampleFormat::I16, 2, vec![1, 2, 3]).is_err());
        assert!(SampleBuffer::from_f32(0, vec![]).is_err());
        assert!(SampleBuffer::from_i32(SampleFormat::F32, 1, vec![1]).is_err());
    }

    #[test]
    fn samples_must_fit_the_format() {
        assert!(SampleBuffer::from_i32(SampleFormat::I16, 2, vec![40000, -40000]).is_err());
        assert!(SampleBuffer::from_i32(SampleFormat::U8, 1, vec![128]).is_err());
        assert!(SampleBuffer::from_i32(SampleFormat::I24, 1, vec![-8_388_609]).is_err());

        let edges = vec![i16::MIN as i32, i16::MAX as i32];
        let buffer = SampleBuffer::from_i32(SampleFormat::I16, 2, edges.clone()).unwrap();
        assert_eq!(buffer.as_i32().unwrap(), edges);
    }

    #[test]
    fn channel_out_of_range() {
        let buffer = SampleBuffer::from_f32(1, vec![0.5, -0.5]).unwrap();
        let err = buffer.channel(1).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::ChannelOutOfRange {
                channel: 1,
                channels: 1
            })
        );
    }

    #[test]
    fn smallest_integer_keeps_sign() {
        let buffer = SampleBuffer::from_i32(SampleFormat::I32, 1, vec![1, -1, 0]).unwrap();
        let ch = buffer.channel(0).unwrap();
        assert!(ch[0] > 0.0);
        assert!(ch[1] < 0.0);
        assert_eq!(ch[2], 0.0);
    }
}
