use std::fmt::Display;

use anyhow::{Result, bail};

use crate::structs::sample_buffer::SampleBuffer;
use crate::utils::errors::AnalysisError;

/// How a channel is cut into analysis windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// One value over the whole channel.
    #[default]
    Global,
    /// One value per window of `window_size` samples, advancing by
    /// `hop_size`. A last window shorter than `window_size` is dropped.
    Framed { window_size: usize, hop_size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisConfig {
    pub mode: WindowMode,
    /// Channel analysed by the single-channel entry points.
    pub channel: usize,
}

impl AnalysisConfig {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn framed(window_size: usize, hop_size: usize) -> Self {
        Self {
            mode: WindowMode::Framed {
                window_size,
                hop_size,
            },
            channel: 0,
        }
    }

    pub fn with_channel(self, channel: usize) -> Self {
        Self { channel, ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureResult {
    Global(f64),
    Framed(Vec<f64>),
}

pub type ZcrResult = FeatureResult;

impl FeatureResult {
    pub fn as_global(&self) -> Option<f64> {
        match self {
            FeatureResult::Global(v) => Some(*v),
            FeatureResult::Framed(_) => None,
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            FeatureResult::Global(v) => std::slice::from_ref(v),
            FeatureResult::Framed(v) => v,
        }
    }
}

/// Per-window signal statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    ZeroCrossingRate,
    Rms,
    AmplitudeEnvelope,
}

impl Feature {
    /// Shortest window the feature is defined on.
    pub fn min_window(self) -> usize {
        match self {
            Feature::ZeroCrossingRate => 2,
            Feature::Rms | Feature::AmplitudeEnvelope => 1,
        }
    }

    /// Computes the feature over one window already checked against
    /// [`min_window`](Self::min_window).
    fn window_value(self, window: &[f32]) -> f64 {
        match self {
            Feature::ZeroCrossingRate => zcr_window(window),
            Feature::Rms => rms_window(window),
            Feature::AmplitudeEnvelope => peak_window(window),
        }
    }

    /// Computes the feature on one channel of `buffer`.
    pub fn compute(self, buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<FeatureResult> {
        let channel = buffer.channel(config.channel)?;
        self.compute_slice(&channel, config.mode)
    }

    /// Computes the feature on every channel of `buffer` independently.
    pub fn compute_per_channel(
        self,
        buffer: &SampleBuffer,
        mode: WindowMode,
    ) -> Result<Vec<FeatureResult>> {
        (0..buffer.channel_count() as usize)
            .map(|ch| self.compute_slice(&buffer.channel(ch)?, mode))
            .collect()
    }

    /// Computes the feature on a single de-interleaved channel.
    pub fn compute_slice(self, samples: &[f32], mode: WindowMode) -> Result<FeatureResult> {
        let required = self.min_window();

        match mode {
            WindowMode::Global => {
                if samples.len() < required {
                    bail!(AnalysisError::InsufficientSamples {
                        len: samples.len(),
                        required,
                    });
                }
                Ok(FeatureResult::Global(self.window_value(samples)))
            }
            WindowMode::Framed {
                window_size,
                hop_size,
            } => {
                if window_size < required {
                    bail!(AnalysisError::InsufficientSamples {
                        len: window_size,
                        required,
                    });
                }
                if hop_size == 0 {
                    bail!(AnalysisError::InvalidHopSize);
                }
                if samples.len() < window_size {
                    bail!(AnalysisError::InsufficientSamples {
                        len: samples.len(),
                        required: window_size,
                    });
                }

                let count = (samples.len() - window_size) / hop_size + 1;
                let values = (0..count)
                    .map(|i| {
                        let start = i * hop_size;
                        self.window_value(&samples[start..start + window_size])
                    })
                    .collect();

                Ok(FeatureResult::Framed(values))
            }
        }
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feature::ZeroCrossingRate => write!(f, "zero-crossing rate"),
            Feature::Rms => write!(f, "RMS"),
            Feature::AmplitudeEnvelope => write!(f, "amplitude envelope"),
        }
    }
}

/// Zero-crossing rate of one channel of `buffer`, in `[0.0, 1.0]`.
///
/// A pair of neighbouring samples crosses when their signs differ, with zero
/// as its own sign: `+,-` crosses, `+,0` crosses, `0,0` does not.
pub fn zero_crossing_rate(buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<ZcrResult> {
    Feature::ZeroCrossingRate.compute(buffer, config)
}

pub fn zero_crossing_rate_per_channel(
    buffer: &SampleBuffer,
    mode: WindowMode,
) -> Result<Vec<ZcrResult>> {
    Feature::ZeroCrossingRate.compute_per_channel(buffer, mode)
}

/// Root-mean-square level of one channel of `buffer`, on normalized samples.
pub fn rms(buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<FeatureResult> {
    Feature::Rms.compute(buffer, config)
}

pub fn rms_per_channel(buffer: &SampleBuffer, mode: WindowMode) -> Result<Vec<FeatureResult>> {
    Feature::Rms.compute_per_channel(buffer, mode)
}

/// Peak absolute amplitude of one channel of `buffer`, on normalized samples.
pub fn amplitude_envelope(buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<FeatureResult> {
    Feature::AmplitudeEnvelope.compute(buffer, config)
}

pub fn amplitude_envelope_per_channel(
    buffer: &SampleBuffer,
    mode: WindowMode,
) -> Result<Vec<FeatureResult>> {
    Feature::AmplitudeEnvelope.compute_per_channel(buffer, mode)
}

#[inline(always)]
fn sign(x: f32) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

fn zcr_window(window: &[f32]) -> f64 {
    let crossings = window
        .windows(2)
        .filter(|pair| sign(pair[0]) != sign(pair[1]))
        .count();

    crossings as f64 / (window.len() - 1) as f64
}

fn rms_window(window: &[f32]) -> f64 {
    let sum: f64 = window.iter().map(|&x| x as f64 * x as f64).sum();
    (sum / window.len() as f64).sqrt()
}

fn peak_window(window: &[f32]) -> f64 {
    window
        .iter()
        .map(|&x| (x as f64).abs())
        .fold(0.0, f64::max)
}
