use std::fmt::{self, Display};

use crate::structs::chunk::FourCC;
use crate::structs::header::HeaderWarning;

#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("Truncated input: requested {requested} bytes at offset {offset}, {remaining} remain")]
    Truncated {
        requested: u64,
        remaining: u64,
        offset: u64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: FourCC, found: FourCC },

    #[error("No \"fmt \" chunk after the RIFF descriptor")]
    MissingFmtChunk,

    #[error("Unexpected chunk {found:?}, the \"fmt \" chunk must come first")]
    UnexpectedChunk { found: FourCC },

    #[error("fmt chunk must be at least 16 bytes. Read {0}")]
    FmtChunkTooSmall(u32),

    #[error("Unsupported audio_format {0}, only 1 (PCM) and 3 (IEEE float) are supported")]
    UnsupportedFormat(u16),

    #[error("channel_count must be at least 1")]
    InvalidChannelCount,

    #[error("sample_rate must be at least 1")]
    InvalidSampleRate,

    #[error("No \"data\" chunk found before end of input")]
    MissingDataChunk,

    #[error("Unsupported bits_per_sample {bits} for audio_format {audio_format}")]
    UnsupportedBitDepth { bits: u16, audio_format: u16 },

    #[error("Inconsistent header: {0}")]
    Inconsistent(HeaderWarning),
}

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Cannot extract {bits}-bit samples")]
    UnsupportedBitDepth { bits: u16 },

    #[error("Unable to allocate a buffer of {samples} samples")]
    OutOfMemory { samples: u64 },

    #[error("Payload range {start}..{end} outside source of {len} bytes")]
    PayloadOutOfBounds { start: u64, end: u64, len: u64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Insufficient samples: window holds {len}, at least {required} required")]
    InsufficientSamples { len: usize, required: usize },

    #[error("hop_size must be at least 1")]
    InvalidHopSize,

    #[error("Channel {channel} out of range, buffer has {channels} channels")]
    ChannelOutOfRange { channel: usize, channels: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("No source provided")]
    MissingSource,

    #[error("Source is empty")]
    EmptySource,
}

/// Status codes of the boundary protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ErrorCode {
    #[default]
    Ok = 0,
    InvalidArgument = 1,
    Io = 2,
    Format = 3,
    OutOfMemory = 4,
    Internal = 5,
}

impl ErrorCode {
    /// Classifies an error by the first typed cause found in its chain.
    pub fn of(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.is::<ReadError>() || cause.is::<std::io::Error>() {
                return ErrorCode::Io;
            }
            if cause.is::<ParseError>() {
                return ErrorCode::Format;
            }
            if let Some(e) = cause.downcast_ref::<ExtractError>() {
                return match e {
                    ExtractError::OutOfMemory { .. } => ErrorCode::OutOfMemory,
                    ExtractError::UnsupportedBitDepth { .. } => ErrorCode::Format,
                    ExtractError::PayloadOutOfBounds { .. } => ErrorCode::Internal,
                };
            }
            if cause.is::<AnalysisError>() || cause.is::<ArgumentError>() {
                return ErrorCode::InvalidArgument;
            }
        }

        ErrorCode::Internal
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Ok => "ok",
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::Io => "I/O failure",
            ErrorCode::Format => "format error",
            ErrorCode::OutOfMemory => "out of memory",
            ErrorCode::Internal => "internal error",
        };
        f.write_str(name)
    }
}
