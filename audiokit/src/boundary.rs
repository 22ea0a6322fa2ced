//! Status-code entry points for hosts that cannot carry a structured error.
//!
//! Every function returns the [`ErrorCode`] of a failure and records the full
//! message in the calling thread's last-error slot. A successful call clears
//! the slot, so after `Ok` both [`last_error_code`] and
//! [`last_error_message`] report `ErrorCode::Ok` and an empty string.

use std::io::Read;

use anyhow::{Result, bail};
use log::debug;

use crate::process::Decoded;
use crate::process::analyze::{self, AnalysisConfig, FeatureResult};
use crate::process::parse::Parser;
use crate::structs::sample_buffer::SampleBuffer;
use crate::utils::diagnostics;
use crate::utils::errors::{ArgumentError, ErrorCode};

pub use crate::utils::diagnostics::{get_last_error, last_error_code, last_error_message};

fn record<T>(result: Result<T>) -> Result<T, ErrorCode> {
    match result {
        Ok(value) => {
            diagnostics::clear();
            Ok(value)
        }
        Err(err) => {
            let code = ErrorCode::of(&err);
            debug!("Boundary call failed with {code}: {err:#}");
            diagnostics::set_error(code, &format!("{err:#}"));
            Err(code)
        }
    }
}

/// Reads an already-opened source to the end, then parses and extracts it.
///
/// `None` is reported as `InvalidArgument`, as is a source with no bytes.
pub fn retrieve_wav_data(source: Option<&mut dyn Read>) -> Result<Decoded, ErrorCode> {
    record(read_and_decode(source, &Parser::default()))
}

/// Like [`retrieve_wav_data`] with an explicit parser configuration.
pub fn retrieve_wav_data_with(
    source: Option<&mut dyn Read>,
    parser: &Parser,
) -> Result<Decoded, ErrorCode> {
    record(read_and_decode(source, parser))
}

pub fn retrieve_wav_bytes(source: &[u8]) -> Result<Decoded, ErrorCode> {
    record(decode_bytes(source, &Parser::default()))
}

fn read_and_decode(source: Option<&mut dyn Read>, parser: &Parser) -> Result<Decoded> {
    let Some(source) = source else {
        bail!(ArgumentError::MissingSource);
    };

    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    decode_bytes(&bytes, parser)
}

fn decode_bytes(source: &[u8], parser: &Parser) -> Result<Decoded> {
    if source.is_empty() {
        bail!(ArgumentError::EmptySource);
    }
    parser.decode(source)
}

pub fn zcr(buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<FeatureResult, ErrorCode> {
    record(analyze::zero_crossing_rate(buffer, config))
}

pub fn rms(buffer: &SampleBuffer, config: &AnalysisConfig) -> Result<FeatureResult, ErrorCode> {
    record(analyze::rms(buffer, config))
}

pub fn amplitude_envelope(
    buffer: &SampleBuffer,
    config: &AnalysisConfig,
) -> Result<FeatureResult, ErrorCode> {
    record(analyze::amplitude_envelope(buffer, config))
}
