use std::path::Path;

use anyhow::{Result, bail};
use indicatif::MultiProgress;

use crate::input::InputReader;

pub mod analyze;
pub mod command;
pub mod dump;
pub mod info;
pub mod repair;

/// Reads `path` (or stdin for "-") fully into memory.
pub(crate) fn read_input(path: &Path, multi: Option<&MultiProgress>) -> Result<Vec<u8>> {
    let mut reader = InputReader::new(path)?;
    if reader.is_pipe() {
        log::debug!("Reading from stdin");
    } else if let Some(len) = reader.len() {
        log::debug!("Reading {len} bytes from {}", path.display());
    }
    let source = reader.read_all(multi)?;

    if source.is_empty() {
        bail!(audiokit::utils::errors::ArgumentError::EmptySource);
    }
    log::debug!("Read {} bytes from {}", source.len(), path.display());

    Ok(source)
}
