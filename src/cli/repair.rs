use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::MultiProgress;

use super::command::{Cli, RepairArgs};
use super::read_input;
use crate::timestamp::time_str;
use audiokit::process::Decoded;
use audiokit::process::parse::Parser;
use audiokit::process::write::{WavStats, WavWriter};

pub fn cmd_repair(args: &RepairArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let source = read_input(&args.input, multi)?;

    let mut parser = Parser::default();
    parser.set_fail_level(cli.fail_level());
    let decoded = parser.decode(&source)?;

    for warning in &decoded.header.warnings {
        log::info!("Repairing: {warning}");
    }

    let stats = write_canonical(&decoded, &args.output)?;

    log::info!(
        "Wrote {} ({} samples, {}) to {}",
        stats.format,
        stats.total_samples(),
        time_str(stats.duration_seconds()),
        args.output.display()
    );

    Ok(())
}

fn write_canonical(decoded: &Decoded, path: &Path) -> Result<WavStats> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let mut writer = WavWriter::new(file);
    writer.configure_audio_format(
        decoded.sample_rate(),
        decoded.channel_count(),
        decoded.samples.sample_format(),
    )?;
    writer.write_header()?;
    writer.write_buffer(&decoded.samples)?;
    writer.finish()?;

    let stats = writer.stats();
    writer.into_inner()?.sync_all()?;

    Ok(stats)
}
