use anyhow::Result;
use indicatif::MultiProgress;
use serde::Serialize;

use super::command::{Cli, InfoArgs, OutputFormat};
use super::read_input;
use crate::timestamp::time_str;
use audiokit::process::parse::Parser;
use audiokit::structs::header::WaveHeader;

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Inspecting WAVE file: {}", args.input.display());

    let source = read_input(&args.input, multi)?;

    let mut parser = Parser::default();
    parser.set_fail_level(cli.fail_level());
    let header = parser.parse(&source)?;

    let report = HeaderReport::new(&header, source.len());
    match args.output_format {
        OutputFormat::Plain => display_report(&report),
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&report)?),
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct HeaderReport {
    pub file_size: usize,
    pub chunk_size: u32,
    pub fmt_chunk_size: u32,
    pub audio_format: u16,
    pub sample_format: Option<String>,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: FieldReport<u32, u64>,
    pub block_align: FieldReport<u16, u32>,
    pub bits_per_sample: u16,
    pub data_offset: u64,
    pub data_size: FieldReport<u32, u32>,
    pub frame_count: u32,
    pub duration: String,
    pub skipped_chunks: Vec<String>,
    pub warnings: Vec<String>,
}

/// A declared header value next to the one derived from other fields.
#[derive(Debug, Serialize)]
pub struct FieldReport<D, E> {
    pub declared: D,
    pub effective: E,
}

impl HeaderReport {
    pub fn new(header: &WaveHeader, file_size: usize) -> Self {
        Self {
            file_size,
            chunk_size: header.chunk_size(),
            fmt_chunk_size: header.fmt_chunk_size,
            audio_format: header.audio_format(),
            sample_format: header.sample_format().map(|f| f.to_string()),
            channel_count: header.channel_count(),
            sample_rate: header.sample_rate(),
            byte_rate: FieldReport {
                declared: header.byte_rate(),
                effective: header.derived_byte_rate(),
            },
            block_align: FieldReport {
                declared: header.block_align(),
                effective: header.derived_block_align(),
            },
            bits_per_sample: header.bits_per_sample(),
            data_offset: header.data_offset,
            data_size: FieldReport {
                declared: header.data_size,
                effective: header.data_len,
            },
            frame_count: header.frame_count(),
            duration: time_str(header.duration_secs()),
            skipped_chunks: header
                .skipped_chunks
                .iter()
                .map(|c| format!("{} ({} bytes)", c.id, c.size))
                .collect(),
            warnings: header.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

fn display_report(report: &HeaderReport) {
    println!();
    println!("WAVE File Information");
    println!("=====================");
    println!();
    println!("Container");
    println!("  File size                 {} bytes", report.file_size);
    println!("  RIFF chunk size           {} bytes", report.chunk_size);
    println!("  fmt chunk size            {} bytes", report.fmt_chunk_size);
    if !report.skipped_chunks.is_empty() {
        println!(
            "  Skipped chunks            {}",
            report.skipped_chunks.join(", ")
        );
    }
    println!();

    println!("Format");
    match &report.sample_format {
        Some(format) => println!("  Sample format             {format}"),
        None => println!(
            "  Sample format             unsupported (audio_format {}, {} bits)",
            report.audio_format, report.bits_per_sample
        ),
    }
    println!("  Channels                  {}", report.channel_count);
    println!("  Sampling rate             {} Hz", report.sample_rate);
    display_field("Block align", &report.block_align);
    display_field("Byte rate", &report.byte_rate);
    println!();

    println!("Data");
    println!("  Offset                    {}", report.data_offset);
    display_field("Size", &report.data_size);
    println!("  Frames                    {}", report.frame_count);
    println!("  Duration                  {}", report.duration);
    println!();

    if !report.warnings.is_empty() {
        println!("Warnings");
        for warning in &report.warnings {
            println!("  {warning}");
        }
        println!();
    }
}

fn display_field<D, E>(label: &str, field: &FieldReport<D, E>)
where
    D: std::fmt::Display,
    E: std::fmt::Display,
{
    let declared = field.declared.to_string();
    let effective = field.effective.to_string();
    if declared == effective {
        println!("  {label:26}{declared}");
    } else {
        println!("  {label:26}{declared} (effective {effective})");
    }
}
