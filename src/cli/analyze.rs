use anyhow::Result;
use indicatif::MultiProgress;
use serde::Serialize;

use super::command::{AnalyzeArgs, Cli, OutputFormat};
use super::read_input;
use audiokit::process::analyze::{AnalysisConfig, Feature, FeatureResult, WindowMode};
use audiokit::process::parse::Parser;
use audiokit::structs::sample_buffer::SampleBuffer;

pub fn cmd_analyze(args: &AnalyzeArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let source = read_input(&args.input, multi)?;

    let mut parser = Parser::default();
    parser.set_fail_level(cli.fail_level());
    let decoded = parser.decode(&source)?;

    let feature = Feature::from(args.feature);
    let mode = args.window_mode();
    log::info!(
        "Computing {feature} over {} frames ({})",
        decoded.frame_count(),
        describe_mode(mode)
    );

    let channels = if args.all_channels {
        (0..decoded.channel_count() as usize).collect()
    } else {
        vec![args.channel]
    };
    let report = analyze_channels(&decoded.samples, feature, mode, &channels)?;

    match args.output_format {
        OutputFormat::Plain => {
            for channel in &report {
                println!("{}", format_channel(channel));
            }
        }
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&report)?),
    }

    Ok(())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChannelReport {
    pub channel: usize,
    pub values: Vec<f64>,
}

fn analyze_channels(
    buffer: &SampleBuffer,
    feature: Feature,
    mode: WindowMode,
    channels: &[usize],
) -> Result<Vec<ChannelReport>> {
    channels
        .iter()
        .map(|&channel| {
            let config = AnalysisConfig { mode, channel };
            let values = match feature.compute(buffer, &config)? {
                FeatureResult::Global(v) => vec![v],
                FeatureResult::Framed(v) => v,
            };
            Ok(ChannelReport { channel, values })
        })
        .collect()
}

fn describe_mode(mode: WindowMode) -> String {
    match mode {
        WindowMode::Global => "global".to_string(),
        WindowMode::Framed {
            window_size,
            hop_size,
        } => format!("window {window_size}, hop {hop_size}"),
    }
}

fn format_channel(report: &ChannelReport) -> String {
    let values: Vec<String> = report.values.iter().map(|v| format!("{v:.6}")).collect();
    format!("channel {}: {}", report.channel, values.join(" "))
}
