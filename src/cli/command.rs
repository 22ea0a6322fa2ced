use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

use audiokit::process::analyze::{Feature, WindowMode};

#[derive(Debug, ClapParser)]
#[command(
    name       = "audiokit",
    version    = env!("CARGO_PKG_VERSION"),
    about      = "Tools for inspecting, analysing and repairing RIFF/WAVE PCM files",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat header inconsistencies as fatal errors.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during operations.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Failure level handed to the parser.
    pub fn fail_level(&self) -> log::Level {
        if self.strict {
            log::Level::Warn
        } else {
            log::Level::Error
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print header information
    Info(InfoArgs),

    /// Print the first decoded frames.
    Dump(DumpArgs),

    /// Compute signal features over one or all channels.
    Analyze(AnalyzeArgs),

    /// Rewrite the input as a canonical WAVE file.
    Repair(RepairArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input WAVE file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Input WAVE file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of frames to print.
    #[arg(long, value_name = "N", default_value_t = 16)]
    pub frames: usize,

    /// Print samples normalized to [-1.0, 1.0] instead of raw values.
    #[arg(long)]
    pub normalized: bool,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Input WAVE file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Feature to compute.
    #[arg(long, value_enum, default_value_t = FeatureArg::Zcr)]
    pub feature: FeatureArg,

    /// Window length in samples. Omit for a single value over the whole channel.
    #[arg(long, value_name = "SAMPLES", requires = "hop")]
    pub window: Option<usize>,

    /// Hop between window starts, in samples.
    #[arg(long, value_name = "SAMPLES", requires = "window")]
    pub hop: Option<usize>,

    /// Channel to analyse.
    #[arg(long, value_name = "INDEX", default_value_t = 0, conflicts_with = "all_channels")]
    pub channel: usize,

    /// Analyse every channel independently.
    #[arg(long)]
    pub all_channels: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output_format: OutputFormat,
}

impl AnalyzeArgs {
    pub fn window_mode(&self) -> WindowMode {
        match (self.window, self.hop) {
            (Some(window_size), Some(hop_size)) => WindowMode::Framed {
                window_size,
                hop_size,
            },
            _ => WindowMode::Global,
        }
    }
}

#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Input WAVE file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path for the repaired file.
    #[arg(long, short, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    /// Aligned human-readable text.
    Plain,
    /// YAML document.
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FeatureArg {
    /// Zero-crossing rate.
    Zcr,
    /// Root-mean-square level.
    Rms,
    /// Peak absolute amplitude.
    Envelope,
}

impl From<FeatureArg> for Feature {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Zcr => Feature::ZeroCrossingRate,
            FeatureArg::Rms => Feature::Rms,
            FeatureArg::Envelope => Feature::AmplitudeEnvelope,
        }
    }
}
