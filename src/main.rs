use anyhow::Result;
use clap::Parser as ClapParser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

use cli::analyze::cmd_analyze;
use cli::command::{Cli, Commands, LogFormat};
use cli::dump::cmd_dump;
use cli::info::cmd_info;
use cli::repair::cmd_repair;

mod cli;
mod input;
pub(crate) mod timestamp;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base_level = cli.loglevel.to_level_filter();

    let multi = MultiProgress::new();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(base_level);
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                let ts = buf.timestamp().to_string();
                writeln!(buf, "{}", log_record(&ts, record))
            });
        }
    }

    let pb = if cli.progress {
        let logger = env_builder.build();
        LogWrapper::new(multi.clone(), logger).try_init()?;
        Some(&multi)
    } else {
        env_builder.try_init()?;
        None
    };

    log::debug!(
        "audiokit {} (library {}), {}, built {}",
        env!("CARGO_PKG_VERSION"),
        env!("AUDIOKIT_VERSION"),
        option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown revision"),
        env!("BUILD_TIMESTAMP")
    );

    match cli.command {
        Commands::Info(ref args) => cmd_info(args, &cli, pb)?,
        Commands::Dump(ref args) => cmd_dump(args, &cli, pb)?,
        Commands::Analyze(ref args) => cmd_analyze(args, &cli, pb)?,
        Commands::Repair(ref args) => cmd_repair(args, &cli, pb)?,
    }

    Ok(())
}

fn log_record(ts: &str, record: &log::Record) -> serde_json::Value {
    serde_json::json!({
        "ts": ts,
        "lvl": record.level().to_string(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
}
