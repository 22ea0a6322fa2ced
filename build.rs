use anyhow::Result;
use chrono::TimeZone;
use std::env;
use std::fs;
use vergen_gitcl::{Emitter, GitclBuilder};

fn main() -> Result<()> {
    // Generate git information
    let gitcl = GitclBuilder::default()
        .describe(true, true, Some("[0-9]*"))
        .build()?;

    let gitcl_res = Emitter::default()
        .idempotent()
        .fail_on_error()
        .add_instructions(&gitcl)
        .and_then(|emitter| emitter.emit());

    if let Err(e) = gitcl_res {
        eprintln!("error occurred while generating instructions: {e:?}");
        Emitter::default().idempotent().fail_on_error().emit()?;
    }

    let now = match env::var("SOURCE_DATE_EPOCH") {
        Ok(val) => {
            let secs = val.parse::<i64>()?;
            chrono::Utc
                .timestamp_opt(secs, 0)
                .single()
                .ok_or_else(|| anyhow::anyhow!("SOURCE_DATE_EPOCH out of range: {secs}"))?
        }
        Err(_) => chrono::Utc::now(),
    };

    println!(
        "cargo:rustc-env=BUILD_TIMESTAMP={}",
        now.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let audiokit_version =
        read_audiokit_version().unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=AUDIOKIT_VERSION={audiokit_version}");

    println!("cargo:rerun-if-changed=audiokit/Cargo.toml");

    Ok(())
}

/// Reads the `version` key of the `[package]` table in audiokit/Cargo.toml.
fn read_audiokit_version() -> Result<String> {
    let toml_content = fs::read_to_string("audiokit/Cargo.toml")?;

    let mut in_package = false;
    for line in toml_content.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_package = line == "[package]";
            continue;
        }
        if in_package && line.starts_with("version") {
            if let Some(equals_pos) = line.find('=') {
                let version_part = line[equals_pos + 1..].trim();
                return Ok(version_part.trim_matches('"').trim_matches('\'').to_string());
            }
        }
    }

    anyhow::bail!("Could not find version in audiokit/Cargo.toml");
}
