use anyhow::Result;
use indicatif::MultiProgress;

use super::command::{Cli, DumpArgs};
use super::read_input;
use crate::timestamp::frame_time_str;
use audiokit::process::parse::Parser;
use audiokit::structs::sample_buffer::{SampleBuffer, Samples};

pub fn cmd_dump(args: &DumpArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let source = read_input(&args.input, multi)?;

    let mut parser = Parser::default();
    parser.set_fail_level(cli.fail_level());
    let decoded = parser.decode(&source)?;

    log::info!(
        "{} frames of {}, {} channels",
        decoded.frame_count(),
        decoded.samples.sample_format(),
        decoded.channel_count()
    );

    for line in dump_lines(
        &decoded.samples,
        decoded.sample_rate(),
        args.frames,
        args.normalized,
    ) {
        println!("{line}");
    }

    Ok(())
}

/// One line per frame: position, then every channel's sample.
fn dump_lines(
    buffer: &SampleBuffer,
    sample_rate: u32,
    frames: usize,
    normalized: bool,
) -> Vec<String> {
    let channels = buffer.channel_count() as usize;
    let count = frames.min(buffer.frame_count() as usize);

    (0..count)
        .map(|frame| {
            let values: Vec<String> = (0..channels)
                .map(|ch| {
                    let index = frame * channels + ch;
                    match (buffer.samples(), normalized) {
                        (Samples::Int(v), false) => v[index].to_string(),
                        (Samples::Float(v), false) => format!("{:.6}", v[index]),
                        _ => format!("{:.6}", buffer.get(frame, ch).unwrap_or_default()),
                    }
                })
                .collect();

            format!(
                "{frame:>8}  {}  {}",
                frame_time_str(frame as u64, sample_rate),
                values.join("  ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiokit::structs::format::SampleFormat;

    #[test]
    fn frames_are_capped_at_buffer_length() {
        let buffer =
            SampleBuffer::from_i32(SampleFormat::I16, 2, vec![1, -1, 16384, -16384]).unwrap();

        let lines = dump_lines(&buffer, 2, 10, false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "       0  00:00:00.000  1  -1");
        assert_eq!(lines[1], "       1  00:00:00.500  16384  -16384");

        let lines = dump_lines(&buffer, 2, 1, true);
        assert_eq!(lines, ["       0  00:00:00.000  0.000031  -0.000031"]);
    }
}
