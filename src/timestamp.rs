/// Formats a duration as `hh:mm:ss.mmm`. Hours widen past two digits as needed.
pub fn time_str(sec: f64) -> String {
    let total_ms = (sec.max(0.0) * 1000.0).round() as u64;
    let (hours, rem) = (total_ms / 3_600_000, total_ms % 3_600_000);
    let (minutes, rem) = (rem / 60_000, rem % 60_000);
    let (seconds, milliseconds) = (rem / 1000, rem % 1000);

    format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
}

/// Formats a frame position as a duration at `sample_rate`.
pub fn frame_time_str(frame: u64, sample_rate: u32) -> String {
    if sample_rate == 0 {
        return time_str(0.0);
    }
    time_str(frame as f64 / sample_rate as f64)
}
