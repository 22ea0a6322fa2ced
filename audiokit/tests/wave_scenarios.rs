use std::io::Cursor;

use audiokit::boundary::{self, last_error_code, last_error_message};
use audiokit::join_bytes_le;
use audiokit::process::analyze::{
    AnalysisConfig, FeatureResult, WindowMode, zero_crossing_rate, zero_crossing_rate_per_channel,
};
use audiokit::process::parse::Parser;
use audiokit::process::write::to_wav_bytes;
use audiokit::structs::header::{CANONICAL_HEADER_LEN, HeaderWarning};
use audiokit::utils::errors::ErrorCode;

fn canonical(audio_format: u16, channels: u16, rate: u32, bits: u16, payload: &[u8]) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut out = join_bytes_le!(
        *b"RIFF",
        36u32 + payload.len() as u32,
        *b"WAVE",
        *b"fmt ",
        16u32,
        audio_format,
        channels,
        rate,
        rate * block_align as u32,
        block_align,
        bits,
        *b"data",
        payload.len() as u32
    );
    out.extend_from_slice(payload);
    out
}

#[test]
fn header_only_file_has_no_frames() {
    let bytes = canonical(1, 2, 44100, 16, &[]);
    assert_eq!(bytes.len(), CANONICAL_HEADER_LEN);

    let decoded = Parser::default().decode(&bytes).unwrap();
    assert_eq!(decoded.frame_count(), 0);
    assert!(decoded.samples.is_empty());
    assert!(decoded.header.warnings.is_empty());
    assert_eq!(decoded.header.fmt_chunk_size, 16);
    assert_eq!(decoded.header.channel_count(), 2);
    assert_eq!(decoded.header.sample_rate(), 44100);
}

#[test]
fn declared_size_beyond_source_is_truncated() {
    let payload = vec![0u8; 500];
    let mut bytes = canonical(1, 1, 8000, 16, &payload);
    bytes[40..44].copy_from_slice(&1000u32.to_le_bytes());

    let decoded = Parser::default().decode(&bytes).unwrap();
    assert_eq!(decoded.header.data_size, 1000);
    assert_eq!(decoded.header.data_len, 500);
    assert!(decoded.header.is_truncated());
    assert!(decoded.header.warnings.contains(&HeaderWarning::DataTruncated {
        declared: 1000,
        available: 500
    }));
    assert_eq!(decoded.frame_count(), 250);

    // strict mode leaves the truncation policy alone
    let mut strict = Parser::default();
    strict.set_fail_level(log::Level::Warn);
    assert_eq!(strict.decode(&bytes).unwrap().frame_count(), 250);
}

#[test]
fn unknown_audio_format_is_a_format_error() {
    for audio_format in [0u16, 2, 0xFFFE] {
        let bytes = canonical(audio_format, 1, 8000, 16, &[0, 0]);
        assert_eq!(
            boundary::retrieve_wav_bytes(&bytes).unwrap_err(),
            ErrorCode::Format
        );
        assert_eq!(last_error_code(), ErrorCode::Format);
        assert!(last_error_message().contains("audio_format"));
    }
}

#[test]
fn strict_mode_rejects_inconsistent_block_align() {
    let mut bytes = canonical(1, 2, 8000, 16, &[0; 8]);
    // block_align 3 instead of 4
    bytes[32..34].copy_from_slice(&3u16.to_le_bytes());

    let lenient = Parser::default().parse(&bytes).unwrap();
    assert!(lenient.has_warnings());
    assert_eq!(lenient.block_align(), 3);
    assert_eq!(lenient.derived_block_align(), 4);

    let mut strict = Parser::default();
    strict.set_fail_level(log::Level::Warn);
    let err =
        boundary::retrieve_wav_data_with(Some(&mut Cursor::new(bytes)), &strict).unwrap_err();
    assert_eq!(err, ErrorCode::Format);
}

#[test]
fn stereo_zero_crossing_rate_on_first_channel() {
    // channel 0 alternates, channel 1 holds still
    let payload = join_bytes_le!(vec![
        100i16, 7, -100, 7, 100, 7, -100, 7, 100, 7, -100, 7, 100, 7, -100, 7
    ]);
    let bytes = canonical(1, 2, 44100, 16, &payload);

    let decoded = boundary::retrieve_wav_bytes(&bytes).unwrap();
    assert_eq!(decoded.frame_count(), 8);

    let zcr = boundary::zcr(&decoded.samples, &AnalysisConfig::global()).unwrap();
    assert_eq!(zcr, FeatureResult::Global(1.0));
    assert_eq!(last_error_code(), ErrorCode::Ok);

    let per_channel =
        zero_crossing_rate_per_channel(&decoded.samples, WindowMode::Global).unwrap();
    assert_eq!(per_channel[1], FeatureResult::Global(0.0));

    let framed = zero_crossing_rate(&decoded.samples, &AnalysisConfig::framed(4, 4)).unwrap();
    assert_eq!(framed, FeatureResult::Framed(vec![1.0, 1.0]));
}

#[test]
fn metadata_chunks_before_data_are_skipped() {
    let mut bytes = join_bytes_le!(
        *b"RIFF",
        0u32,
        *b"WAVE",
        *b"fmt ",
        18u32,
        1u16,
        1u16,
        8000u32,
        8000u32,
        1u16,
        8u16,
        0u16,
        *b"LIST",
        3u32,
        *b"abc",
        0u8,
        *b"data",
        2u32,
        0u8,
        255u8
    );
    let riff_size = bytes.len() as u32 - 8;
    bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());

    let decoded = Parser::default().decode(&bytes).unwrap();
    assert_eq!(decoded.header.fmt_chunk_size, 18);
    assert_eq!(decoded.header.skipped_chunks.len(), 1);
    assert_eq!(decoded.samples.as_i32().unwrap(), [-128, 127]);
    assert!(decoded.header.warnings.is_empty());
}

#[test]
fn repaired_file_is_canonical() {
    let payload = join_bytes_le!(vec![1i16, 2, 3, 4, 5]);
    let mut bytes = canonical(1, 2, 22050, 16, &payload);
    // wrong byte_rate, payload holding 2.5 frames
    bytes[28..32].copy_from_slice(&1u32.to_le_bytes());

    let decoded = Parser::default().decode(&bytes).unwrap();
    assert_eq!(decoded.frame_count(), 2);

    let repaired = to_wav_bytes(&decoded.samples, decoded.sample_rate()).unwrap();
    assert_eq!(repaired.len(), CANONICAL_HEADER_LEN + 8);
    assert_eq!(&repaired[..CANONICAL_HEADER_LEN], decoded.header.to_canonical_bytes().unwrap());

    let again = Parser::default().decode(&repaired).unwrap();
    assert!(again.header.warnings.is_empty());
    assert_eq!(again.samples, decoded.samples);
}
