//! End-to-end tests against a real ffmpeg/ffprobe toolchain
//!
//! These run the actual binaries and are skipped (not failed) when the
//! toolchain is not installed, so CI without media tools stays green.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use voxa_vp::{
    FfmpegEngine, FfprobeProber, MediaProber, ProcessingOptions, QualityAnalyzer, QualityTier,
    VoicePrepPipeline,
};

fn toolchain_available() -> bool {
    let available = FfmpegEngine::new().is_available() && FfprobeProber::new().is_available();
    if !available {
        eprintln!("ffmpeg/ffprobe not installed; skipping toolchain test");
    }
    available
}

/// Write a mono WAV fixture of the given length
fn write_wav_fixture(dir: &Path, name: &str, seconds: u32) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("Failed to create fixture");
    for t in 0..(44_100 * seconds) {
        let sample =
            (t as f32 * 220.0 * 2.0 * std::f32::consts::PI / 44_100.0).sin() * 0.4;
        writer
            .write_sample((sample * i16::MAX as f32) as i16)
            .expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize fixture");
    path
}

#[tokio::test]
async fn test_probe_reads_wav_properties() {
    if !toolchain_available() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let input = write_wav_fixture(dir.path(), "tone.wav", 2);

    let metadata = FfprobeProber::new()
        .probe(&input)
        .await
        .expect("Probe failed");

    assert!((metadata.duration_seconds - 2.0).abs() < 0.1);
    assert_eq!(metadata.sample_rate_hz, 44_100);
    assert_eq!(metadata.channel_count, 1);
    assert_eq!(metadata.codec, "pcm_s16le");
    assert!(metadata.size_bytes > 0);
}

#[tokio::test]
async fn test_full_pipeline_produces_processed_wav() {
    if !toolchain_available() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let input = write_wav_fixture(dir.path(), "voice.wav", 3);

    let result = VoicePrepPipeline::new()
        .process_for_voice_cloning(&input, &ProcessingOptions::default())
        .await
        .expect("Pipeline failed");

    assert!(result.processed_path.exists());
    assert_ne!(result.processed_path, input);
    assert!(input.exists());
    // Cloning output contract: mono PCM wav at 44.1kHz
    assert_eq!(result.metadata.channel_count, 1);
    assert_eq!(result.metadata.sample_rate_hz, 44_100);
    assert_eq!(result.metadata.codec, "pcm_s16le");
}

#[tokio::test]
async fn test_quality_analyzer_rates_short_tone_poor() {
    if !toolchain_available() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let input = write_wav_fixture(dir.path(), "short.wav", 2);

    let report = QualityAnalyzer::new().analyze(&input).await;

    assert_eq!(report.quality, QualityTier::Poor);
    assert_eq!(report.score, 35);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("at least 10 seconds")));
}

#[tokio::test]
async fn test_quality_analyzer_degrades_on_non_audio_file() {
    if !toolchain_available() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not_audio.wav");
    std::fs::write(&path, b"this is not a media file").unwrap();

    let report = QualityAnalyzer::new().analyze(&path).await;

    assert_eq!(report.quality, QualityTier::Unknown);
    assert_eq!(report.score, 0);
    assert!(report.metadata.is_none());
    assert!(report.error.is_some());
}
