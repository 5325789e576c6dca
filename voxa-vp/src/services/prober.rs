//! Audio metadata prober
//!
//! Reads container and stream properties (duration, bitrate, sample rate,
//! channels, codec) from a file without decoding the payload, by invoking
//! ffprobe and decoding its JSON report. Numeric fields that ffprobe omits
//! or reports unparsably become 0 rather than errors; a file with no audio
//! stream is a distinct failure from a broken toolchain.

use crate::error::ProbeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use voxa_common::config::ToolConfig;

/// Probed stream and container properties
///
/// A point-in-time snapshot: any filter stage invalidates it, so the
/// pipeline re-probes after the final stage rather than carrying metadata
/// across stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadata {
    /// Duration in seconds (0 when unknown)
    pub duration_seconds: f64,
    /// Bitrate in bits per second (0 when unknown)
    pub bitrate_bps: u64,
    /// File size in bytes (0 when unknown)
    pub size_bytes: u64,
    /// Container format name (empty when unknown)
    pub container_format: String,
    /// Audio codec name (empty when unknown)
    pub codec: String,
    /// Sample rate in Hz (0 when unknown)
    pub sample_rate_hz: u32,
    /// Channel count (0 when unknown)
    pub channel_count: u32,
    /// Channel layout, e.g. "mono" or "stereo" (empty when unknown)
    pub channel_layout: String,
}

/// External media metadata prober
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Probe stream and container metadata for `path`
    async fn probe(&self, path: &Path) -> Result<AudioMetadata, ProbeError>;
}

/// ffprobe-backed metadata prober
pub struct FfprobeProber {
    binary_path: String,
}

impl FfprobeProber {
    /// Create a prober using the configured ffprobe path
    pub fn new() -> Self {
        Self {
            binary_path: ToolConfig::resolve().ffprobe_path,
        }
    }

    /// Create a prober with an explicit binary path
    pub fn with_binary(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Check whether the ffprobe binary can be executed
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary_path)
            .arg("-version")
            .output()
            .is_ok()
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<AudioMetadata, ProbeError> {
        let result = tokio::process::Command::new(&self.binary_path)
            .arg("-v")
            .arg("quiet")
            .arg("-print_format")
            .arg("json")
            .arg("-show_format")
            .arg("-show_streams")
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ProbeError::BinaryNotFound(self.binary_path.clone())
                } else {
                    ProbeError::Execution(e.to_string())
                }
            })?;

        if !result.status.success() {
            return Err(ProbeError::Failed {
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let metadata = parse_probe_output(&String::from_utf8_lossy(&result.stdout), path)?;

        debug!(
            file = %path.display(),
            duration_s = metadata.duration_seconds,
            sample_rate = metadata.sample_rate_hz,
            channels = metadata.channel_count,
            codec = %metadata.codec,
            "Probed audio metadata"
        );

        Ok(metadata)
    }
}

/// Decode an ffprobe JSON report into [`AudioMetadata`]
///
/// The report carries a `format` section and a `streams` list; the first
/// stream with `codec_type == "audio"` supplies the stream fields. Numeric
/// values arrive as strings and are parsed defensively to 0.
pub fn parse_probe_output(json: &str, path: &Path) -> Result<AudioMetadata, ProbeError> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ProbeError::Malformed(e.to_string()))?;

    let audio_stream = parsed
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.get("codec_type").and_then(|t| t.as_str()) == Some("audio"))
        })
        .ok_or_else(|| ProbeError::NoAudioStream(path.to_path_buf()))?;

    let format = parsed.get("format");

    let str_field = |v: Option<&serde_json::Value>, key: &str| -> String {
        v.and_then(|f| f.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    Ok(AudioMetadata {
        duration_seconds: str_field(format, "duration").parse().unwrap_or(0.0),
        bitrate_bps: str_field(format, "bit_rate").parse().unwrap_or(0),
        size_bytes: str_field(format, "size").parse().unwrap_or(0),
        container_format: str_field(format, "format_name"),
        codec: str_field(Some(audio_stream), "codec_name"),
        sample_rate_hz: str_field(Some(audio_stream), "sample_rate")
            .parse()
            .unwrap_or(0),
        channel_count: audio_stream
            .get("channels")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        channel_layout: str_field(Some(audio_stream), "channel_layout"),
    })
}
