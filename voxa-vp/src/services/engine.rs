//! Filter-graph engine wrapper
//!
//! Applies one [`StageSpec`](crate::services::stages::StageSpec) per
//! invocation of the external ffmpeg binary. The trait seam exists so the
//! pipeline can be exercised in tests without a media toolchain installed.

use crate::error::EngineError;
use crate::services::stages::StageSpec;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;
use voxa_common::config::ToolConfig;

/// External audio filter-graph engine
///
/// One call applies one stage: read `input`, run the stage's filter chain
/// and encoder settings, write exactly one new file at `output`. The input
/// file must be left in place; deleting superseded files is the
/// orchestrator's job.
#[async_trait]
pub trait FilterEngine: Send + Sync {
    /// Apply a stage to `input`, producing `output`
    async fn apply(&self, input: &Path, spec: &StageSpec, output: &Path)
        -> Result<(), EngineError>;
}

/// ffmpeg-backed filter engine
pub struct FfmpegEngine {
    binary_path: String,
}

impl FfmpegEngine {
    /// Create an engine using the configured ffmpeg path
    pub fn new() -> Self {
        Self {
            binary_path: ToolConfig::resolve().ffmpeg_path,
        }
    }

    /// Create an engine with an explicit binary path
    pub fn with_binary(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Check whether the ffmpeg binary can be executed
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.binary_path)
            .arg("-version")
            .output()
            .is_ok()
    }

    /// Build the full argument list for one stage invocation
    fn build_args(input: &Path, spec: &StageSpec, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];

        if let Some(graph) = &spec.filter_graph {
            args.push("-af".into());
            args.push(graph.into());
        }
        if let Some(codec) = spec.codec {
            args.push("-c:a".into());
            args.push(codec.into());
        }
        if let Some(rate) = spec.sample_rate {
            args.push("-ar".into());
            args.push(rate.to_string().into());
        }
        if let Some(channels) = spec.channels {
            args.push("-ac".into());
            args.push(channels.to_string().into());
        }
        if let Some(bitrate) = spec.bitrate_kbps {
            args.push("-b:a".into());
            args.push(format!("{}k", bitrate).into());
        }

        args.push("-f".into());
        args.push(spec.container.into());
        args.push(output.into());
        args
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FilterEngine for FfmpegEngine {
    async fn apply(
        &self,
        input: &Path,
        spec: &StageSpec,
        output: &Path,
    ) -> Result<(), EngineError> {
        let args = Self::build_args(input, spec, output);

        debug!(
            stage = spec.name,
            input = %input.display(),
            output = %output.display(),
            "Running filter engine"
        );

        let result = tokio::process::Command::new(&self.binary_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EngineError::BinaryNotFound(self.binary_path.clone())
                } else {
                    EngineError::Execution(e.to_string())
                }
            })?;

        if !result.status.success() {
            return Err(EngineError::Failed {
                code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
