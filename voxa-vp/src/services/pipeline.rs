//! Voice preparation pipeline orchestrator
//!
//! Sequences the enabled filter stages over one input file. Each stage
//! consumes the previous stage's output, so a run is strictly sequential;
//! concurrent runs are independent (unique token, unique paths, no shared
//! state).
//!
//! # File lifecycle
//! Exactly one asset is live at a time. After a stage succeeds, the file
//! that fed it is deleted, unless it is the original input, which always
//! belongs to the caller. Deletion is best-effort: a failed unlink is
//! logged, never raised. On stage failure the error propagates as-is; the
//! outputs of already-completed stages are left where they are.
//!
//! # Example
//! ```rust,ignore
//! let pipeline = VoicePrepPipeline::new();
//! let result = pipeline
//!     .process_for_voice_cloning(Path::new("sample.mp3"), &ProcessingOptions::default())
//!     .await?;
//! println!("ready for cloning: {}", result.processed_path.display());
//! ```

use crate::error::PipelineError;
use crate::events::PrepEvent;
use crate::services::engine::{FfmpegEngine, FilterEngine};
use crate::services::prober::{AudioMetadata, FfprobeProber, MediaProber};
use crate::services::stages::FilterStage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Per-run processing toggles
///
/// Each flag independently gates one filter stage; stage order is fixed
/// regardless of which are enabled. All five toggles default to enabled:
/// an absent flag means the stage runs.
#[derive(Debug, Clone)]
pub struct ProcessingOptions {
    /// Run the denoise stage
    pub remove_noise: bool,
    /// Run the voice-band EQ stage
    pub enhance_voice: bool,
    /// Run the loudness normalization stage
    pub normalize: bool,
    /// Run the silence trimming stage
    pub trim_silence: bool,
    /// Run the cloning-format re-encode stage
    pub optimize: bool,
    /// Directory for intermediate and final output (default: input's directory)
    pub output_dir: Option<PathBuf>,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            remove_noise: true,
            enhance_voice: true,
            normalize: true,
            trim_silence: true,
            optimize: true,
            output_dir: None,
        }
    }
}

impl ProcessingOptions {
    fn stage_enabled(&self, stage: FilterStage) -> bool {
        match stage {
            FilterStage::Denoise => self.remove_noise,
            FilterStage::EnhanceVoice => self.enhance_voice,
            FilterStage::Normalize => self.normalize,
            FilterStage::TrimSilence => self.trim_silence,
            FilterStage::OptimizeForCloning => self.optimize,
            FilterStage::OptimizeForWeb => false,
        }
    }
}

/// Successful pipeline outcome
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    /// Path of the final processed asset, now owned by the caller
    pub processed_path: PathBuf,
    /// Metadata probed from the final asset
    pub metadata: AudioMetadata,
    /// Always true on the success path; kept for the API response shape
    pub success: bool,
}

/// Voice preparation pipeline
pub struct VoicePrepPipeline {
    engine: Arc<dyn FilterEngine>,
    prober: Arc<dyn MediaProber>,
    event_tx: Option<mpsc::Sender<PrepEvent>>,
    /// Configured fallback when a run does not name an output directory
    default_output_dir: Option<PathBuf>,
}

impl VoicePrepPipeline {
    /// Create a pipeline backed by the configured ffmpeg/ffprobe binaries
    pub fn new() -> Self {
        let config = voxa_common::config::ToolConfig::resolve();
        Self {
            engine: Arc::new(FfmpegEngine::with_binary(config.ffmpeg_path)),
            prober: Arc::new(FfprobeProber::with_binary(config.ffprobe_path)),
            event_tx: None,
            default_output_dir: config.output_dir,
        }
    }

    /// Create a pipeline with explicit engine and prober implementations
    pub fn with_components(engine: Arc<dyn FilterEngine>, prober: Arc<dyn MediaProber>) -> Self {
        Self {
            engine,
            prober,
            event_tx: None,
            default_output_dir: None,
        }
    }

    /// Attach a progress event channel
    pub fn with_events(mut self, event_tx: mpsc::Sender<PrepEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    async fn emit(&self, event: PrepEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.send(event).await.is_err() {
                debug!("Progress event receiver dropped");
            }
        }
    }

    /// Prepare a voice sample for cloning
    ///
    /// Runs the enabled stages in fixed order (denoise, enhance, normalize,
    /// trim, optimize), probes the final asset, and returns its path plus
    /// metadata. The original input file is never deleted here; cleaning it
    /// up is the caller's responsibility.
    pub async fn process_for_voice_cloning(
        &self,
        input: &Path,
        options: &ProcessingOptions,
    ) -> Result<ProcessingResult, PipelineError> {
        if !input.exists() {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }

        let run_id = Uuid::new_v4();
        let token = chrono::Utc::now().timestamp_millis();
        let output_dir = self.resolve_output_dir(input, options);

        let plan: Vec<FilterStage> = FilterStage::CLONING_PIPELINE
            .into_iter()
            .filter(|stage| options.stage_enabled(*stage))
            .collect();
        let total_stages = plan.len();

        info!(
            %run_id,
            input = %input.display(),
            stages = total_stages,
            "Starting voice preparation"
        );
        self.emit(PrepEvent::PipelineStarted {
            run_id,
            input: input.to_string_lossy().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            total_stages,
        })
        .await;

        let mut current = input.to_path_buf();

        for (index, stage) in plan.into_iter().enumerate() {
            let spec = stage.spec();
            let output = stage_output_path(&output_dir, input, stage, token);

            self.emit(PrepEvent::StageStarted {
                run_id,
                stage: spec.name,
                index,
                total_stages,
            })
            .await;
            debug!(%run_id, stage = spec.name, output = %output.display(), "Running stage");

            if let Err(source) = self.engine.apply(&current, &spec, &output).await {
                error!(%run_id, stage = spec.name, error = %source, "Stage failed");
                self.emit(PrepEvent::PipelineFailed {
                    run_id,
                    stage: spec.name,
                    message: source.to_string(),
                })
                .await;
                return Err(PipelineError::Filter {
                    stage: spec.name,
                    source,
                });
            }

            // The file that fed this stage is superseded. The original
            // upload stays; its lifetime belongs to the caller.
            if current != input {
                remove_intermediate(&current).await;
            }

            self.emit(PrepEvent::StageCompleted {
                run_id,
                stage: spec.name,
                output: output.to_string_lossy().to_string(),
            })
            .await;
            current = output;
        }

        let metadata = self.prober.probe(&current).await?;

        info!(%run_id, output = %current.display(), "Voice preparation complete");
        self.emit(PrepEvent::PipelineCompleted {
            run_id,
            output: current.to_string_lossy().to_string(),
        })
        .await;

        Ok(ProcessingResult {
            processed_path: current,
            metadata,
            success: true,
        })
    }

    /// Re-encode a file for web playback (MP3, 44.1kHz, 128kbps)
    ///
    /// A standalone conversion, not chained with the cloning pipeline.
    pub async fn optimize_for_web(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf, PipelineError> {
        if !input.exists() {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }

        let stage = FilterStage::OptimizeForWeb;
        let spec = stage.spec();
        let token = chrono::Utc::now().timestamp_millis();
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| self.default_output_dir.clone())
            .unwrap_or_else(|| parent_dir(input));
        let output = stage_output_path(&dir, input, stage, token);

        debug!(input = %input.display(), output = %output.display(), "Optimizing for web");

        self.engine
            .apply(input, &spec, &output)
            .await
            .map_err(|source| PipelineError::Filter {
                stage: spec.name,
                source,
            })?;

        Ok(output)
    }

    /// Output directory priority: run options, configured default, then
    /// the input file's own directory
    fn resolve_output_dir(&self, input: &Path, options: &ProcessingOptions) -> PathBuf {
        options
            .output_dir
            .clone()
            .or_else(|| self.default_output_dir.clone())
            .unwrap_or_else(|| parent_dir(input))
    }
}

impl Default for VoicePrepPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort unlink of a superseded intermediate file
async fn remove_intermediate(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(file = %path.display(), error = %e, "Failed to remove intermediate file");
    }
}

fn parent_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Derive a stage's output path: `<dir>/<stem><suffix><token>.<ext>`
fn stage_output_path(dir: &Path, input: &Path, stage: FilterStage, token: i64) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    dir.join(format!(
        "{}{}{}.{}",
        stem,
        stage.suffix(),
        token,
        stage.spec().container
    ))
}
