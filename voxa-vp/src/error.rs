//! Error types for voxa-vp

use std::path::PathBuf;
use thiserror::Error;

/// Filter engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// ffmpeg binary not found at the configured path
    #[error("Media engine binary not found: {0}")]
    BinaryNotFound(String),

    /// Failed to spawn or await the engine process
    #[error("Failed to execute media engine: {0}")]
    Execution(String),

    /// Engine process exited with a failure status
    #[error("Media engine exited with status {code:?}: {stderr}")]
    Failed {
        /// Process exit code, if the process exited normally
        code: Option<i32>,
        /// Captured stderr from the engine
        stderr: String,
    },
}

/// Metadata prober errors
#[derive(Debug, Error)]
pub enum ProbeError {
    /// ffprobe binary not found at the configured path
    #[error("Metadata prober binary not found: {0}")]
    BinaryNotFound(String),

    /// Failed to spawn or await the prober process
    #[error("Failed to execute metadata prober: {0}")]
    Execution(String),

    /// Prober process exited with a failure status
    #[error("Metadata prober exited with status {code:?}: {stderr}")]
    Failed {
        /// Process exit code, if the process exited normally
        code: Option<i32>,
        /// Captured stderr from the prober
        stderr: String,
    },

    /// File contains no audio stream (corrupt or non-audio upload)
    #[error("No audio stream found in file: {0}")]
    NoAudioStream(PathBuf),

    /// Prober output could not be decoded
    #[error("Failed to parse prober output: {0}")]
    Malformed(String),
}

/// Pipeline orchestration errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A filter stage failed; names the stage and carries the engine error
    #[error("Filter stage '{stage}' failed: {source}")]
    Filter {
        /// Name of the failed stage
        stage: &'static str,
        /// Underlying engine failure
        #[source]
        source: EngineError,
    },

    /// Probing the final asset failed
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Input file does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),
}

impl PipelineError {
    /// Name of the failed filter stage, if this is a stage failure
    pub fn failed_stage(&self) -> Option<&'static str> {
        match self {
            PipelineError::Filter { stage, .. } => Some(stage),
            _ => None,
        }
    }
}
