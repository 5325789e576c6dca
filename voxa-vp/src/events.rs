//! Progress events for pipeline runs
//!
//! Emitted best-effort over an optional channel so the web layer can
//! forward per-stage progress to clients. Emission never fails a run.

use serde::Serialize;
use uuid::Uuid;

/// Pipeline progress event
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrepEvent {
    /// A pipeline run started
    PipelineStarted {
        /// Run identifier, shared by all events of one orchestration call
        run_id: Uuid,
        /// Input file path
        input: String,
        /// Unix timestamp (seconds)
        timestamp: i64,
        /// Number of stages that will run
        total_stages: usize,
    },
    /// A filter stage started
    StageStarted {
        run_id: Uuid,
        /// Stage name
        stage: &'static str,
        /// Zero-based position among the enabled stages
        index: usize,
        total_stages: usize,
    },
    /// A filter stage completed and its output became the live asset
    StageCompleted {
        run_id: Uuid,
        stage: &'static str,
        /// Path of the stage's output file
        output: String,
    },
    /// The run completed; `output` is the final processed path
    PipelineCompleted { run_id: Uuid, output: String },
    /// The run failed at `stage`
    PipelineFailed {
        run_id: Uuid,
        stage: &'static str,
        message: String,
    },
}
