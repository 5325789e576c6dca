//! voxa-vp - Voice Preparation Service
//!
//! Prepares uploaded voice samples for cloning. Runs a sequential filter
//! pipeline (noise removal → voice enhancement → loudness normalization →
//! silence trimming → format optimization) through an external media engine,
//! probes the result for stream metadata, scores its suitability for voice
//! cloning, and enforces upload size/type constraints.
//!
//! The HTTP surface, database bookkeeping, and cloud voice APIs that
//! surround this subsystem in the product live elsewhere; callers hand in
//! file paths and upload descriptors and get back paths, reports, and
//! validation verdicts.

pub mod error;
pub mod events;
pub mod services;
pub mod validators;

pub use error::{EngineError, PipelineError, ProbeError};
pub use events::PrepEvent;
pub use services::engine::{FfmpegEngine, FilterEngine};
pub use services::pipeline::{ProcessingOptions, ProcessingResult, VoicePrepPipeline};
pub use services::prober::{AudioMetadata, FfprobeProber, MediaProber};
pub use services::quality::{QualityAnalyzer, QualityReport, QualityTier};
pub use services::stages::{FilterStage, StageSpec};
pub use validators::upload::{
    validate_audio_file, validate_audio_for_voice_cloning, validate_saved_sample,
    CloningValidation, UploadedAudio, ValidationResult,
};
