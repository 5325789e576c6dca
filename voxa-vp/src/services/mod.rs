//! Service modules for the voice preparation workflow

pub mod engine;
pub mod pipeline;
pub mod prober;
pub mod quality;
pub mod stages;

pub use engine::{FfmpegEngine, FilterEngine};
pub use pipeline::{ProcessingOptions, ProcessingResult, VoicePrepPipeline};
pub use prober::{AudioMetadata, FfprobeProber, MediaProber};
pub use quality::{QualityAnalyzer, QualityReport, QualityTier};
pub use stages::{FilterStage, StageSpec};
