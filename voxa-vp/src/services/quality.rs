//! Voice-sample quality analysis
//!
//! Scores a file's suitability for voice cloning from its probed metadata.
//! The analyzer is advisory, not a gate: a probe failure degrades to an
//! `Unknown`-tier zero-score report instead of raising, so callers can
//! always show the user something.
//!
//! # Tiers
//! Quality starts at `Good` and is downgraded by duration, sample rate,
//! and bitrate checks; the channel check only adds a recommendation. The
//! score is a fixed function of the final tier.

use crate::services::prober::{AudioMetadata, FfprobeProber, MediaProber};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Samples shorter than this are rated poor
const SHORT_SAMPLE_SECS: f64 = 10.0;
/// Samples shorter than this (but not short enough to be poor) are fair
const IDEAL_SAMPLE_SECS: f64 = 30.0;
/// Sample rates below this are rated poor
const LOW_SAMPLE_RATE_HZ: u32 = 22_050;
/// Sample rates below this (but above the poor floor) are fair
const IDEAL_SAMPLE_RATE_HZ: u32 = 44_100;
/// Bitrates below this (when the prober reports one) are rated poor
const LOW_BITRATE_BPS: u64 = 64_000;

/// Suitability tier for voice cloning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Good,
    Fair,
    Poor,
    /// The file could not be analyzed
    Unknown,
}

impl QualityTier {
    /// Fixed tier score; not interpolated
    pub fn score(self) -> u8 {
        match self {
            QualityTier::Good => 85,
            QualityTier::Fair => 65,
            QualityTier::Poor => 35,
            QualityTier::Unknown => 0,
        }
    }
}

/// Quality assessment for one audio file
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    /// Overall suitability tier
    pub quality: QualityTier,
    /// Fixed score derived from the tier (good 85, fair 65, poor 35, unknown 0)
    pub score: u8,
    /// Ordered, human-readable improvement suggestions
    pub recommendations: Vec<String>,
    /// Probed metadata, absent when probing failed
    pub metadata: Option<AudioMetadata>,
    /// Probe failure message, present only for `Unknown` reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Voice-sample quality analyzer
pub struct QualityAnalyzer {
    prober: Arc<dyn MediaProber>,
}

impl QualityAnalyzer {
    /// Create an analyzer backed by the configured ffprobe binary
    pub fn new() -> Self {
        Self {
            prober: Arc::new(FfprobeProber::new()),
        }
    }

    /// Create an analyzer with an explicit prober
    pub fn with_prober(prober: Arc<dyn MediaProber>) -> Self {
        Self { prober }
    }

    /// Analyze a file's suitability for voice cloning
    ///
    /// Never fails: probe errors produce an `Unknown`-tier report with a
    /// zero score and the error message attached.
    pub async fn analyze(&self, path: &Path) -> QualityReport {
        let metadata = match self.prober.probe(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(file = %path.display(), error = %e, "Quality analysis degraded");
                return QualityReport {
                    quality: QualityTier::Unknown,
                    score: QualityTier::Unknown.score(),
                    recommendations: vec!["Could not analyze audio quality".to_string()],
                    metadata: None,
                    error: Some(e.to_string()),
                };
            }
        };

        let report = Self::assess(metadata);
        debug!(
            file = %path.display(),
            quality = ?report.quality,
            score = report.score,
            recommendations = report.recommendations.len(),
            "Quality analysis complete"
        );
        report
    }

    /// Assess probed metadata against the cloning suitability rules
    pub fn assess(metadata: AudioMetadata) -> QualityReport {
        let mut quality = QualityTier::Good;
        let mut recommendations = Vec::new();

        if metadata.duration_seconds < SHORT_SAMPLE_SECS {
            quality = QualityTier::Poor;
            recommendations.push(
                "Audio is very short. Voice samples should be at least 10 seconds of clear speech."
                    .to_string(),
            );
        } else if metadata.duration_seconds < IDEAL_SAMPLE_SECS {
            quality = QualityTier::Fair;
            recommendations.push(
                "For best results, use a sample that is at least 30 seconds long.".to_string(),
            );
        }

        if metadata.sample_rate_hz < LOW_SAMPLE_RATE_HZ {
            quality = QualityTier::Poor;
            recommendations.push(
                "Sample rate is low. Use a recording of at least 22kHz.".to_string(),
            );
        } else if metadata.sample_rate_hz < IDEAL_SAMPLE_RATE_HZ {
            if quality == QualityTier::Good {
                quality = QualityTier::Fair;
            }
            recommendations.push(
                "For best results, use a sample rate of 44.1kHz or higher.".to_string(),
            );
        }

        if metadata.bitrate_bps > 0 && metadata.bitrate_bps < LOW_BITRATE_BPS {
            quality = QualityTier::Poor;
            recommendations
                .push("Bitrate is low. Use a recording of 128kbps or higher.".to_string());
        }

        if metadata.channel_count > 1 {
            recommendations.push(
                "Stereo audio detected. Mono works better for voice cloning.".to_string(),
            );
        }

        QualityReport {
            quality,
            score: quality.score(),
            recommendations,
            metadata: Some(metadata),
            error: None,
        }
    }
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
