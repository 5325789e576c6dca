//! Filter stage definitions for the voice preparation pipeline
//!
//! Each stage maps to one invocation of the external filter-graph engine:
//! an optional audio filter chain plus encoder settings and an output
//! container. Stages never delete their input file; intermediate file
//! lifecycle belongs to the pipeline orchestrator.

/// One audio transformation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// Band-limit, compand, and gate residual noise out of the sample
    Denoise,
    /// Parametric EQ emphasizing the voice band
    EnhanceVoice,
    /// EBU R128 loudness normalization
    Normalize,
    /// Strip leading and trailing silence
    TrimSilence,
    /// Re-encode to the PCM/mono/44.1kHz layout the cloning API expects
    OptimizeForCloning,
    /// Re-encode to MP3 for web playback; not part of the cloning pipeline
    OptimizeForWeb,
}

/// Engine invocation parameters for one stage
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// Stage name used in errors, logs, and progress events
    pub name: &'static str,
    /// Audio filter chain (`-af`), if the stage filters at all
    pub filter_graph: Option<String>,
    /// Audio codec (`-c:a`)
    pub codec: Option<&'static str>,
    /// Output sample rate in Hz (`-ar`)
    pub sample_rate: Option<u32>,
    /// Output channel count (`-ac`)
    pub channels: Option<u32>,
    /// Output bitrate in kbps (`-b:a`)
    pub bitrate_kbps: Option<u32>,
    /// Output container format (`-f`), doubles as the file extension
    pub container: &'static str,
}

impl FilterStage {
    /// The five stages of the voice-cloning pipeline, in fixed order
    pub const CLONING_PIPELINE: [FilterStage; 5] = [
        FilterStage::Denoise,
        FilterStage::EnhanceVoice,
        FilterStage::Normalize,
        FilterStage::TrimSilence,
        FilterStage::OptimizeForCloning,
    ];

    /// Stage name used in errors, logs, and progress events
    pub fn name(&self) -> &'static str {
        match self {
            FilterStage::Denoise => "denoise",
            FilterStage::EnhanceVoice => "enhance",
            FilterStage::Normalize => "normalize",
            FilterStage::TrimSilence => "trim",
            FilterStage::OptimizeForCloning => "optimize",
            FilterStage::OptimizeForWeb => "optimize_web",
        }
    }

    /// Filename suffix inserted between the input stem and the run token
    pub fn suffix(&self) -> &'static str {
        match self {
            FilterStage::Denoise => "_denoised_",
            FilterStage::EnhanceVoice => "_enhanced_",
            FilterStage::Normalize => "_normalized_",
            FilterStage::TrimSilence => "_trimmed_",
            FilterStage::OptimizeForCloning => "_optimized_",
            FilterStage::OptimizeForWeb => "_web_",
        }
    }

    /// Build the engine invocation parameters for this stage
    pub fn spec(&self) -> StageSpec {
        match self {
            // High-pass/low-pass band limiting, dynamic-range companding,
            // then a noise gate on what remains.
            FilterStage::Denoise => StageSpec {
                name: self.name(),
                filter_graph: Some(
                    [
                        "highpass=f=80",
                        "lowpass=f=8000",
                        "compand=attacks=0.3:decays=0.8:points=-80/-80|-65/-65|-35/-35|-10/-10:soft-knee=6:gain=0:volume=-5",
                        "agate=threshold=0.003:ratio=10:attack=3:release=100",
                    ]
                    .join(","),
                ),
                codec: None,
                sample_rate: None,
                channels: None,
                bitrate_kbps: None,
                container: "wav",
            },
            // Five-band parametric EQ: tame rumble at 100Hz and hiss at
            // 8kHz, lift the speech formant region.
            FilterStage::EnhanceVoice => StageSpec {
                name: self.name(),
                filter_graph: Some(
                    [
                        "equalizer=f=100:t=h:width=100:g=-2",
                        "equalizer=f=300:t=h:width=1000:g=2",
                        "equalizer=f=1000:t=h:width=1000:g=3",
                        "equalizer=f=2000:t=h:width=1000:g=2",
                        "equalizer=f=8000:t=h:width=2000:g=-1",
                    ]
                    .join(","),
                ),
                codec: None,
                sample_rate: None,
                channels: None,
                bitrate_kbps: None,
                container: "wav",
            },
            FilterStage::Normalize => StageSpec {
                name: self.name(),
                filter_graph: Some("loudnorm=I=-16:TP=-1.5:LRA=11".to_string()),
                codec: None,
                sample_rate: None,
                channels: None,
                bitrate_kbps: None,
                container: "wav",
            },
            // Trim the head, reverse, trim the (now leading) tail, reverse
            // back. Silence is anything below -50dBFS lasting 0.5s or more.
            FilterStage::TrimSilence => StageSpec {
                name: self.name(),
                filter_graph: Some(
                    [
                        "silenceremove=start_periods=1:start_duration=0.5:start_threshold=-50dB",
                        "areverse",
                        "silenceremove=start_periods=1:start_duration=0.5:start_threshold=-50dB",
                        "areverse",
                    ]
                    .join(","),
                ),
                codec: None,
                sample_rate: None,
                channels: None,
                bitrate_kbps: None,
                container: "wav",
            },
            // The bitrate setting is a no-op for PCM but is kept for parity
            // with the historical encoder options.
            FilterStage::OptimizeForCloning => StageSpec {
                name: self.name(),
                filter_graph: None,
                codec: Some("pcm_s16le"),
                sample_rate: Some(44_100),
                channels: Some(1),
                bitrate_kbps: Some(128),
                container: "wav",
            },
            FilterStage::OptimizeForWeb => StageSpec {
                name: self.name(),
                filter_graph: None,
                codec: Some("libmp3lame"),
                sample_rate: Some(44_100),
                channels: None,
                bitrate_kbps: Some(128),
                container: "mp3",
            },
        }
    }
}
