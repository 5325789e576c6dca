//! Upload validation

pub mod upload;

pub use upload::{
    validate_audio_file, validate_audio_for_voice_cloning, validate_saved_sample,
    CloningValidation, UploadedAudio, ValidationResult,
};
