//! Audio upload validators
//!
//! Cheap, eager checks that run before any processing is attempted. Two
//! different minimum-size rules coexist deliberately:
//!
//! - [`validate_audio_for_voice_cloning`] requires 500KB of the multipart
//!   upload descriptor, before processing starts;
//! - [`validate_saved_sample`] requires 100KB of the already-saved file,
//!   immediately before the cloning API call.
//!
//! The thresholds differ and are enforced at different call sites; they
//! must not be unified (see DESIGN.md).

use serde::Serialize;
use std::path::Path;

/// Maximum accepted upload size (25 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;
/// Minimum accepted upload size (1 KiB)
pub const MIN_UPLOAD_BYTES: u64 = 1024;
/// Minimum upload size for voice cloning (500KB)
pub const MIN_CLONING_BYTES: u64 = 512_000;
/// Minimum saved-sample size for voice creation (100 KiB)
pub const MIN_SAVED_SAMPLE_BYTES: u64 = 100 * 1024;

/// MIME types accepted for audio uploads
const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/flac",
    "audio/x-flac",
    "audio/mp4",
    "audio/m4a",
    "audio/aac",
    "audio/ogg",
    "audio/webm",
];

/// File extensions accepted for audio uploads
const ALLOWED_EXTENSIONS: &[&str] = &[".mp3", ".wav", ".m4a", ".flac", ".aac", ".ogg", ".webm"];

/// Multipart upload descriptor, as received from the web layer
#[derive(Debug, Clone)]
pub struct UploadedAudio {
    /// Original client-side file name
    pub file_name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Payload size in bytes
    pub size_bytes: u64,
}

impl UploadedAudio {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Lowercased extension including the dot, if the name has one
    fn extension(&self) -> Option<String> {
        self.file_name
            .rfind('.')
            .map(|i| self.file_name[i..].to_ascii_lowercase())
    }
}

/// Validation verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the file passed every check
    pub valid: bool,
    /// First failing check's message, absent when valid
    pub error: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Cloning-specific validation verdict, with the sizes the UI displays
#[derive(Debug, Clone, Serialize)]
pub struct CloningValidation {
    /// Whether the file passed every check
    pub valid: bool,
    /// First failing check's message, absent when valid
    pub error: Option<String>,
    /// Upload size in mebibytes
    pub size_mb: f64,
    /// Upload size in kibibytes
    pub size_kb: f64,
}

/// Validate an audio upload
///
/// Checks run in order (MIME type, extension, maximum size, minimum
/// size) and the first failure wins. Pure function of the descriptor:
/// validating the same unchanged file twice yields the same verdict.
pub fn validate_audio_file(file: &UploadedAudio) -> ValidationResult {
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.to_ascii_lowercase().as_str()) {
        return ValidationResult::fail(format!(
            "Unsupported audio format: {}. Please upload MP3, WAV, M4A, FLAC, AAC, OGG, or WebM audio.",
            file.mime_type
        ));
    }

    match file.extension() {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        other => {
            return ValidationResult::fail(format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                other.unwrap_or_else(|| "(none)".to_string()),
                ALLOWED_EXTENSIONS.join(", ")
            ));
        }
    }

    if file.size_bytes > MAX_UPLOAD_BYTES {
        return ValidationResult::fail("File is too large. Maximum audio upload size is 25MB.");
    }

    if file.size_bytes < MIN_UPLOAD_BYTES {
        return ValidationResult::fail(
            "File is too small. The audio file appears to be empty or truncated.",
        );
    }

    ValidationResult::ok()
}

/// Validate an audio upload for voice cloning
///
/// Base validation plus a 500KB floor; cloning needs enough material to
/// work with.
pub fn validate_audio_for_voice_cloning(file: &UploadedAudio) -> CloningValidation {
    let size_mb = file.size_bytes as f64 / (1024.0 * 1024.0);
    let size_kb = file.size_bytes as f64 / 1024.0;

    let base = validate_audio_file(file);
    if !base.valid {
        return CloningValidation {
            valid: false,
            error: base.error,
            size_mb,
            size_kb,
        };
    }

    if file.size_bytes < MIN_CLONING_BYTES {
        return CloningValidation {
            valid: false,
            error: Some(
                "Audio file is too small for voice cloning. Provide at least 500KB of audio (about 30 seconds of clear speech).".to_string(),
            ),
            size_mb,
            size_kb,
        };
    }

    CloningValidation {
        valid: true,
        error: None,
        size_mb,
        size_kb,
    }
}

/// Validate an already-saved sample right before voice creation
///
/// Applies the independent 100KB floor to a file the upload handler has
/// already written to disk. Distinct from the 500KB pre-processing check
/// by design.
pub fn validate_saved_sample(path: &Path, size_bytes: u64) -> ValidationResult {
    if size_bytes < MIN_SAVED_SAMPLE_BYTES {
        return ValidationResult::fail(format!(
            "Audio sample {} is too small for voice creation. At least 100KB of audio is required.",
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        ));
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn wav(size_bytes: u64) -> UploadedAudio {
        UploadedAudio::new("sample.wav", "audio/wav", size_bytes)
    }

    #[test]
    fn test_rejects_non_audio_mime() {
        // 2KB text file posing as an upload
        let file = UploadedAudio::new("notes.wav", "text/plain", 2048);
        let result = validate_audio_file(&file);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("Unsupported audio format"));
    }

    #[test]
    fn test_rejects_mismatched_extension() {
        let file = UploadedAudio::new("sample.txt", "audio/wav", 2048);
        let result = validate_audio_file(&file);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("Unsupported file extension"));
    }

    #[test]
    fn test_rejects_missing_extension() {
        let file = UploadedAudio::new("sample", "audio/wav", 2048);
        let result = validate_audio_file(&file);
        assert!(!result.valid);
    }

    #[test]
    fn test_mime_check_precedes_extension_check() {
        // Both wrong: the MIME message must win
        let file = UploadedAudio::new("notes.txt", "text/plain", 2048);
        let error = validate_audio_file(&file).error.unwrap();
        assert!(error.contains("Unsupported audio format"));
    }

    #[test]
    fn test_accepts_all_allowed_types() {
        let cases = [
            ("a.mp3", "audio/mpeg"),
            ("a.mp3", "audio/mp3"),
            ("a.wav", "audio/wav"),
            ("a.wav", "audio/wave"),
            ("a.wav", "audio/x-wav"),
            ("a.flac", "audio/flac"),
            ("a.flac", "audio/x-flac"),
            ("a.m4a", "audio/mp4"),
            ("a.m4a", "audio/m4a"),
            ("a.aac", "audio/aac"),
            ("a.ogg", "audio/ogg"),
            ("a.webm", "audio/webm"),
        ];
        for (name, mime) in cases {
            let file = UploadedAudio::new(name, mime, 10 * 1024);
            assert!(validate_audio_file(&file).valid, "{} / {}", name, mime);
        }
    }

    #[test]
    fn test_extension_case_insensitive() {
        let file = UploadedAudio::new("SAMPLE.WAV", "audio/wav", 10 * 1024);
        assert!(validate_audio_file(&file).valid);
    }

    #[test]
    fn test_min_size_boundary() {
        assert!(validate_audio_file(&wav(1024)).valid);

        let result = validate_audio_file(&wav(1023));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("too small"));
    }

    #[test]
    fn test_max_size_boundary() {
        assert!(validate_audio_file(&wav(25 * 1024 * 1024)).valid);

        let result = validate_audio_file(&wav(25 * 1024 * 1024 + 1));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("too large"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let file = wav(1023);
        assert_eq!(validate_audio_file(&file), validate_audio_file(&file));
        let file = wav(10 * 1024);
        assert_eq!(validate_audio_file(&file), validate_audio_file(&file));
    }

    #[test]
    fn test_cloning_floor_applies_after_base_checks() {
        // 10KB passes base validation but is under the cloning floor
        let file = wav(10 * 1024);
        assert!(validate_audio_file(&file).valid);

        let result = validate_audio_for_voice_cloning(&file);
        assert!(!result.valid);
        assert!(result
            .error
            .unwrap()
            .contains("too small for voice cloning"));
    }

    #[test]
    fn test_cloning_reports_sizes() {
        let result = validate_audio_for_voice_cloning(&wav(512_000));
        assert!(result.valid);
        assert_eq!(result.size_kb, 500.0);
        assert!((result.size_mb - 0.48828125).abs() < 1e-9);
    }

    #[test]
    fn test_cloning_boundary() {
        assert!(validate_audio_for_voice_cloning(&wav(512_000)).valid);
        assert!(!validate_audio_for_voice_cloning(&wav(511_999)).valid);
    }

    #[test]
    fn test_cloning_propagates_base_failure() {
        let file = UploadedAudio::new("notes.wav", "text/plain", 700_000);
        let result = validate_audio_for_voice_cloning(&file);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("Unsupported audio format"));
    }

    #[test]
    fn test_saved_sample_floor_is_independent() {
        let path = PathBuf::from("/data/samples/voice.wav");

        // 200KB: under the 500KB cloning floor, over the 100KB saved floor
        assert!(validate_saved_sample(&path, 200 * 1024).valid);
        assert!(!validate_audio_for_voice_cloning(&wav(200 * 1024)).valid);

        assert!(validate_saved_sample(&path, 100 * 1024).valid);
        let result = validate_saved_sample(&path, 100 * 1024 - 1);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("voice creation"));
    }
}
