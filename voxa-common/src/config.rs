//! Configuration loading and external tool path resolution
//!
//! Resolves the paths of the ffmpeg/ffprobe binaries and the default output
//! directory with the following priority order:
//! 1. Environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (bare tool name, resolved through PATH)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable overriding the ffmpeg binary path
pub const FFMPEG_PATH_ENV: &str = "VOXA_FFMPEG_PATH";
/// Environment variable overriding the ffprobe binary path
pub const FFPROBE_PATH_ENV: &str = "VOXA_FFPROBE_PATH";
/// Environment variable overriding the processed-audio output directory
pub const OUTPUT_DIR_ENV: &str = "VOXA_OUTPUT_DIR";

/// TOML configuration file contents
///
/// Loaded from `<config_dir>/voxa/config.toml` when present. All keys are
/// optional; anything missing falls through to the compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the ffmpeg binary
    pub ffmpeg_path: Option<String>,
    /// Path to the ffprobe binary
    pub ffprobe_path: Option<String>,
    /// Directory for processed audio output
    pub output_dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Load the TOML config file from the platform config directory
    pub fn load() -> Result<Self> {
        let path = config_file_path()?;
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse TOML config file contents
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Resolved external tool configuration
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// ffmpeg binary path or name
    pub ffmpeg_path: String,
    /// ffprobe binary path or name
    pub ffprobe_path: String,
    /// Default output directory for processed audio (None: alongside input)
    pub output_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            output_dir: None,
        }
    }
}

impl ToolConfig {
    /// Resolve tool configuration with ENV → TOML → default priority
    pub fn resolve() -> Self {
        let toml_config = match TomlConfig::load() {
            Ok(config) => config,
            Err(Error::Io(_)) => TomlConfig::default(),
            Err(e) => {
                warn!("Ignoring unreadable config file: {}", e);
                TomlConfig::default()
            }
        };
        Self::resolve_from(&toml_config)
    }

    /// Resolve tool configuration against an already-loaded TOML config
    pub fn resolve_from(toml_config: &TomlConfig) -> Self {
        let defaults = Self::default();

        let ffmpeg_path = resolve_value(
            FFMPEG_PATH_ENV,
            toml_config.ffmpeg_path.clone(),
            defaults.ffmpeg_path,
        );
        let ffprobe_path = resolve_value(
            FFPROBE_PATH_ENV,
            toml_config.ffprobe_path.clone(),
            defaults.ffprobe_path,
        );

        let output_dir = std::env::var(OUTPUT_DIR_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| toml_config.output_dir.clone());

        debug!(
            ffmpeg = %ffmpeg_path,
            ffprobe = %ffprobe_path,
            output_dir = ?output_dir,
            "Resolved tool configuration"
        );

        Self {
            ffmpeg_path,
            ffprobe_path,
            output_dir,
        }
    }
}

/// Resolve a single value with ENV → TOML → default priority
fn resolve_value(env_var: &str, toml_value: Option<String>, default: String) -> String {
    // Priority 1: Environment variable
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return value;
        }
    }

    // Priority 2: TOML config file
    if let Some(value) = toml_value {
        if !value.trim().is_empty() {
            return value;
        }
    }

    // Priority 3: Compiled default
    default
}

/// Get the configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("voxa").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}
