//! Configuration management for SquarePad

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{Result, SquarePadError};
use crate::processing::FilterType;

/// Root under which run folders are created when nothing else is configured
pub const DEFAULT_OUTPUT_ROOT: &str = "datasets";

/// Neutral gray used for letterbox padding
pub const DEFAULT_FILL: u8 = 114;

/// Largest accepted target size in pixels
pub const MAX_TARGET_SIZE: u32 = 32768;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Letterbox and output settings
    pub processing: ProcessingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Letterbox processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Side of the square every output is normalized to
    pub target_size: u32,

    /// Directory that receives one timestamped folder per run
    pub output_root: PathBuf,

    /// Padding level applied to every color channel
    pub fill: u8,

    /// Resampling filter used when scaling
    pub filter: FilterType,

    /// JPEG output quality (1-100)
    pub quality: u8,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            target_size: 640,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            fill: DEFAULT_FILL,
            filter: FilterType::default(),
            quality: 75,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a `.toml`, `.yaml` or `.yml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SquarePadError::config(
                format!("Failed to read config file {:?}: {}", path.as_ref(), e)
            ))?;

        match config_extension(path.as_ref()).as_str() {
            "toml" => toml::from_str(&content).map_err(Into::into),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(Into::into),
            _ => Err(SquarePadError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        }
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match config_extension(path.as_ref()).as_str() {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| SquarePadError::config(format!("TOML serialization failed: {}", e)))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| SquarePadError::config(format!("YAML serialization failed: {}", e)))?,
            _ => return Err(SquarePadError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        std::fs::write(&path, content)
            .map_err(|e| SquarePadError::config(
                format!("Failed to write config file {:?}: {}", path.as_ref(), e)
            ))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.processing.validate()?;

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(SquarePadError::config(
                format!("Unknown log level '{}'. Expected one of {:?}", self.logging.level, LOG_LEVELS)
            ));
        }

        Ok(())
    }
}

impl ProcessingConfig {
    /// Validate processing settings
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 || self.target_size > MAX_TARGET_SIZE {
            return Err(SquarePadError::config(
                format!("Target size must be between 1-{}, got {}", MAX_TARGET_SIZE, self.target_size)
            ));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(SquarePadError::config(
                format!("Quality must be between 1-100, got {}", self.quality)
            ));
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(SquarePadError::config("Output root must not be empty"));
        }

        Ok(())
    }
}

fn config_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}
