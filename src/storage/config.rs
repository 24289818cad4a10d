//! Parser configuration.
//!
//! Defaults match the observed Stages export format. A `config.toml` in the
//! platform config directory, or an explicit path, can override them.

use crate::parser::layout::ColumnLayout;
use crate::parser::segmenter::MarkerRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of header lines the bike writes before the first sample.
pub const DEFAULT_HEADER_LINES: usize = 3;

/// Settings that select how an export is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lines skipped unconditionally at the top of the file
    pub header_lines: usize,
    /// Column schema of the firmware that wrote the export
    pub layout: ColumnLayout,
    /// Drop the heart-rate column (no sensor was connected)
    pub drop_heart_rate: bool,
    /// First tokens of stage/ride transition lines
    pub stage_keywords: Vec<String>,
    /// First token of the line closing a summary table
    pub summary_end_keyword: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let rules = MarkerRules::default();
        Self {
            header_lines: DEFAULT_HEADER_LINES,
            layout: ColumnLayout::default(),
            drop_heart_rate: false,
            stage_keywords: rules.stage_keywords,
            summary_end_keyword: rules.summary_end_keyword,
        }
    }
}

impl ParserConfig {
    /// Segmentation keywords.
    pub fn marker_rules(&self) -> MarkerRules {
        MarkerRules {
            stage_keywords: self.stage_keywords.clone(),
            summary_end_keyword: self.summary_end_keyword.clone(),
        }
    }

    /// Check the settings can drive the segmenter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stage_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "stage_keywords must contain at least one keyword".to_string(),
            ));
        }
        if self.summary_end_keyword.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "summary_end_keyword must not be empty".to_string(),
            ));
        }
        if self.stage_keywords.contains(&self.summary_end_keyword) {
            return Err(ConfigError::Invalid(format!(
                "{:?} cannot be both a stage keyword and the summary end keyword",
                self.summary_end_keyword
            )));
        }
        Ok(())
    }
}

/// Get the application config directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "stagesride", "StagesRide")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load configuration from the default location, falling back to defaults.
pub fn load_config() -> Result<ParserConfig, ConfigError> {
    let path = get_config_path();

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ParserConfig::default());
    }

    load_config_from(&path)
}

/// Load configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<ParserConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

    let config: ParserConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save configuration to a file.
pub fn save_config_to(config: &ParserConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
