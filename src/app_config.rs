//! Application configuration: loading, validating and saving the annoflow
//! configuration file.

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::file_utils::{FileManager, PatternSet};
use crate::language_utils;
use crate::pipeline::PipelineConfig;
use crate::stages::StageRegistry;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language code of new documents (ISO)
    #[serde(default = "default_language")]
    pub language: String,

    /// Ordered annotation stages
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Interchange file locations
    #[serde(default)]
    pub io: IoConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where interchange files are written and which ones are read back
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IoConfig {
    // @field: Target directory of `.xmi` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    // @field: Include/exclude patterns for reading
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            patterns: default_patterns(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("/tmp/xmi-temp")
}

fn default_patterns() -> Vec<String> {
    vec!["[+]*.xmi".to_string()]
}

impl Config {
    /// Load the configuration, writing the defaults first if the file is absent
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if FileManager::file_exists(path) {
            let content = FileManager::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.language)?;

        if self.pipeline.stages.is_empty() {
            return Err(anyhow!("Pipeline has no stages"));
        }

        let registry = StageRegistry::with_builtin();
        if let Some(unknown) = self.pipeline.stages.iter().find(|s| !registry.contains(&s.name)) {
            return Err(anyhow!(
                "Unknown stage '{}' (available: {})",
                unknown.name,
                registry.names().collect::<Vec<_>>().join(", ")
            ));
        }

        let patterns = PatternSet::parse(&self.io.patterns)?;
        if !patterns.has_includes() {
            return Err(anyhow!("At least one include pattern is required"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            pipeline: PipelineConfig::default(),
            io: IoConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
