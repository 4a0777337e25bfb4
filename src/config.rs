//! Configuration file support.
//!
//! Every section is optional. Presets are pushed through the parameter
//! store's clamping `set`, so an out-of-range preset is clamped like a
//! slider overshoot, while an unknown filter or parameter name is rejected.

use crate::core::error::ConfigError;
use crate::core::types::ImageFormat;
use crate::core::variant::FilterVariant;
use crate::execution::store::ParameterStore;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "filterdeck.toml";

/// Complete configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioConfig {
    /// Logger settings
    pub logging: LoggingConfig,
    /// Output settings
    pub output: OutputConfig,
    /// Batch input discovery
    pub batch: BatchConfig,
    /// Starting parameter values, keyed by filter id then parameter name
    pub presets: IndexMap<String, IndexMap<String, f64>>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter for env_logger, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of files written by batch runs
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
        }
    }
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// File name glob
    pub pattern: String,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pattern: "*".to_string(),
            recursive: false,
        }
    }
}

impl StudioConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: StudioConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_path_buf(),
            error,
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else `filterdeck.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(CONFIG_FILENAME).is_file() => Self::from_file(CONFIG_FILENAME),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.log_filter()?;
        self.output_format()?;
        Ok(())
    }

    /// The logging level as a `log` filter.
    pub fn log_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.logging
            .level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.logging.level.clone()))
    }

    /// The output format of batch runs.
    pub fn output_format(&self) -> Result<ImageFormat, ConfigError> {
        match ImageFormat::from_extension(&self.output.format) {
            ImageFormat::Unknown => Err(ConfigError::OutputFormat(self.output.format.clone())),
            format => Ok(format),
        }
    }

    /// Push every preset into the store. Returns how many were applied.
    pub fn apply_presets(&self, store: &mut ParameterStore) -> Result<usize, ConfigError> {
        let mut applied = 0;
        for (filter_id, params) in &self.presets {
            let variant: FilterVariant = filter_id.parse()?;
            for (name, value) in params {
                let stored = store.set(variant, name, *value)?;
                log::debug!("Preset {}.{} = {}", variant, name, stored);
                applied += 1;
            }
        }
        Ok(applied)
    }
}
