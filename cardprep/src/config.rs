//! Configuration file support.
//!
//! This module reads the preparation settings from a TOML file. Every
//! section is optional; a missing section takes the Scryfall defaults.
//!
//! ```toml
//! [source]
//! kind = "local"
//! root = "data"
//! dataset = "oracle_cards"
//!
//! [modeling]
//! max_missing_ratio = 0.35
//!
//! [pipeline]
//! validate = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrepError, PrepResult};
use crate::imaging::{ImageSettings, IMAGE_VARIANTS};
use crate::preprocessing::modeling::ModelingSettings;
use crate::source::SourceSettings;
use crate::transformations::cleaning::{scryfall_repairs, ColumnRepair};

const CONFIG_SEARCH_PATHS: [&str; 3] = [
    "cardprep.toml",
    "config/cardprep.toml",
    "../cardprep.toml",
];

/// Preparation configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrepConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub cleaning: CleaningSettings,
    #[serde(default)]
    pub modeling: ModelingSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub images: ImageSettings,
}

/// Column repairs, in application order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSettings {
    #[serde(default = "scryfall_repairs")]
    pub repairs: Vec<ColumnRepair>,
}

impl Default for CleaningSettings {
    fn default() -> Self {
        Self {
            repairs: scryfall_repairs(),
        }
    }
}

/// Pipeline behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_validate")]
    pub validate: bool,
}

fn default_validate() -> bool {
    true
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            validate: default_validate(),
        }
    }
}

impl PrepConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(PrepConfig)` if successful
    /// * `Err(PrepError::Config)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> PrepResult<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| PrepError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> PrepResult<Self> {
        let config: PrepConfig = toml::from_str(content)
            .map_err(|e| PrepError::Config(format!("Failed to parse config file: {}", e)))?;

        config.check()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `cardprep.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(PrepConfig)` if found and parsed successfully
    /// * `Err(PrepError::Config)` if no config file found or parse error
    pub fn from_default_location() -> PrepResult<Self> {
        match Self::find_in(Path::new(".")) {
            Some(path) => Self::from_file(path),
            None => Err(PrepError::Config(
                "No cardprep.toml found in standard locations".to_string(),
            )),
        }
    }

    /// Configuration from the default location, or built-in defaults when
    /// no file exists. A file that exists but fails to parse is an error.
    pub fn load_or_default() -> PrepResult<Self> {
        Self::load_or_default_from(Path::new("."))
    }

    /// Like [`load_or_default`](Self::load_or_default), searching relative
    /// to `base` instead of the current directory.
    pub fn load_or_default_from(base: &Path) -> PrepResult<Self> {
        match Self::find_in(base) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// First existing `cardprep.toml` among the standard locations under `base`.
    pub fn find_in(base: &Path) -> Option<PathBuf> {
        CONFIG_SEARCH_PATHS
            .iter()
            .map(|relative| base.join(relative))
            .find(|path| path.is_file())
    }

    fn check(&self) -> PrepResult<()> {
        let ratio = self.modeling.max_missing_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(PrepError::Config(format!(
                "modeling.max_missing_ratio must be within [0, 1], got {}",
                ratio
            )));
        }

        if !IMAGE_VARIANTS.contains(&self.images.variant.as_str()) {
            return Err(PrepError::Config(format!(
                "images.variant must be one of {}, got '{}'",
                IMAGE_VARIANTS.join(", "),
                self.images.variant
            )));
        }

        if self.source.timeout_secs == 0 {
            return Err(PrepError::Config(
                "source.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
