//! Data source providers.
//!
//! A [`DataSource`] turns a dataset name (`oracle_cards`, `default_cards`,
//! ...) into a raw card DataFrame. Sources are created from configuration
//! through [`SourceFactory`].

pub mod local;
#[cfg(feature = "remote")]
pub mod scryfall;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{PrepError, PrepResult};

pub use local::LocalDataSource;
#[cfg(feature = "remote")]
pub use scryfall::{BulkDataEntry, ScryfallDataSource};

/// Supplies raw card tables by dataset name.
pub trait DataSource {
    /// Fetch the raw table for `dataset`.
    fn fetch(&self, dataset: &str) -> PrepResult<DataFrame>;

    /// Short description used in log messages.
    fn describe(&self) -> String;
}

/// Data source kind configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Files on local disk
    Local,
    /// Scryfall bulk-data API
    Scryfall,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "scryfall" => Ok(Self::Scryfall),
            _ => Err(format!("Unknown source kind: {}", s)),
        }
    }
}

/// Data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_dataset")]
    pub dataset: String,
}

fn default_kind() -> String {
    "local".to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_api_base() -> String {
    "https://api.scryfall.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_dataset() -> String {
    "oracle_cards".to_string()
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            root: default_root(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            dataset: default_dataset(),
        }
    }
}

impl SourceSettings {
    /// Get the source kind from configuration.
    pub fn kind(&self) -> PrepResult<SourceKind> {
        SourceKind::from_str(&self.kind).map_err(PrepError::Config)
    }
}

/// Factory for creating data sources from settings.
pub struct SourceFactory;

impl SourceFactory {
    /// Create a data source based on the configured kind.
    ///
    /// # Errors
    /// * `PrepError::Config` for an unknown kind, or a Scryfall source when
    ///   the crate is built without the `remote` feature
    pub fn create(settings: &SourceSettings) -> PrepResult<Box<dyn DataSource>> {
        match settings.kind()? {
            SourceKind::Local => Ok(Box::new(LocalDataSource::new(&settings.root))),
            SourceKind::Scryfall => Self::create_scryfall(settings),
        }
    }

    #[cfg(feature = "remote")]
    fn create_scryfall(settings: &SourceSettings) -> PrepResult<Box<dyn DataSource>> {
        let source = ScryfallDataSource::new(
            &settings.api_base,
            std::time::Duration::from_secs(settings.timeout_secs),
        )?;
        Ok(Box::new(source))
    }

    #[cfg(not(feature = "remote"))]
    fn create_scryfall(_settings: &SourceSettings) -> PrepResult<Box<dyn DataSource>> {
        Err(PrepError::Config(
            "Scryfall source requires the `remote` feature".to_string(),
        ))
    }
}
