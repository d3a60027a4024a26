use log::info;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

use super::DataSource;
use crate::error::{PrepError, PrepResult};
use crate::io::CardLoader;

/// Reads `<root>/<dataset>.json`, falling back to `<root>/<dataset>.csv`.
#[derive(Debug, Clone)]
pub struct LocalDataSource {
    root: PathBuf,
}

impl LocalDataSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the first existing file for `dataset`.
    pub fn resolve(&self, dataset: &str) -> PrepResult<PathBuf> {
        if dataset.is_empty() || dataset.contains(['/', '\\']) || dataset.contains("..") {
            return Err(PrepError::DatasetNotFound(dataset.to_string()));
        }

        ["json", "csv"]
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", dataset, ext)))
            .find(|path| path.is_file())
            .ok_or_else(|| PrepError::DatasetNotFound(dataset.to_string()))
    }
}

impl DataSource for LocalDataSource {
    fn fetch(&self, dataset: &str) -> PrepResult<DataFrame> {
        let path = self.resolve(dataset)?;
        let result = CardLoader::load_from_file(&path)?;
        info!(
            "Loaded {} cards from {}",
            result.num_cards,
            path.display()
        );
        Ok(result.dataframe)
    }

    fn describe(&self) -> String {
        format!("local files in {}", self.root.display())
    }
}
