use log::debug;
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::error::{PrepError, PrepResult};

/// Represents the source format of card data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSourceType {
    Json,
    Csv,
}

/// Result of loading card data
#[derive(Debug)]
pub struct CardLoadResult {
    pub dataframe: DataFrame,
    pub source_type: CardSourceType,
    pub num_cards: usize,
}

impl CardLoadResult {
    pub fn new(dataframe: DataFrame, source_type: CardSourceType) -> Self {
        let num_cards = dataframe.height();
        Self {
            dataframe,
            source_type,
            num_cards,
        }
    }
}

/// Unified interface for loading card data from JSON or CSV
pub struct CardLoader;

impl CardLoader {
    /// Load card data from a file (auto-detects JSON or CSV)
    pub fn load_from_file(path: &Path) -> PrepResult<CardLoadResult> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                PrepError::UnsupportedFormat(format!("{} has no extension", path.display()))
            })?;

        match extension.to_lowercase().as_str() {
            "json" => Self::load_from_json(path),
            "csv" => Self::load_from_csv(path),
            _ => Err(PrepError::UnsupportedFormat(extension.to_string())),
        }
    }

    /// Load card data from a JSON file holding an array of card objects
    pub fn load_from_json(json_path: &Path) -> PrepResult<CardLoadResult> {
        debug!("Reading card JSON from {}", json_path.display());
        let bytes = fs::read(json_path)?;
        Self::load_from_json_bytes(&bytes)
    }

    /// Load card data from a JSON string
    pub fn load_from_json_str(json_str: &str) -> PrepResult<CardLoadResult> {
        Self::load_from_json_bytes(json_str.as_bytes())
    }

    /// Load card data from raw JSON bytes, e.g. a downloaded bulk file
    pub fn load_from_json_bytes(bytes: &[u8]) -> PrepResult<CardLoadResult> {
        // Infer over every record: card objects only carry the fields that
        // apply to them, so late rows introduce new columns.
        let df = JsonReader::new(Cursor::new(bytes))
            .with_json_format(JsonFormat::Json)
            .infer_schema_len(None)
            .finish()?;
        Ok(CardLoadResult::new(df, CardSourceType::Json))
    }

    /// Load card data from a CSV file
    pub fn load_from_csv(csv_path: &Path) -> PrepResult<CardLoadResult> {
        debug!("Reading card CSV from {}", csv_path.display());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(csv_path.into()))?
            .finish()?;

        Ok(CardLoadResult::new(df, CardSourceType::Csv))
    }
}
