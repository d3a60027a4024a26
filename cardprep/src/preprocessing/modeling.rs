use log::{debug, info};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::columns;
use crate::core::CardTable;
use crate::error::PrepResult;
use crate::transformations::filtering::{
    drop_columns, drop_missing, exclude_rows, high_missing_columns, RowExclusion,
};

/// Modeling preparation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelingSettings {
    /// Columns with a larger missing-value ratio are dropped
    #[serde(default = "default_max_missing_ratio")]
    pub max_missing_ratio: f64,
    /// Rows without this descriptive text are dropped
    #[serde(default = "default_text_column")]
    pub text_column: String,
    /// Extracted into the side table, then dropped
    #[serde(default = "default_links_column")]
    pub links_column: String,
    #[serde(default = "default_drop_columns")]
    pub drop_columns: Vec<String>,
    #[serde(default = "default_exclusions")]
    pub exclusions: Vec<RowExclusion>,
}

fn default_max_missing_ratio() -> f64 {
    0.35
}

fn default_text_column() -> String {
    columns::ORACLE_TEXT.to_string()
}

fn default_links_column() -> String {
    columns::RELATED_URIS.to_string()
}

fn default_drop_columns() -> Vec<String> {
    columns::MODELING_DROP_COLUMNS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclusions() -> Vec<RowExclusion> {
    vec![
        RowExclusion::contains(columns::TYPE_LINE, "Token Creature"),
        RowExclusion::contains(columns::SET_NAME, "Art Series"),
        // Unhinged joke card with a one-million cost
        RowExclusion::exact(columns::NAME, "Gleemax"),
    ]
}

impl Default for ModelingSettings {
    fn default() -> Self {
        Self {
            max_missing_ratio: default_max_missing_ratio(),
            text_column: default_text_column(),
            links_column: default_links_column(),
            drop_columns: default_drop_columns(),
            exclusions: default_exclusions(),
        }
    }
}

/// Output of modeling preparation
#[derive(Debug, Clone)]
pub struct ModelingOutput {
    /// Pruned, modeling-ready table
    pub table: CardTable,
    /// Primary key plus related links, taken before row exclusions
    pub related_links: Option<DataFrame>,
}

/// Reduces a cleaned card table to the rows and columns used for modeling.
#[derive(Debug, Clone, Default)]
pub struct ModelingPrep {
    settings: ModelingSettings,
}

impl ModelingPrep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ModelingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ModelingSettings {
        &self.settings
    }

    /// Prepare a cleaned table for modeling.
    ///
    /// Steps, in order: drop rows without text, extract the links side
    /// table, apply row exclusions, drop sparse columns (ratios measured on
    /// the row-filtered table), drop the fixed column list. The primary key
    /// column always survives.
    pub fn prepare(&self, cleaned: &CardTable) -> PrepResult<ModelingOutput> {
        let settings = &self.settings;
        let key = cleaned.key();
        let mut df = cleaned.frame().clone();
        let input_rows = df.height();

        if df.column(&settings.text_column).is_ok() {
            df = drop_missing(&df, &settings.text_column)?;
        }

        let related_links = if df.column(&settings.links_column).is_ok() {
            let mut selection: Vec<String> = key.map(str::to_string).into_iter().collect();
            selection.push(settings.links_column.clone());
            Some(df.select(selection)?)
        } else {
            None
        };

        for exclusion in &settings.exclusions {
            if df.column(&exclusion.column).is_err() {
                debug!(
                    "Skipping exclusion of '{}': column '{}' not present",
                    exclusion.pattern, exclusion.column
                );
                continue;
            }
            df = exclude_rows(&df, exclusion)?;
        }

        let sparse = high_missing_columns(&df, settings.max_missing_ratio, key);
        if !sparse.is_empty() {
            debug!("Dropping sparse columns: {:?}", sparse);
        }

        let mut to_drop = sparse;
        to_drop.extend(settings.drop_columns.iter().cloned());
        to_drop.push(settings.links_column.clone());
        to_drop.retain(|name| Some(name.as_str()) != key);

        df = drop_columns(&df, &to_drop)?;

        info!(
            "Modeling table: {} of {} cards kept, {} columns",
            df.height(),
            input_rows,
            df.width()
        );

        Ok(ModelingOutput {
            table: cleaned.derive(df),
            related_links,
        })
    }
}
