use log::{info, warn};
use polars::prelude::*;

use crate::config::PrepConfig;
use crate::core::columns;
use crate::core::CardTable;
use crate::error::PrepResult;
use crate::preprocessing::modeling::ModelingPrep;
use crate::preprocessing::validator::{CardValidator, ValidationResult};
use crate::source::DataSource;
use crate::transformations::cleaning::CardCleaner;

/// Result of a preparation run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Every raw row, repaired
    pub cleaned: CardTable,
    /// Rows and columns kept for modeling
    pub modeling: CardTable,
    /// Primary key plus related links, when the links column was present
    pub related_links: Option<DataFrame>,
    pub validation: ValidationResult,
}

/// Main preparation pipeline: clean, then reduce for modeling.
pub struct PrepPipeline {
    config: PrepConfig,
}

impl PrepPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self {
            config: PrepConfig::default(),
        }
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: PrepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Fetch `dataset` from `source` and prepare it.
    ///
    /// # Arguments
    /// * `source` - Provider that resolves the dataset name to a raw table
    /// * `dataset` - Dataset identifier, e.g. `oracle_cards`
    ///
    /// # Returns
    /// PipelineResult with both tables, the links side table and validation info
    pub fn process(&self, source: &dyn DataSource, dataset: &str) -> PrepResult<PipelineResult> {
        info!("Fetching '{}' from {}", dataset, source.describe());
        let raw = source.fetch(dataset)?;
        self.process_frame(raw)
    }

    /// Prepare an already loaded raw table.
    pub fn process_frame(&self, raw: DataFrame) -> PrepResult<PipelineResult> {
        info!("Raw table: {} cards, {} columns", raw.height(), raw.width());

        // Step 1: Clean
        let cleaner = CardCleaner::new(self.config.cleaning.repairs.clone());
        let cleaned = cleaner.clean(&CardTable::new(raw))?;
        info!(
            "Cleaned table: {} cards, {} columns",
            cleaned.height(),
            cleaned.width()
        );

        // Step 2: Reduce for modeling
        let prep = ModelingPrep::with_settings(self.config.modeling.clone());
        let output = prep.prepare(&cleaned)?;
        if let Some(links) = &output.related_links {
            info!("Extracted {} {} rows", links.height(), columns::RELATED_URIS);
        }

        // Step 3: Validate (if requested)
        let validation = if self.config.pipeline.validate {
            let mut validation = CardValidator::validate_cleaned(&cleaned);
            validation.merge(CardValidator::validate_modeling(
                &output.table,
                prep.settings(),
            ));
            report(&validation);
            validation
        } else {
            ValidationResult::new()
        };

        Ok(PipelineResult {
            cleaned,
            modeling: output.table,
            related_links: output.related_links,
            validation,
        })
    }
}

impl Default for PrepPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn report(validation: &ValidationResult) {
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    for error in &validation.errors {
        warn!("Post-condition failed: {}", error);
    }
}

/// Convenience function to prepare a dataset with default settings
pub fn prepare_cards(source: &dyn DataSource, dataset: &str) -> PrepResult<PipelineResult> {
    PrepPipeline::new().process(source, dataset)
}
