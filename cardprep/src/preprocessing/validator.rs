//! Post-condition checks with detailed error and warning reporting.
//!
//! This module checks cleaned and modeling-ready card tables against the
//! guarantees of the preparation stages: complete ranks, no missing
//! power/toughness, normalized costs, no sparse columns and no excluded
//! rows left behind. Only columns that are present are checked; the report
//! never rejects a table on its own.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::columns;
use crate::core::CardTable;
use crate::preprocessing::modeling::ModelingSettings;

/// How many offending values are listed before a summary line
const MAX_LISTED: usize = 5;

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false, while warnings are informational.
///
/// # Examples
///
/// ```
/// use cardprep::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("3 cards have no rank".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
///
/// # Fields
///
/// * `total_cards` - Number of rows validated
/// * `missing_ranks` - Rows without a rank
/// * `duplicate_ranks` - Rank values shared with an earlier row
/// * `missing_stats` - Missing power or toughness values
/// * `missing_costs` - Rows without a cost notation
/// * `bracketed_costs` - Cost notations still carrying `{` or `}`
/// * `duplicate_keys` - Primary-key values shared with an earlier row
/// * `sparse_columns` - Columns above the missingness threshold
/// * `excluded_rows` - Rows an exclusion rule should have removed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_cards: usize,
    pub missing_ranks: usize,
    pub duplicate_ranks: usize,
    pub missing_stats: usize,
    pub missing_costs: usize,
    pub bracketed_costs: usize,
    pub duplicate_keys: usize,
    pub sparse_columns: usize,
    pub excluded_rows: usize,
}

impl ValidationResult {
    /// Creates a new validation result with valid status and empty lists.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one, summing statistics.
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.add_error(error);
        }
        self.warnings.extend(other.warnings);

        let stats = other.stats;
        self.stats.total_cards = self.stats.total_cards.max(stats.total_cards);
        self.stats.missing_ranks += stats.missing_ranks;
        self.stats.duplicate_ranks += stats.duplicate_ranks;
        self.stats.missing_stats += stats.missing_stats;
        self.stats.missing_costs += stats.missing_costs;
        self.stats.bracketed_costs += stats.bracketed_costs;
        self.stats.duplicate_keys += stats.duplicate_keys;
        self.stats.sparse_columns += stats.sparse_columns;
        self.stats.excluded_rows += stats.excluded_rows;
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for prepared card tables.
///
/// # Examples
///
/// ```
/// use cardprep::core::CardTable;
/// use cardprep::preprocessing::validator::CardValidator;
/// use polars::prelude::*;
///
/// let frame = df!(
///     "edhrec_rank" => [Some(1i64), None],
///     "mana_cost" => ["2/U", "{G}"],
/// ).unwrap();
///
/// let result = CardValidator::validate_cleaned(&CardTable::new(frame));
/// assert!(!result.is_valid);
/// assert_eq!(result.stats.missing_ranks, 1);
/// assert_eq!(result.stats.bracketed_costs, 1);
/// ```
pub struct CardValidator;

impl CardValidator {
    /// Validates a cleaned table.
    ///
    /// # Error Conditions
    ///
    /// - Missing ranks
    /// - Missing power or toughness
    /// - Missing cost notation, or cost notation with braces
    ///
    /// Duplicate ranks and duplicate primary keys are warnings.
    pub fn validate_cleaned(table: &CardTable) -> ValidationResult {
        let mut result = ValidationResult::new();
        let df = table.frame();

        result.stats.total_cards = df.height();

        if let Ok(ranks) = df.column(columns::EDHREC_RANK) {
            result.stats.missing_ranks = ranks.null_count();
            if result.stats.missing_ranks > 0 {
                result.add_error(format!(
                    "{} cards have no {}",
                    result.stats.missing_ranks,
                    columns::EDHREC_RANK
                ));
            }

            result.stats.duplicate_ranks = count_duplicates(ranks);
            if result.stats.duplicate_ranks > 0 {
                result.add_warning(format!(
                    "Found {} duplicate {} values",
                    result.stats.duplicate_ranks,
                    columns::EDHREC_RANK
                ));
            }
        }

        for name in [columns::POWER, columns::TOUGHNESS] {
            if let Ok(column) = df.column(name) {
                let missing = column.null_count();
                if missing > 0 {
                    result.stats.missing_stats += missing;
                    result.add_error(format!("{} cards have no {}", missing, name));
                }
            }
        }

        if let Ok(costs) = df.column(columns::MANA_COST) {
            result.stats.missing_costs = costs.null_count();
            if result.stats.missing_costs > 0 {
                result.add_error(format!(
                    "{} cards have no {}",
                    result.stats.missing_costs,
                    columns::MANA_COST
                ));
            }
            Self::check_brackets(costs, &mut result);
        }

        if let Some(key) = table.key() {
            if let Ok(keys) = df.column(key) {
                result.stats.duplicate_keys = count_duplicates(keys);
                if result.stats.duplicate_keys > 0 {
                    result.add_warning(format!(
                        "Found {} duplicate {} values",
                        result.stats.duplicate_keys, key
                    ));
                }
            }
        }

        result
    }

    /// Validates a modeling-ready table.
    ///
    /// # Error Conditions
    ///
    /// - A column other than the primary key above `max_missing_ratio`
    /// - A row matching one of the exclusion rules
    pub fn validate_modeling(table: &CardTable, settings: &ModelingSettings) -> ValidationResult {
        let mut result = ValidationResult::new();
        let df = table.frame();

        result.stats.total_cards = df.height();

        for name in table.column_names() {
            if Some(name.as_str()) == table.key() {
                continue;
            }
            if let Some(ratio) = table.missing_ratio(&name) {
                if ratio > settings.max_missing_ratio {
                    result.stats.sparse_columns += 1;
                    result.add_error(format!(
                        "Column {} is {:.1}% missing (limit {:.1}%)",
                        name,
                        ratio * 100.0,
                        settings.max_missing_ratio * 100.0
                    ));
                }
            }
        }

        for exclusion in &settings.exclusions {
            let Ok(column) = df.column(&exclusion.column) else {
                continue;
            };
            let Ok(values) = column.as_materialized_series().cast(&DataType::String) else {
                continue;
            };
            let Ok(values) = values.str() else {
                continue;
            };

            let matches = values.into_iter().filter(|v| exclusion.matches(*v)).count();
            if matches > 0 {
                result.stats.excluded_rows += matches;
                result.add_error(format!(
                    "{} rows still match excluded {} '{}'",
                    matches, exclusion.column, exclusion.pattern
                ));
            }
        }

        result
    }

    fn check_brackets(costs: &Column, result: &mut ValidationResult) {
        let Ok(values) = costs.str() else {
            result.add_warning(format!(
                "{} is not a string column: {}",
                columns::MANA_COST,
                costs.dtype()
            ));
            return;
        };

        for cost in values.into_iter().flatten() {
            if cost.contains(['{', '}']) {
                result.stats.bracketed_costs += 1;
                if result.stats.bracketed_costs <= MAX_LISTED {
                    result.add_error(format!("Cost notation still bracketed: {}", cost));
                }
            }
        }

        if result.stats.bracketed_costs > MAX_LISTED {
            result.add_error(format!(
                "Total bracketed costs: {} (showing first {})",
                result.stats.bracketed_costs, MAX_LISTED
            ));
        }
    }
}

fn count_duplicates(column: &Column) -> usize {
    let Ok(values) = column.as_materialized_series().cast(&DataType::String) else {
        return 0;
    };
    let Ok(values) = values.str() else {
        return 0;
    };

    let mut seen = HashSet::new();
    values
        .into_iter()
        .flatten()
        .filter(|v| !seen.insert(*v))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_clean_table() {
        let df = df!(
            "oracle_id" => ["a1", "b2"],
            "edhrec_rank" => [1i64, 2],
            "power" => ["0", "2"],
            "toughness" => ["0", "2"],
            "mana_cost" => ["U", "1/G"],
        )
        .unwrap();
        let table = CardTable::with_key(df, "oracle_id").unwrap();

        let result = CardValidator::validate_cleaned(&table);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.total_cards, 2);
    }

    #[test]
    fn test_validate_dirty_table() {
        let df = df!(
            "oracle_id" => ["a1", "a1", "c3"],
            "edhrec_rank" => [Some(1i64), Some(1), None],
            "power" => [Some("1"), None, None],
            "mana_cost" => [Some("{U}"), None, Some("2/U")],
        )
        .unwrap();
        let table = CardTable::with_key(df, "oracle_id").unwrap();

        let result = CardValidator::validate_cleaned(&table);
        assert!(!result.is_valid);
        assert_eq!(result.stats.missing_ranks, 1);
        assert_eq!(result.stats.duplicate_ranks, 1);
        assert_eq!(result.stats.missing_stats, 2);
        assert_eq!(result.stats.missing_costs, 1);
        assert_eq!(result.stats.bracketed_costs, 1);
        assert_eq!(result.stats.duplicate_keys, 1);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_bracketed_costs_are_capped() {
        let costs: Vec<String> = (0..8).map(|i| format!("{{{}}}", i)).collect();
        let df = DataFrame::new(vec![Series::new("mana_cost".into(), costs).into()]).unwrap();

        let result = CardValidator::validate_cleaned(&CardTable::new(df));
        assert_eq!(result.stats.bracketed_costs, 8);
        assert_eq!(result.errors.len(), MAX_LISTED + 1);
    }

    #[test]
    fn test_validate_modeling() {
        let df = df!(
            "oracle_id" => [None, None, Some("c3")],
            "name" => ["Opt", "Gleemax", "Shock"],
            "flavor_text" => [None, None, Some("...")],
        )
        .unwrap();
        let table = CardTable::with_key(df, "oracle_id").unwrap();

        let result = CardValidator::validate_modeling(&table, &ModelingSettings::default());
        assert!(!result.is_valid);
        assert_eq!(result.stats.sparse_columns, 1);
        assert_eq!(result.stats.excluded_rows, 1);
    }

    #[test]
    fn test_merge() {
        let mut first = ValidationResult::new();
        first.stats.total_cards = 10;
        let mut second = ValidationResult::new();
        second.stats.total_cards = 8;
        second.stats.sparse_columns = 2;
        second.add_error("sparse".to_string());

        first.merge(second);
        assert!(!first.is_valid);
        assert_eq!(first.stats.total_cards, 10);
        assert_eq!(first.stats.sparse_columns, 2);
    }
}
