use log::{debug, info};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::columns;
use crate::core::CardTable;
use crate::error::PrepResult;

/// A repair applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RepairRule {
    /// Missing values become max known value + 1, + 2, ... in row order
    SequentialRank,
    /// Missing values become zero
    ZeroFill,
    /// Keyed corrections, then cast to integer
    CorrectedInteger {
        #[serde(default)]
        corrections: Vec<Correction>,
    },
    /// Mark the column as the table's primary key
    PrimaryKey,
    /// First element of a list value, sentinel when missing or empty
    FirstElement { sentinel: String },
    /// `{2}{U}` becomes `2/U`, falling back to the numeric cost
    CostNotation {
        #[serde(default = "default_cost_column")]
        cost_column: String,
    },
}

fn default_cost_column() -> String {
    columns::CMC.to_string()
}

impl RepairRule {
    pub fn label(&self) -> &'static str {
        match self {
            RepairRule::SequentialRank => "sequential_rank",
            RepairRule::ZeroFill => "zero_fill",
            RepairRule::CorrectedInteger { .. } => "corrected_integer",
            RepairRule::PrimaryKey => "primary_key",
            RepairRule::FirstElement { .. } => "first_element",
            RepairRule::CostNotation { .. } => "cost_notation",
        }
    }
}

/// Replace the value of the rule's column on rows where `key_column == key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub key_column: String,
    pub key: String,
    pub value: f64,
}

impl Correction {
    pub fn new(key_column: &str, key: &str, value: f64) -> Self {
        Self {
            key_column: key_column.to_string(),
            key: key.to_string(),
            value,
        }
    }
}

/// A `(column, rule)` pair. The rule only runs when the column exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRepair {
    pub column: String,
    #[serde(flatten)]
    pub rule: RepairRule,
}

impl ColumnRepair {
    pub fn new(column: &str, rule: RepairRule) -> Self {
        Self {
            column: column.to_string(),
            rule,
        }
    }

    /// Apply the rule to `table`, returning a new table.
    pub fn apply(&self, table: &CardTable) -> PrepResult<CardTable> {
        let df = table.frame();
        let column = self.column.as_str();

        let repaired = match &self.rule {
            RepairRule::SequentialRank => table.derive(fill_sequential_rank(df, column)?),
            RepairRule::ZeroFill => table.derive(fill_zero(df, column)?),
            RepairRule::CorrectedInteger { corrections } => {
                table.derive(correct_integer(df, column, corrections)?)
            }
            RepairRule::PrimaryKey => CardTable::with_key(df.clone(), column)?,
            RepairRule::FirstElement { sentinel } => {
                table.derive(first_element(df, column, sentinel)?)
            }
            RepairRule::CostNotation { cost_column } => {
                table.derive(normalize_cost_notation(df, column, cost_column)?)
            }
        };

        Ok(repaired)
    }
}

/// Scryfall repairs in application order.
///
/// The cost correction runs before the cost notation so the notation
/// fallback sees integer costs.
pub fn scryfall_repairs() -> Vec<ColumnRepair> {
    vec![
        ColumnRepair::new(columns::EDHREC_RANK, RepairRule::SequentialRank),
        ColumnRepair::new(columns::POWER, RepairRule::ZeroFill),
        ColumnRepair::new(columns::TOUGHNESS, RepairRule::ZeroFill),
        ColumnRepair::new(
            columns::CMC,
            RepairRule::CorrectedInteger {
                // Half-cost joke card, 0.5 would truncate to 0
                corrections: vec![Correction::new(columns::NAME, "Little Girl", 1.0)],
            },
        ),
        ColumnRepair::new(columns::ORACLE_ID, RepairRule::PrimaryKey),
        ColumnRepair::new(
            columns::COLORS,
            RepairRule::FirstElement {
                sentinel: columns::COLORLESS.to_string(),
            },
        ),
        ColumnRepair::new(
            columns::COLOR_IDENTITY,
            RepairRule::FirstElement {
                sentinel: columns::COLORLESS.to_string(),
            },
        ),
        ColumnRepair::new(
            columns::KEYWORDS,
            RepairRule::FirstElement {
                sentinel: columns::NO_KEYWORD.to_string(),
            },
        ),
        ColumnRepair::new(
            columns::MANA_COST,
            RepairRule::CostNotation {
                cost_column: columns::CMC.to_string(),
            },
        ),
    ]
}

/// Applies a declarative list of column repairs to a raw card table.
#[derive(Debug, Clone)]
pub struct CardCleaner {
    repairs: Vec<ColumnRepair>,
}

impl CardCleaner {
    pub fn new(repairs: Vec<ColumnRepair>) -> Self {
        Self { repairs }
    }

    pub fn repairs(&self) -> &[ColumnRepair] {
        &self.repairs
    }

    /// Run every repair whose column is present, in order.
    pub fn clean(&self, table: &CardTable) -> PrepResult<CardTable> {
        let mut current = table.clone();
        let mut applied = 0;

        for repair in &self.repairs {
            if !current.has_column(&repair.column) {
                debug!(
                    "Skipping {} repair: column '{}' not present",
                    repair.rule.label(),
                    repair.column
                );
                continue;
            }
            current = repair.apply(&current)?;
            applied += 1;
        }

        info!(
            "Cleaned {} cards: applied {} of {} repairs",
            current.height(),
            applied,
            self.repairs.len()
        );

        Ok(current)
    }
}

impl Default for CardCleaner {
    fn default() -> Self {
        Self::new(scryfall_repairs())
    }
}

/// Assign missing ranks sequentially, starting above the largest known rank
pub fn fill_sequential_rank(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    let ranks = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let ranks = ranks.i64()?;

    let mut next = ranks.max().map_or(1, |max| max + 1);
    let filled: Vec<i64> = ranks
        .into_iter()
        .map(|rank| {
            rank.unwrap_or_else(|| {
                let assigned = next;
                next += 1;
                assigned
            })
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(column.into(), filled))?;
    Ok(out)
}

/// Replace missing values with zero, keeping the column's type
pub fn fill_zero(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    let series = df.column(column)?.as_materialized_series();
    let dtype = series.dtype().clone();

    let filled = match dtype {
        DataType::String => {
            let values: Vec<String> = series
                .str()?
                .into_iter()
                .map(|v| v.unwrap_or("0").to_string())
                .collect();
            Series::new(column.into(), values)
        }
        DataType::Null => Series::new(column.into(), vec![0i64; series.len()]),
        other => {
            let as_float = series.cast(&DataType::Float64)?;
            let values: Vec<f64> = as_float
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(0.0))
                .collect();
            Series::new(column.into(), values).cast(&other)?
        }
    };

    let mut out = df.clone();
    out.with_column(filled)?;
    Ok(out)
}

/// Apply keyed corrections to a numeric column, then cast it to integer
pub fn correct_integer(
    df: &DataFrame,
    column: &str,
    corrections: &[Correction],
) -> PolarsResult<DataFrame> {
    let values = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let mut values: Vec<Option<f64>> = values.f64()?.into_iter().collect();

    for correction in corrections {
        let Ok(keys) = df.column(&correction.key_column) else {
            debug!(
                "Skipping correction for '{}': key column '{}' not present",
                correction.key, correction.key_column
            );
            continue;
        };
        let keys = keys.as_materialized_series().cast(&DataType::String)?;
        for (row, key) in keys.str()?.into_iter().enumerate() {
            if key == Some(correction.key.as_str()) {
                values[row] = Some(correction.value);
            }
        }
    }

    let corrected = Series::new(column.into(), values).cast(&DataType::Int64)?;

    let mut out = df.clone();
    out.with_column(corrected)?;
    Ok(out)
}

/// Reduce a list column to its first element, filling gaps with `sentinel`.
///
/// String columns from flat exports may hold list literals such as
/// `['U', 'B']` or `["U","B"]`; those are reduced the same way. Other scalar
/// values only have their gaps filled.
pub fn first_element(df: &DataFrame, column: &str, sentinel: &str) -> PolarsResult<DataFrame> {
    let series = df.column(column)?.as_materialized_series();

    let values: Vec<String> = match series.dtype() {
        DataType::List(_) => series
            .list()?
            .into_iter()
            .map(|inner| first_string(inner).map(|v| v.unwrap_or_else(|| sentinel.to_string())))
            .collect::<PolarsResult<Vec<String>>>()?,
        _ => {
            let as_str = series.cast(&DataType::String)?;
            as_str
                .str()?
                .into_iter()
                .map(|v| {
                    v.and_then(first_scalar)
                        .unwrap_or_else(|| sentinel.to_string())
                })
                .collect()
        }
    };

    let mut out = df.clone();
    out.with_column(Series::new(column.into(), values))?;
    Ok(out)
}

fn first_string(inner: Option<Series>) -> PolarsResult<Option<String>> {
    match inner {
        Some(list) if !list.is_empty() => {
            let as_str = list.cast(&DataType::String)?;
            let first = as_str.str()?.get(0).map(str::to_string);
            Ok(first)
        }
        _ => Ok(None),
    }
}

/// A scalar as-is, or the first item of a bracketed list literal.
/// Empty lists and blank values give `None`.
fn first_scalar(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let item = match trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => inner.split(',').next().unwrap_or_default(),
        None => trimmed,
    };

    let item = item.trim().trim_matches(['\'', '"']).trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// Strip bracket notation from a cost string: `{2}{U}` becomes `2/U`.
pub fn normalize_cost(raw: &str) -> String {
    raw.replace('{', "")
        .replace('}', "/")
        .trim_matches('/')
        .to_string()
}

/// Normalize the cost-notation column.
///
/// Missing or empty-after-stripping values fall back to the integer value of
/// `cost_column` (or `"0"` when that is missing too).
pub fn normalize_cost_notation(
    df: &DataFrame,
    column: &str,
    cost_column: &str,
) -> PolarsResult<DataFrame> {
    let raw = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let fallback: Vec<String> = match df.column(cost_column) {
        Ok(costs) => {
            let costs = costs.as_materialized_series().cast(&DataType::Int64)?;
            costs
                .i64()?
                .into_iter()
                .map(|v| v.unwrap_or(0).to_string())
                .collect()
        }
        Err(_) => vec!["0".to_string(); df.height()],
    };

    let normalized: Vec<String> = raw
        .str()?
        .into_iter()
        .zip(fallback)
        .map(|(value, fallback)| match value.map(normalize_cost) {
            Some(cost) if !cost.is_empty() => cost,
            _ => fallback,
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(column.into(), normalized))?;
    Ok(out)
}
