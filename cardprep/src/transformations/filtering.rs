use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// How a row exclusion pattern is compared against a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Contains,
    Exact,
}

/// Remove rows whose `column` matches `pattern`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowExclusion {
    pub column: String,
    pub pattern: String,
    #[serde(rename = "match", default)]
    pub match_kind: MatchKind,
}

impl RowExclusion {
    pub fn contains(column: &str, pattern: &str) -> Self {
        Self {
            column: column.to_string(),
            pattern: pattern.to_string(),
            match_kind: MatchKind::Contains,
        }
    }

    pub fn exact(column: &str, pattern: &str) -> Self {
        Self {
            column: column.to_string(),
            pattern: pattern.to_string(),
            match_kind: MatchKind::Exact,
        }
    }

    /// Whether a cell value matches. Missing values never match.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (value, self.match_kind) {
            (Some(v), MatchKind::Contains) => v.contains(self.pattern.as_str()),
            (Some(v), MatchKind::Exact) => v == self.pattern,
            (None, _) => false,
        }
    }
}

/// Remove rows with a missing value in `column`
pub fn drop_missing(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    let mask = df.column(column)?.is_not_null();
    df.filter(&mask)
}

/// Remove rows matching an exclusion
pub fn exclude_rows(df: &DataFrame, exclusion: &RowExclusion) -> PolarsResult<DataFrame> {
    let values = df
        .column(&exclusion.column)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let keep: Vec<bool> = values
        .str()?
        .into_iter()
        .map(|v| !exclusion.matches(v))
        .collect();

    df.filter(&BooleanChunked::from_slice("keep".into(), &keep))
}

/// Columns whose missing-value ratio is strictly above `max_ratio`.
///
/// `protected` is never reported. An empty frame reports nothing.
pub fn high_missing_columns(df: &DataFrame, max_ratio: f64, protected: Option<&str>) -> Vec<String> {
    let height = df.height();
    if height == 0 {
        return Vec::new();
    }

    df.get_columns()
        .iter()
        .filter(|c| Some(c.name().as_str()) != protected)
        .filter(|c| c.null_count() as f64 / height as f64 > max_ratio)
        .map(|c| c.name().to_string())
        .collect()
}

/// Drop the listed columns that are present, ignoring the rest
pub fn drop_columns(df: &DataFrame, columns: &[String]) -> PolarsResult<DataFrame> {
    let mut out = df.clone();
    for name in columns {
        if out.column(name).is_ok() {
            out = out.drop(name)?;
        }
    }
    Ok(out)
}
