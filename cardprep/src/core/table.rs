//! The card record table passed between preparation stages.

use polars::prelude::*;

use crate::error::{PrepError, PrepResult};

/// A row-per-card table with an optional primary-key column.
///
/// `CardTable` wraps a Polars `DataFrame` and remembers which column
/// identifies a card. The key column is always the first column of the
/// frame. Stages never mutate a table in place: they read a `&CardTable`
/// and return a new one, which is cheap because Polars columns are
/// reference counted.
///
/// # Examples
///
/// ```
/// use cardprep::core::CardTable;
/// use polars::prelude::*;
///
/// let frame = df!(
///     "name" => ["Opt", "Shock"],
///     "oracle_id" => ["a1", "b2"],
/// ).unwrap();
///
/// let table = CardTable::with_key(frame, "oracle_id").unwrap();
/// assert_eq!(table.key(), Some("oracle_id"));
/// assert_eq!(table.column_names()[0], "oracle_id");
/// ```
#[derive(Debug, Clone)]
pub struct CardTable {
    frame: DataFrame,
    key: Option<String>,
}

impl CardTable {
    /// Wrap a frame without a primary key.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame, key: None }
    }

    /// Wrap a frame and mark `key` as its primary key.
    ///
    /// The key column is moved to the front of the frame.
    ///
    /// # Errors
    ///
    /// Returns a Polars error if `key` is not a column of `frame`.
    pub fn with_key(frame: DataFrame, key: &str) -> PrepResult<Self> {
        frame.column(key)?;

        let mut order = vec![key.to_string()];
        order.extend(
            frame
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .filter(|name| name != key),
        );

        Ok(Self {
            frame: frame.select(order)?,
            key: Some(key.to_string()),
        })
    }

    /// Build a new table from `frame`, keeping this table's key if the
    /// new frame still has that column.
    pub fn derive(&self, frame: DataFrame) -> Self {
        let key = self
            .key
            .as_ref()
            .filter(|k| frame.column(k.as_str()).is_ok())
            .cloned();
        Self { frame, key }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Name of the primary-key column, if one was set.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Fraction of rows with no value in `column`.
    ///
    /// Returns `None` when the column is absent or the table has no rows.
    pub fn missing_ratio(&self, column: &str) -> Option<f64> {
        let height = self.frame.height();
        if height == 0 {
            return None;
        }
        self.frame
            .column(column)
            .ok()
            .map(|c| c.null_count() as f64 / height as f64)
    }

    /// Index of the first row whose `column` equals `value` as a string.
    ///
    /// # Errors
    ///
    /// Returns `PrepError::CardNotFound` if no row matches, or a Polars error
    /// if `column` is absent.
    pub fn find_row(&self, column: &str, value: &str) -> PrepResult<usize> {
        let values = self
            .frame
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::String)?;

        let found = values.str()?.into_iter().position(|v| v == Some(value));
        found.ok_or_else(|| PrepError::CardNotFound(value.to_string()))
    }
}

impl From<DataFrame> for CardTable {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}
