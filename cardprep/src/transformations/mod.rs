//! Card table transformations.
//!
//! This module holds the column repairs applied during cleaning and the row
//! and column filters applied during modeling preparation.
//!
//! # Modules
//!
//! - [`cleaning`]: Per-column repairs (rank fill, zero fill, keyed corrections,
//!   first-element extraction, cost notation)
//! - [`filtering`]: Row exclusions, missing-text drops, missingness pruning
//!
//! # Example
//!
//! ```
//! use cardprep::transformations::normalize_cost;
//!
//! assert_eq!(normalize_cost("{2}{U}"), "2/U");
//! ```

pub mod cleaning;
pub mod filtering;

pub use cleaning::{
    correct_integer, fill_sequential_rank, fill_zero, first_element, normalize_cost,
    normalize_cost_notation, scryfall_repairs, CardCleaner, ColumnRepair, Correction, RepairRule,
};
pub use filtering::{
    drop_columns, drop_missing, exclude_rows, high_missing_columns, MatchKind, RowExclusion,
};
