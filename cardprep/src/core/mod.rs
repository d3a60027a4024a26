//! Core card-table model.
//!
//! This module defines the table type passed between every preparation stage
//! and the Scryfall column names the default rules refer to.

pub mod columns;
pub mod table;

pub use table::CardTable;
