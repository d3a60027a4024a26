//! Card dataset loading utilities.
//!
//! This module turns raw dataset bytes or files into Polars DataFrames. JSON
//! input is a top-level array of card objects, the Scryfall bulk-data
//! format; CSV input is a flat export with a header row.
//!
//! # Example
//!
//! ```no_run
//! use cardprep::io::CardLoader;
//! use std::path::Path;
//!
//! let result = CardLoader::load_from_file(Path::new("oracle_cards.json"))
//!     .expect("Failed to load");
//! println!("Loaded {} cards", result.num_cards);
//! ```

pub mod loaders;


pub use loaders::{CardLoadResult, CardLoader, CardSourceType};
