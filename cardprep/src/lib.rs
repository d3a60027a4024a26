//! Cleaning and modeling preparation for Scryfall card datasets.
//!
//! A raw card table is fetched from a [`source::DataSource`], repaired column
//! by column ([`transformations::cleaning`]) and then reduced to the rows and
//! columns used for modeling ([`preprocessing::modeling`]). Every step takes
//! an immutable table and returns a new one.
//!
//! ```no_run
//! use cardprep::preprocessing::prepare_cards;
//! use cardprep::source::LocalDataSource;
//!
//! let source = LocalDataSource::new("data");
//! let result = prepare_cards(&source, "oracle_cards")?;
//! println!("{} cards ready for modeling", result.modeling.height());
//! # Ok::<(), cardprep::error::PrepError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod imaging;
pub mod io;
pub mod preprocessing;
pub mod source;
pub mod transformations;

pub use config::PrepConfig;
pub use core::CardTable;
pub use error::{PrepError, PrepResult};
pub use preprocessing::{prepare_cards, PipelineResult, PrepPipeline};
