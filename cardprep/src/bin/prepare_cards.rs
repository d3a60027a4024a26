//! Card preparation binary
//!
//! Loads `cardprep.toml` from the default location (or uses the built-in
//! Scryfall defaults), fetches the configured dataset and runs the cleaning
//! and modeling pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Prepare data/oracle_cards.json with the default settings
//! cargo run --bin prepare-cards
//!
//! # Download from Scryfall instead (in cardprep.toml)
//! # [source]
//! # kind = "scryfall"
//! RUST_LOG=debug cargo run --bin prepare-cards
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::Context;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cardprep::source::SourceFactory;
use cardprep::{PrepConfig, PrepPipeline};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    let config = PrepConfig::load_or_default().context("Failed to load cardprep.toml")?;
    let dataset = config.source.dataset.clone();

    let source = SourceFactory::create(&config.source).context("Failed to create data source")?;
    info!("Using {}", source.describe());

    let pipeline = PrepPipeline::with_config(config);
    let result = pipeline
        .process(source.as_ref(), &dataset)
        .with_context(|| format!("Failed to prepare dataset '{}'", dataset))?;

    info!(
        "Cleaned table: {} cards x {} columns",
        result.cleaned.height(),
        result.cleaned.width()
    );
    info!(
        "Modeling table: {} cards x {} columns",
        result.modeling.height(),
        result.modeling.width()
    );
    match &result.related_links {
        Some(links) => info!("Related links: {} rows", links.height()),
        None => info!("Related links: column not present"),
    }

    if result.validation.is_valid {
        info!("All post-conditions hold");
    } else {
        warn!(
            "{} post-condition errors, {} warnings",
            result.validation.errors.len(),
            result.validation.warnings.len()
        );
    }

    Ok(())
}
