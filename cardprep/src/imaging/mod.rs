//! Card image lookup.
//!
//! Resolving a card name to an image URI is a pure table lookup. Fetching
//! and decoding the image needs the `remote` feature.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::columns;
use crate::core::CardTable;
use crate::error::{PrepError, PrepResult};

#[cfg(feature = "remote")]
mod fetcher;

#[cfg(feature = "remote")]
pub use fetcher::{decode_image, CardImageFetcher};

/// Image variants published in `image_uris`.
pub const IMAGE_VARIANTS: [&str; 6] = ["small", "normal", "large", "png", "art_crop", "border_crop"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    /// Field of `image_uris` to download
    #[serde(default = "default_variant")]
    pub variant: String,
}

fn default_variant() -> String {
    "normal".to_string()
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            variant: default_variant(),
        }
    }
}

/// Image URI of the first card named exactly `name`.
///
/// # Errors
///
/// * `PrepError::CardNotFound` when no row has that name
/// * `PrepError::MissingImageUri` when the card has no `image_uris` entry
///   for `variant`
pub fn resolve_image_uri(table: &CardTable, name: &str, variant: &str) -> PrepResult<String> {
    let row = table.find_row(columns::NAME, name)?;
    let missing = || PrepError::MissingImageUri(format!("{} ({})", name, variant));

    let Ok(uris) = table.frame().column(columns::IMAGE_URIS) else {
        return Err(missing());
    };
    let uris = uris.as_materialized_series();
    let DataType::Struct(_) = uris.dtype() else {
        return Err(missing());
    };

    let uris = uris.struct_()?;
    if uris.is_null().get(row).unwrap_or(true) {
        return Err(missing());
    }

    let Some(field) = uris
        .fields_as_series()
        .into_iter()
        .find(|field| field.name().as_str() == variant)
    else {
        return Err(missing());
    };

    let field = field.cast(&DataType::String)?;
    let uri = field.str()?.get(row).map(str::to_string);
    uri.filter(|uri| !uri.is_empty()).ok_or_else(missing)
}
