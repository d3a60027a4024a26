use image::DynamicImage;
use log::info;
use reqwest::blocking::Client;
use std::time::Duration;

use super::{resolve_image_uri, ImageSettings};
use crate::core::CardTable;
use crate::error::PrepResult;

const USER_AGENT: &str = concat!("cardprep/", env!("CARGO_PKG_VERSION"));

/// Downloads and decodes card images.
///
/// One blocking GET per call, no retry.
pub struct CardImageFetcher {
    client: Client,
    variant: String,
}

impl CardImageFetcher {
    pub fn new(settings: &ImageSettings, timeout: Duration) -> PrepResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            variant: settings.variant.clone(),
        })
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Image of the first card in `table` named exactly `name`.
    pub fn fetch(&self, table: &CardTable, name: &str) -> PrepResult<DynamicImage> {
        let uri = resolve_image_uri(table, name, &self.variant)?;
        info!("Fetching {} image for {}", self.variant, name);

        let bytes = self
            .client
            .get(&uri)
            .send()?
            .error_for_status()?
            .bytes()?;

        decode_image(&bytes)
    }
}

/// Decode image bytes in any enabled format.
pub fn decode_image(bytes: &[u8]) -> PrepResult<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}
