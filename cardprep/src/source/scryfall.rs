//! Scryfall bulk-data download.

use chrono::{DateTime, Utc};
use log::info;
use polars::prelude::DataFrame;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

use super::DataSource;
use crate::error::{PrepError, PrepResult};
use crate::io::CardLoader;

const USER_AGENT: &str = concat!("cardprep/", env!("CARGO_PKG_VERSION"));

/// One entry of the `/bulk-data` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDataEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub download_uri: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct BulkDataList {
    data: Vec<BulkDataEntry>,
}

/// Downloads bulk card files listed by the Scryfall API.
///
/// Each fetch performs two blocking requests (the listing, then the file)
/// and does not retry.
pub struct ScryfallDataSource {
    client: Client,
    api_base: String,
}

impl ScryfallDataSource {
    /// Create a source for `api_base` with a per-request timeout.
    pub fn new(api_base: &str, timeout: Duration) -> PrepResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the bulk-data listing.
    pub fn list_bulk_data(&self) -> PrepResult<Vec<BulkDataEntry>> {
        let url = format!("{}/bulk-data", self.api_base);
        let bytes = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()?
            .error_for_status()?
            .bytes()?;

        parse_bulk_data(&bytes)
    }
}

impl DataSource for ScryfallDataSource {
    fn fetch(&self, dataset: &str) -> PrepResult<DataFrame> {
        let entries = self.list_bulk_data()?;
        let entry = find_entry(&entries, dataset)?;

        info!(
            "Downloading {} ({} bytes, updated {})",
            entry.kind, entry.size, entry.updated_at
        );

        let bytes = self
            .client
            .get(&entry.download_uri)
            .send()?
            .error_for_status()?
            .bytes()?;

        let result = CardLoader::load_from_json_bytes(&bytes)?;
        info!("Loaded {} cards from {}", result.num_cards, entry.download_uri);
        Ok(result.dataframe)
    }

    fn describe(&self) -> String {
        format!("Scryfall bulk data at {}", self.api_base)
    }
}

pub(crate) fn parse_bulk_data(bytes: &[u8]) -> PrepResult<Vec<BulkDataEntry>> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    let list: BulkDataList = serde_path_to_error::deserialize(de)?;
    Ok(list.data)
}

pub(crate) fn find_entry<'a>(
    entries: &'a [BulkDataEntry],
    dataset: &str,
) -> PrepResult<&'a BulkDataEntry> {
    entries
        .iter()
        .find(|entry| entry.kind == dataset)
        .ok_or_else(|| PrepError::DatasetNotFound(dataset.to_string()))
}
