use crate::harvest::Record;
use crate::storage::ListCache;
use crate::url::DirectoryUrls;
use crate::{HarvestError, Result};
use reqwest::Client;
use serde_json::Value;

/// Obtains a region's record list, from the cache when possible
///
/// Listing requests are not retried: a failure here aborts the region so the
/// next run starts it over.
#[derive(Debug, Clone)]
pub struct ListLoader {
    client: Client,
    urls: DirectoryUrls,
    cache: ListCache,
}

impl ListLoader {
    pub fn new(client: Client, urls: DirectoryUrls, cache: ListCache) -> Self {
        Self {
            client,
            urls,
            cache,
        }
    }

    /// Returns the records of a region
    ///
    /// A cached listing is returned as-is without touching the network.
    /// Otherwise the listing API is queried once, the raw response is
    /// cached, and its records are returned.
    pub async fn load_list(&self, region_id: u32) -> Result<Vec<Record>> {
        if let Some(records) = self.cache.load(region_id).await? {
            tracing::info!(
                "loading cached list for region {} ({} records)",
                region_id,
                records.len()
            );
            return Ok(records);
        }

        tracing::info!("loading list for region {}", region_id);
        let listing = self.fetch_listing(region_id).await?;
        let records = parse_listing(region_id, &listing)?;
        tracing::info!("list loaded: {} records", records.len());

        self.cache.store(region_id, &listing).await?;

        Ok(records)
    }

    async fn fetch_listing(&self, region_id: u32) -> Result<Value> {
        let url = self.urls.listing_url(region_id);
        let http_error = |source: reqwest::Error| HarvestError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .post(url.clone())
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?;

        response.json::<Value>().await.map_err(http_error)
    }
}

/// Validates the listing shape and reads its records
fn parse_listing(region_id: u32, listing: &Value) -> Result<Vec<Record>> {
    if !listing.is_array() {
        return Err(HarvestError::ListFormat {
            region_id,
            message: format!("expected a JSON array, got {}", json_kind(listing)),
        });
    }

    serde_json::from_value(listing.clone()).map_err(|e| HarvestError::ListFormat {
        region_id,
        message: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
