//! Auto.dev listings client and photo fetcher.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::config::AutoDevConfig;
use crate::upstream::{build_http_client, ensure_success, read_json, UpstreamError, UpstreamResult};
use crate::vehicles::types::{Listing, ListingQuery, ListingsPage};

/// A fetched image and its declared content type.
#[derive(Debug, Clone)]
pub struct Photo {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct AutoDevClient {
    http: Client,
    base_url: String,
    api_key: String,
    listing_limit: u32,
    max_photo_bytes: u64,
}

impl AutoDevClient {
    pub fn new(config: &AutoDevConfig, timeout: Duration) -> UpstreamResult<Self> {
        Ok(Self {
            http: build_http_client(timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            listing_limit: config.listing_limit,
            max_photo_bytes: config.max_photo_bytes,
        })
    }

    /// Listings for one make/model/year.
    pub async fn listings(&self, query: &ListingQuery) -> UpstreamResult<Vec<Listing>> {
        if self.api_key.is_empty() {
            return Err(UpstreamError::NotConfigured("Auto.dev"));
        }

        let limit = self.listing_limit.to_string();
        let mut params = vec![
            ("year_min", query.year.as_str()),
            ("year_max", query.year.as_str()),
            ("make", query.make.as_str()),
            ("model", query.model.as_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(color) = &query.color {
            params.push(("color", color.as_str()));
        }

        tracing::info!(
            make = %query.make,
            model = %query.model,
            year = %query.year,
            color = ?query.color,
            "Fetching vehicle listings"
        );

        let response = self
            .http
            .get(format!("{}/listings", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&params)
            .send()
            .await?;
        let page: ListingsPage = read_json(response).await?;
        Ok(page.records.unwrap_or_default())
    }

    /// Download an image on behalf of a browser that cannot fetch it cross-origin.
    ///
    /// Bodies over `max_photo_bytes` are rejected, whether the size is declared
    /// up front or only discovered while reading.
    pub async fn fetch_photo(&self, url: &Url) -> UpstreamResult<Photo> {
        let limit = self.max_photo_bytes;
        let mut response = ensure_success(self.http.get(url.clone()).send().await?).await?;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(UpstreamError::TooLarge { limit });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (bytes.len() + chunk.len()) as u64 > limit {
                return Err(UpstreamError::TooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(Photo {
            content_type,
            bytes,
        })
    }
}

impl std::fmt::Debug for AutoDevClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoDevClient")
            .field("base_url", &self.base_url)
            .field("api_key_set", &!self.api_key.is_empty())
            .field("listing_limit", &self.listing_limit)
            .field("max_photo_bytes", &self.max_photo_bytes)
            .finish()
    }
}
