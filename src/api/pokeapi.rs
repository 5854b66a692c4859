use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

use super::client::{CatalogClient, ClientConfig};
use super::http_client::create_custom_client;
use super::types::{PageListing, RawCreature, RawSpecies};
use crate::error::{DexError, Result};

/// HTTP client for the public creature API
pub struct PokeApiClient {
    config: ClientConfig,
    http_client: Client,
    listing_url: Url,
}

impl PokeApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let listing_url = Url::parse(&config.base_url).map_err(|e| {
            DexError::Config(format!("Invalid api.base_url '{}': {}", config.base_url, e))
        })?;
        let http_client = create_custom_client(config.timeout, &config.user_agent)?;

        Ok(Self {
            config,
            http_client,
            listing_url,
        })
    }

    /// Listing URL for `offset`/`limit`
    pub fn page_url(&self, offset: usize, limit: u32) -> Url {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }

    /// Execute request with retry logic
    async fn execute_with_retry(&self, url: &str) -> Result<Response> {
        let mut last_error = None;
        let mut retry_delay = Duration::from_millis(self.config.retry_base_delay);

        for attempt in 0..self.config.max_retries.max(1) {
            if attempt > 0 {
                debug!("Retrying {} (attempt {})", url, attempt + 1);
                sleep(retry_delay).await;
                retry_delay *= 2;
            }

            let error = match self.http_client.get(url).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status().as_u16() == 429 => DexError::RateLimit,
                Ok(response) if response.status().is_server_error() => DexError::ServerError(
                    format!("Server returned status {}", response.status()),
                ),
                Ok(response) => {
                    return Err(DexError::Http {
                        status: response.status().as_u16(),
                        url: url.to_string(),
                    })
                }
                Err(e) => DexError::Network(e),
            };

            if !error.is_retryable() {
                return Err(error);
            }
            warn!("Request to {} failed: {}", url, error);
            last_error = Some(error);
        }

        Err(last_error
            .unwrap_or_else(|| DexError::Other("Request failed after all retries".to_string())))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.execute_with_retry(url).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| DexError::Parse(format!("Unexpected response from {}: {}", url, e)))
    }
}

#[async_trait]
impl CatalogClient for PokeApiClient {
    async fn list_page(&self, offset: usize, limit: u32) -> Result<PageListing> {
        let url = self.page_url(offset, limit);
        debug!("Listing page: {}", url);
        self.get_json(url.as_str()).await
    }

    async fn get_creature(&self, url: &str) -> Result<RawCreature> {
        self.get_json(url).await
    }

    async fn get_species(&self, url: &str) -> Result<RawSpecies> {
        self.get_json(url).await
    }
}
