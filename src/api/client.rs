use async_trait::async_trait;

use super::types::{PageListing, RawCreature, RawSpecies};
use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/pokemon/";

/// Upstream catalog API
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// One page of the collection listing
    async fn list_page(&self, offset: usize, limit: u32) -> Result<PageListing>;

    /// Primary record resource by absolute URL
    async fn get_creature(&self, url: &str) -> Result<RawCreature>;

    /// Localization resource by absolute URL
    async fn get_species(&self, url: &str) -> Result<RawSpecies>;
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Collection listing endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Maximum number of attempts per request
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds)
    pub retry_base_delay: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
            max_retries: 3,
            retry_base_delay: 100,
            user_agent: format!("dexview/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
