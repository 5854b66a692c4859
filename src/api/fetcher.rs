use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;

use super::client::CatalogClient;
use crate::catalog::record::{Record, Stat};
use crate::catalog::resolver::CategoryResolver;
use crate::error::{DexError, Result};

/// Retrieves primary + localization resources and assembles records
pub struct RecordFetcher {
    client: Arc<dyn CatalogClient>,
    resolver: CategoryResolver,
    concurrency: usize,
}

impl RecordFetcher {
    pub fn new(client: Arc<dyn CatalogClient>, resolver: CategoryResolver) -> Self {
        Self {
            client,
            resolver,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` records in flight. Results keep input order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn client(&self) -> &Arc<dyn CatalogClient> {
        &self.client
    }

    /// Fetch and normalize one record
    pub async fn fetch_one(&self, url: &str) -> Result<Record> {
        let creature = self.client.get_creature(url).await?;
        let species = self.client.get_species(&creature.species.url).await?;

        let localized_name = species.name_for(self.resolver.locale()).map(str::to_string);
        if localized_name.is_none() {
            warn!(
                "No '{}' name for record {} ({}), using canonical name",
                self.resolver.locale(),
                creature.id,
                creature.name
            );
        }

        let record = Record {
            id: creature.id,
            canonical_name: creature.name,
            localized_name,
            categories: creature
                .types
                .iter()
                .map(|slot| self.resolver.resolve(&slot.kind.name))
                .collect(),
            image_ref: creature.sprites.front_default.unwrap_or_default(),
            stats: creature
                .stats
                .into_iter()
                .map(|entry| Stat {
                    name: entry.stat.name,
                    value: entry.base_stat,
                })
                .collect(),
        };

        record.validate().map_err(DexError::Parse)?;
        Ok(record)
    }

    async fn fetch_logged(&self, url: &str) -> Option<Record> {
        match self.fetch_one(url).await {
            Ok(record) => {
                debug!("Fetched record {} from {}", record.id, url);
                Some(record)
            }
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                None
            }
        }
    }

    /// Fetch every URL, in order. Failed records are logged and left out.
    pub async fn fetch_many(&self, urls: &[String]) -> Vec<Record> {
        if self.concurrency <= 1 {
            let mut records = Vec::with_capacity(urls.len());
            for url in urls {
                if let Some(record) = self.fetch_logged(url).await {
                    records.push(record);
                }
            }
            return records;
        }

        stream::iter(urls)
            .map(|url| self.fetch_logged(url))
            .buffered(self.concurrency)
            .filter_map(|record| async move { record })
            .collect()
            .await
    }
}
