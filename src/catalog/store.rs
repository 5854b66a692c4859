use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::record::Record;
use crate::cache::CacheStore;

/// Ordered, deduplicated, append-only record collection with an optional
/// persisted mirror in the local cache
pub struct CollectionStore {
    records: Vec<Record>,
    ids: HashSet<u32>,
    cache: Option<Arc<CacheStore>>,
    cache_key: String,
}

impl CollectionStore {
    pub fn new(cache: Option<Arc<CacheStore>>, cache_key: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            ids: HashSet::new(),
            cache,
            cache_key: cache_key.into(),
        }
    }

    /// Store without persistence
    pub fn in_memory() -> Self {
        Self::new(None, String::new())
    }

    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn position(&self, id: u32) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.records.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: u32) -> Option<&Record> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Append records whose id is not present yet, in the given order.
    /// Returns how many were inserted.
    pub fn merge(&mut self, records: Vec<Record>) -> usize {
        let before = self.records.len();
        for record in records {
            if self.ids.insert(record.id) {
                self.records.push(record);
            } else {
                debug!("Record {} already in collection, skipping", record.id);
            }
        }
        self.records.len() - before
    }

    /// Load the persisted collection. A missing, expired or unreadable
    /// entry counts as empty. Returns the number of records restored.
    pub async fn restore(&mut self) -> usize {
        let Some(cache) = self.cache.clone() else {
            return 0;
        };

        let bytes = match cache.get(&self.cache_key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("No persisted collection under {}", self.cache_key);
                return 0;
            }
            Err(e) => {
                warn!("Failed to read persisted collection: {}", e);
                return 0;
            }
        };

        let records: Vec<Record> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!("Discarding unreadable persisted collection: {}", e);
                if let Err(e) = cache.remove(&self.cache_key).await {
                    warn!("Failed to remove unreadable collection: {}", e);
                }
                return 0;
            }
        };

        let valid: Vec<Record> = records
            .into_iter()
            .filter(|record| match record.validate() {
                Ok(()) => true,
                Err(reason) => {
                    warn!("Ignoring persisted record: {}", reason);
                    false
                }
            })
            .collect();

        let restored = self.merge(valid);
        info!("Restored {} records from cache", restored);
        restored
    }

    /// Overwrite the persisted mirror with the full collection. Failures are
    /// logged; the in-memory collection stays authoritative. Returns whether
    /// the mirror was written.
    pub async fn persist(&self) -> bool {
        let Some(cache) = self.cache.as_ref() else {
            return false;
        };

        let data = match serde_json::to_vec(&self.records) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize collection: {}", e);
                return false;
            }
        };

        match cache.put(&self.cache_key, data, None).await {
            Ok(()) => {
                debug!("Persisted {} records", self.records.len());
                true
            }
            Err(e) => {
                warn!("Failed to persist collection: {}", e);
                false
            }
        }
    }

    /// Drop the persisted mirror so the next session starts cold
    pub async fn forget_persisted(&self) {
        if let Some(cache) = self.cache.as_ref() {
            if let Err(e) = cache.remove(&self.cache_key).await {
                warn!("Failed to remove persisted collection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::catalog::record::fixtures::record;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn cache(dir: &TempDir, max_size: u64) -> Arc<CacheStore> {
        let config = CacheConfig {
            max_size,
            default_ttl: Duration::hours(1),
            db_path: dir.path().join("cache.db"),
        };
        Arc::new(CacheStore::new(config).await.unwrap())
    }

    fn ids(store: &CollectionStore) -> Vec<u32> {
        store.all().iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_merge_skips_known_ids() {
        let mut store = CollectionStore::in_memory();
        assert_eq!(store.merge(vec![record(1, "a", None), record(2, "b", None)]), 2);

        let inserted = store.merge(vec![record(2, "changed", Some("X")), record(3, "c", None)]);
        assert_eq!(inserted, 1);
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(store.get(2).unwrap().canonical_name, "b");
    }

    #[test]
    fn test_merge_dedups_within_batch() {
        let mut store = CollectionStore::in_memory();
        let inserted = store.merge(vec![record(5, "a", None), record(5, "b", None)]);
        assert_eq!(inserted, 1);
        assert_eq!(store.get(5).unwrap().canonical_name, "a");
    }

    #[test]
    fn test_first_seen_order() {
        let mut store = CollectionStore::in_memory();
        store.merge(vec![record(10, "j", None), record(3, "c", None)]);
        store.merge(vec![record(7, "g", None), record(10, "j", None), record(1, "a", None)]);
        assert_eq!(ids(&store), vec![10, 3, 7, 1]);
        assert_eq!(store.position(7), Some(2));
        assert_eq!(store.position(99), None);
    }

    #[tokio::test]
    async fn test_persist_and_restore_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir, 1024 * 1024).await;

        let mut store = CollectionStore::new(Some(cache.clone()), "collection:test");
        store.merge(vec![
            record(4, "charmander", Some("Glumanda")),
            record(1, "bulbasaur", Some("Bisasam")),
            record(25, "pikachu", None),
        ]);
        assert!(store.persist().await);

        let mut fresh = CollectionStore::new(Some(cache), "collection:test");
        assert_eq!(fresh.restore().await, 3);
        assert_eq!(fresh.all(), store.all());
    }

    #[tokio::test]
    async fn test_restore_without_entry_is_cold_start() {
        let dir = TempDir::new().unwrap();
        let mut store = CollectionStore::new(Some(cache(&dir, 1024).await), "collection:none");
        assert_eq!(store.restore().await, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_discarded() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir, 1024).await;
        cache
            .put("collection:test", br#"{"version": 2, "items": {}}"#.to_vec(), None)
            .await
            .unwrap();

        let mut store = CollectionStore::new(Some(cache.clone()), "collection:test");
        assert_eq!(store.restore().await, 0);
        assert!(store.is_empty());
        assert_eq!(cache.get("collection:test").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_applies_dedup_and_validation() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir, 1024 * 1024).await;

        let mut invalid = record(9, "broken", None);
        invalid.categories.clear();
        let persisted = vec![record(1, "a", None), record(1, "dup", None), invalid, record(2, "b", None)];
        cache
            .put("collection:test", serde_json::to_vec(&persisted).unwrap(), None)
            .await
            .unwrap();

        let mut store = CollectionStore::new(Some(cache), "collection:test");
        assert_eq!(store.restore().await, 2);
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.get(1).unwrap().canonical_name, "a");
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let mut store = CollectionStore::new(Some(cache(&dir, 16).await), "collection:test");

        store.merge(vec![record(1, "bulbasaur", None), record(2, "ivysaur", None)]);
        assert!(!store.persist().await);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_store_never_persists() {
        let mut store = CollectionStore::in_memory();
        store.merge(vec![record(1, "a", None)]);
        assert!(!store.persist().await);
        assert_eq!(store.restore().await, 0);
        assert_eq!(store.len(), 1);
    }
}
