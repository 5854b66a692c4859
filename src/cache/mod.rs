use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{DexError, Result};

pub mod key;
pub mod storage;

use storage::SqliteStorage;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum cache size in bytes (default: 50MB)
    pub max_size: u64,
    /// Default TTL for cache entries (default: 7 days)
    pub default_ttl: Duration,
    /// Database file path
    pub db_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 50 * 1024 * 1024,
            default_ttl: Duration::hours(168),
            db_path: default_db_path(),
        }
    }
}

/// Platform cache directory location of the database
pub fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dexview")
        .join("cache.db")
}

/// Cache entry metadata
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub size: u64,
}

impl CacheEntry {
    /// Check if the cache entry is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Key/value store backed by a local SQLite file
#[derive(Debug)]
pub struct CacheStore {
    storage: Arc<RwLock<SqliteStorage>>,
    config: CacheConfig,
}

impl CacheStore {
    /// Open (and create if needed) the cache database
    pub async fn new(config: CacheConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let storage = SqliteStorage::new(&config.db_path).await?;

        Ok(Self {
            storage: Arc::new(RwLock::new(storage)),
            config,
        })
    }

    /// Get cached data by key. Expired entries are removed and reported absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let storage = self.storage.read().await;

        match storage.get(key).await? {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.data)),
            Some(_) => {
                debug!("Cache entry {} expired", key);
                drop(storage);
                let mut storage = self.storage.write().await;
                storage.remove(key).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Store data under `key`, replacing any previous value
    pub async fn put(&self, key: &str, data: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let now = Utc::now();
        let ttl = ttl.unwrap_or(self.config.default_ttl);

        let size = data.len() as u64;
        if size > self.config.max_size {
            return Err(DexError::CacheQuota {
                needed: size,
                max: self.config.max_size,
            });
        }

        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| DexError::Cache(format!("TTL of {} hours is out of range", ttl.num_hours())))?;

        let entry = CacheEntry {
            key: key.to_string(),
            data,
            created_at: now,
            expires_at,
            size,
        };

        let mut storage = self.storage.write().await;

        // The replaced value does not count against the limit
        let current_size = storage.get_total_size().await? - storage.entry_size(key).await?;
        if current_size + entry.size > self.config.max_size {
            let space_to_free = current_size + entry.size - self.config.max_size;
            storage.evict_lru(space_to_free, key).await?;
        }

        storage.put(entry).await
    }

    /// Remove entry from cache
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        storage.remove(key).await
    }

    /// Clear all cache entries
    pub async fn clear(&self) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.clear().await
    }

    /// Get cache statistics
    pub async fn stats(&self) -> Result<CacheStats> {
        let storage = self.storage.read().await;

        Ok(CacheStats {
            total_entries: storage.count_entries().await?,
            expired_entries: storage.count_expired_entries().await?,
            total_size: storage.get_total_size().await?,
            max_size: self.config.max_size,
        })
    }

    /// Clean up expired entries
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let mut storage = self.storage.write().await;
        storage.cleanup_expired().await
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: u64,
    pub expired_entries: u64,
    pub total_size: u64,
    pub max_size: u64,
}

impl CacheStats {
    pub fn utilization_percent(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            (self.total_size as f64 / self.max_size as f64) * 100.0
        }
    }
}
