use super::CacheEntry;
use crate::error::{DexError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn open(db_path: &Path) -> Result<Connection> {
    Connection::open(db_path)
        .map_err(|e| DexError::Cache(format!("Failed to open cache database: {}", e)))
}

fn parse_timestamp(raw: &str, column: usize, name: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(column, name.to_string(), rusqlite::types::Type::Text)
        })
}

/// SQLite-based cache storage implementation
#[derive(Debug)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_buf = db_path.as_ref().to_path_buf();
        let is_new_file = !db_path_buf.exists();

        let storage = Self {
            db_path: db_path_buf.clone(),
        };

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = open(&db_path_buf)?;

            if is_new_file {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let permissions = std::fs::Permissions::from_mode(0o600);
                    std::fs::set_permissions(&db_path_buf, permissions).map_err(|e| {
                        DexError::Cache(format!("Failed to set cache database permissions: {}", e))
                    })?;
                }
            }

            Self::initialize_schema(&conn)
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn database initialization: {}", e)))??;

        Ok(storage)
    }

    fn initialize_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                data BLOB NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                size INTEGER NOT NULL,
                last_accessed TEXT NOT NULL
            )
            "#,
            [],
        )
        .map_err(|e| DexError::Cache(format!("Failed to initialize cache schema: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_expires_at ON cache_entries(expires_at)",
            [],
        )
        .map_err(|e| DexError::Cache(format!("Failed to create expires_at index: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_last_accessed ON cache_entries(last_accessed)",
            [],
        )
        .map_err(|e| DexError::Cache(format!("Failed to create last_accessed index: {}", e)))?;

        Ok(())
    }

    /// Get a cache entry by key, touching its access time
    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let db_path = self.db_path.clone();
        let key_owned = key.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<CacheEntry>> {
            let conn = open(&db_path)?;

            conn.execute(
                "UPDATE cache_entries SET last_accessed = ?1 WHERE key = ?2",
                params![timestamp(Utc::now()), &key_owned],
            )
            .map_err(|e| DexError::Cache(format!("Failed to update last_accessed: {}", e)))?;

            conn.query_row(
                r#"
                SELECT key, data, created_at, expires_at, size
                FROM cache_entries
                WHERE key = ?1
                "#,
                params![&key_owned],
                |row| {
                    Ok(CacheEntry {
                        key: row.get(0)?,
                        data: row.get(1)?,
                        created_at: parse_timestamp(&row.get::<_, String>(2)?, 2, "created_at")?,
                        expires_at: parse_timestamp(&row.get::<_, String>(3)?, 3, "expires_at")?,
                        size: row.get::<_, i64>(4)? as u64,
                    })
                },
            )
            .optional()
            .map_err(|e| DexError::Cache(format!("Failed to get cache entry: {}", e)))
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn get operation: {}", e)))?
    }

    /// Store a cache entry
    pub async fn put(&mut self, entry: CacheEntry) -> Result<()> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = open(&db_path)?;

            conn.execute(
                r#"
                INSERT OR REPLACE INTO cache_entries
                (key, data, created_at, expires_at, size, last_accessed)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    entry.key,
                    entry.data,
                    timestamp(entry.created_at),
                    timestamp(entry.expires_at),
                    entry.size as i64,
                    timestamp(Utc::now()),
                ],
            )
            .map_err(|e| DexError::Cache(format!("Failed to store cache entry: {}", e)))?;

            Ok(())
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn put operation: {}", e)))?
    }

    /// Remove a cache entry by key
    pub async fn remove(&mut self, key: &str) -> Result<bool> {
        let db_path = self.db_path.clone();
        let key_owned = key.to_string();

        tokio::task::spawn_blocking(move || -> Result<bool> {
            let conn = open(&db_path)?;

            let affected = conn
                .execute("DELETE FROM cache_entries WHERE key = ?1", params![key_owned])
                .map_err(|e| DexError::Cache(format!("Failed to remove cache entry: {}", e)))?;

            Ok(affected > 0)
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn remove operation: {}", e)))?
    }

    /// Clear all cache entries
    pub async fn clear(&mut self) -> Result<()> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = open(&db_path)?;

            conn.execute("DELETE FROM cache_entries", [])
                .map_err(|e| DexError::Cache(format!("Failed to clear cache: {}", e)))?;

            Ok(())
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn clear operation: {}", e)))?
    }

    /// Get total number of entries
    pub async fn count_entries(&self) -> Result<u64> {
        self.query_u64("SELECT COUNT(*) FROM cache_entries", None).await
    }

    /// Get total cache size in bytes
    pub async fn get_total_size(&self) -> Result<u64> {
        self.query_u64("SELECT COALESCE(SUM(size), 0) FROM cache_entries", None)
            .await
    }

    /// Size of a single entry, zero when absent
    pub async fn entry_size(&self, key: &str) -> Result<u64> {
        self.query_u64(
            "SELECT COALESCE(SUM(size), 0) FROM cache_entries WHERE key = ?1",
            Some(key.to_string()),
        )
        .await
    }

    /// Count expired entries
    pub async fn count_expired_entries(&self) -> Result<u64> {
        self.query_u64(
            "SELECT COUNT(*) FROM cache_entries WHERE expires_at < ?1",
            Some(timestamp(Utc::now())),
        )
        .await
    }

    async fn query_u64(&self, sql: &'static str, param: Option<String>) -> Result<u64> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<u64> {
            let conn = open(&db_path)?;

            let value: i64 = match param {
                Some(p) => conn.query_row(sql, params![p], |row| row.get(0)),
                None => conn.query_row(sql, [], |row| row.get(0)),
            }
            .map_err(|e| DexError::Cache(format!("Failed to query cache statistics: {}", e)))?;

            Ok(value as u64)
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn statistics query: {}", e)))?
    }

    /// Clean up expired entries
    pub async fn cleanup_expired(&mut self) -> Result<u64> {
        let db_path = self.db_path.clone();

        tokio::task::spawn_blocking(move || -> Result<u64> {
            let conn = open(&db_path)?;

            let affected = conn
                .execute(
                    "DELETE FROM cache_entries WHERE expires_at < ?1",
                    params![timestamp(Utc::now())],
                )
                .map_err(|e| DexError::Cache(format!("Failed to cleanup expired entries: {}", e)))?;

            Ok(affected as u64)
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn cleanup_expired operation: {}", e)))?
    }

    /// Evict least recently used entries (never `keep`) until `space_to_free`
    /// bytes are released or nothing else is left
    pub async fn evict_lru(&mut self, space_to_free: u64, keep: &str) -> Result<()> {
        let db_path = self.db_path.clone();
        let keep = keep.to_string();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = open(&db_path)?;

            let mut stmt = conn
                .prepare(
                    r#"
                SELECT key, size FROM cache_entries
                WHERE key != ?1
                ORDER BY last_accessed ASC, rowid ASC
                "#,
                )
                .map_err(|e| DexError::Cache(format!("Failed to prepare LRU query: {}", e)))?;

            let entries = stmt
                .query_map(params![keep], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
                })
                .map_err(|e| DexError::Cache(format!("Failed to execute LRU query: {}", e)))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| DexError::Cache(format!("Failed to process LRU row: {}", e)))?;

            let mut freed_space = 0u64;
            for (key, size) in entries {
                if freed_space >= space_to_free {
                    break;
                }
                conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])
                    .map_err(|e| DexError::Cache(format!("Failed to delete LRU entry: {}", e)))?;
                freed_space += size;
            }

            Ok(())
        })
        .await
        .map_err(|e| DexError::Cache(format!("Failed to spawn evict_lru operation: {}", e)))?
    }
}
