use sha2::{Digest, Sha256};

/// Cache key generator
pub struct CacheKeyGenerator;

impl CacheKeyGenerator {
    /// Key of the persisted collection for one upstream source and locale.
    ///
    /// Localized names differ per locale, so each (source, locale) pair owns
    /// its own collection. The base URL is normalized (trailing slashes and
    /// case) before hashing.
    pub fn collection_key(base_url: &str, locale: &str) -> String {
        let mut hasher = Sha256::new();

        hasher.update(base_url.trim().trim_end_matches('/').to_lowercase().as_bytes());
        hasher.update(b"|");
        hasher.update(locale.trim().to_lowercase().as_bytes());

        let result = hasher.finalize();
        format!("collection:{:x}", result)
    }
}
