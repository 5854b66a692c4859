use thiserror::Error;

#[derive(Debug, Error)]
pub enum DexError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimit,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Cache quota exceeded: {needed} bytes needed, {max} bytes allowed")]
    CacheQuota { needed: u64, max: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl DexError {
    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Network(_) => Some("Check your internet connection and try again.".to_string()),
            Self::RateLimit => Some("You've made too many requests. Please wait a moment.".to_string()),
            Self::CacheQuota { .. } => Some(
                "Raise the limit with: dex config set cache.max_size_mb <MB>".to_string(),
            ),
            Self::Config(_) => Some("Inspect the file shown by: dex config path".to_string()),
            Self::NotFound(_) => Some(
                "Only loaded records can be shown. Run 'dex more' to load the next page.".to_string(),
            ),
            _ => None,
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ServerError(_) | Self::RateLimit)
    }
}

pub type Result<T> = std::result::Result<T, DexError>;
