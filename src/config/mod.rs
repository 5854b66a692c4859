use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::client::{ClientConfig, DEFAULT_BASE_URL};
use crate::cache::{default_db_path, CacheConfig};
use crate::catalog::PageSizes;
use crate::error::{DexError, Result};

const CONFIG_DIR_NAME: &str = ".dexview";
const CONFIG_FILE_NAME: &str = "config.yaml";
const CONFIG_DIR_ENV: &str = "DEXVIEW_CONFIG_DIR";

/// Upper bound for `cache.ttl_hours` (ten years)
pub const MAX_TTL_HOURS: u64 = 24 * 365 * 10;
/// Upper bound for `cache.max_size_mb` (100 GiB)
pub const MAX_CACHE_SIZE_MB: u64 = 100 * 1024;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Collection listing endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    pub max_retries: u32,
    /// Base backoff delay in milliseconds
    pub retry_base_delay: u64,
    /// Records fetched at once within a page (1 = sequential)
    pub concurrency: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
            max_retries: 3,
            retry_base_delay: 100,
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Language tag for names and categories
    pub locale: String,
    pub initial_page_size: u32,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            locale: "de".to_string(),
            initial_page_size: 40,
            page_size: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_hours: u64,
    pub max_size_mb: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_hours: 168,
            max_size_mb: 50,
            db_path: None,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> Result<CacheConfig> {
        let max_size = self
            .max_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| DexError::Config(format!("cache.max_size_mb is too large: {}", self.max_size_mb)))?;
        let default_ttl = i64::try_from(self.ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| DexError::Config(format!("cache.ttl_hours is too large: {}", self.ttl_hours)))?;

        Ok(CacheConfig {
            max_size,
            default_ttl,
            db_path: self.db_path(),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }
}

impl ApiConfig {
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            max_retries: self.max_retries,
            retry_base_delay: self.retry_base_delay,
            ..Default::default()
        }
    }
}

impl CatalogConfig {
    pub fn page_sizes(&self) -> PageSizes {
        PageSizes {
            initial: self.initial_page_size,
            more: self.page_size,
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DexError::Config(format!("Invalid value for {}: '{}'", key, value)))
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = parse_value(key, value)?;
    check_positive(key, &parsed)?;
    Ok(parsed)
}

fn parse_bounded(key: &str, value: &str, max: u64) -> Result<u64> {
    let parsed = parse_positive(key, value)?;
    check_at_most(key, parsed, max)?;
    Ok(parsed)
}

fn check_positive<T: PartialOrd + Default>(key: &str, value: &T) -> Result<()> {
    if *value <= T::default() {
        return Err(DexError::Config(format!("{} must be greater than zero", key)));
    }
    Ok(())
}

fn check_at_most(key: &str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(DexError::Config(format!("{} must be at most {}", key, max)));
    }
    Ok(())
}

fn check_base_url(value: &str) -> Result<()> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| DexError::Config(format!("Invalid value for api.base_url: {}", e)))
}

impl Config {
    /// Get the configuration directory
    pub fn config_path() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let home_dir = dirs::home_dir()
            .ok_or_else(|| DexError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Initialize configuration directory and file
    pub fn initialize() -> Result<()> {
        let config_dir = Self::config_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| DexError::Config(format!("Failed to create config directory: {}", e)))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = fs::Permissions::from_mode(0o700);
                fs::set_permissions(&config_dir, permissions).map_err(|e| {
                    DexError::Config(format!("Failed to set directory permissions: {}", e))
                })?;
            }
        }

        let config_file = Self::config_file_path()?;
        if !config_file.exists() {
            Self::default().write_to(&config_file)?;
        }

        Ok(())
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::initialize()?;

        let config_file = Self::config_file_path()?;
        let contents = fs::read_to_string(&config_file)
            .map_err(|e| DexError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration text; missing sections take their defaults
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|e| DexError::Config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the same limits `set` enforces to a config read from disk
    pub fn validate(&self) -> Result<()> {
        check_base_url(self.api.base_url.trim())?;
        check_positive("api.timeout", &self.api.timeout)?;
        check_positive("api.max_retries", &self.api.max_retries)?;
        check_positive("api.concurrency", &self.api.concurrency)?;
        if self.catalog.locale.trim().is_empty() {
            return Err(DexError::Config("catalog.locale cannot be empty".to_string()));
        }
        check_positive("catalog.initial_page_size", &self.catalog.initial_page_size)?;
        check_positive("catalog.page_size", &self.catalog.page_size)?;
        check_positive("cache.ttl_hours", &self.cache.ttl_hours)?;
        check_at_most("cache.ttl_hours", self.cache.ttl_hours, MAX_TTL_HOURS)?;
        check_positive("cache.max_size_mb", &self.cache.max_size_mb)?;
        check_at_most("cache.max_size_mb", self.cache.max_size_mb, MAX_CACHE_SIZE_MB)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        Self::initialize()?;
        self.write_to(&Self::config_file_path()?)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| DexError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, yaml)
            .map_err(|e| DexError::Config(format!("Failed to write config file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, permissions)
                .map_err(|e| DexError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Known dotted keys
    pub const KEYS: &'static [&'static str] = &[
        "api.base_url",
        "api.timeout",
        "api.max_retries",
        "api.retry_base_delay",
        "api.concurrency",
        "catalog.locale",
        "catalog.initial_page_size",
        "catalog.page_size",
        "cache.enabled",
        "cache.ttl_hours",
        "cache.max_size_mb",
        "cache.db_path",
    ];

    /// Set a configuration value by key path (in memory only)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                check_base_url(value.trim())?;
                self.api.base_url = value.trim().to_string();
            }
            "api.timeout" => self.api.timeout = parse_positive(key, value)?,
            "api.max_retries" => self.api.max_retries = parse_positive(key, value)?,
            "api.retry_base_delay" => self.api.retry_base_delay = parse_value(key, value)?,
            "api.concurrency" => self.api.concurrency = parse_positive(key, value)?,
            "catalog.locale" => {
                let locale = value.trim().to_lowercase();
                if locale.is_empty() {
                    return Err(DexError::Config("catalog.locale cannot be empty".to_string()));
                }
                self.catalog.locale = locale;
            }
            "catalog.initial_page_size" => {
                self.catalog.initial_page_size = parse_positive(key, value)?
            }
            "catalog.page_size" => self.catalog.page_size = parse_positive(key, value)?,
            "cache.enabled" => self.cache.enabled = parse_value(key, value)?,
            "cache.ttl_hours" => self.cache.ttl_hours = parse_bounded(key, value, MAX_TTL_HOURS)?,
            "cache.max_size_mb" => {
                self.cache.max_size_mb = parse_bounded(key, value, MAX_CACHE_SIZE_MB)?
            }
            "cache.db_path" => {
                self.cache.db_path = match value.trim() {
                    "" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            _ => {
                return Err(DexError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Set a value and write the file
    pub fn set_and_save(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key, value)?;
        self.save()
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout" => Some(self.api.timeout.to_string()),
            "api.max_retries" => Some(self.api.max_retries.to_string()),
            "api.retry_base_delay" => Some(self.api.retry_base_delay.to_string()),
            "api.concurrency" => Some(self.api.concurrency.to_string()),
            "catalog.locale" => Some(self.catalog.locale.clone()),
            "catalog.initial_page_size" => Some(self.catalog.initial_page_size.to_string()),
            "catalog.page_size" => Some(self.catalog.page_size.to_string()),
            "cache.enabled" => Some(self.cache.enabled.to_string()),
            "cache.ttl_hours" => Some(self.cache.ttl_hours.to_string()),
            "cache.max_size_mb" => Some(self.cache.max_size_mb.to_string()),
            "cache.db_path" => Some(self.cache.db_path().display().to_string()),
            _ => None,
        }
    }
}
