use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::{DexError, Result};

/// Build the shared HTTP client for catalog requests
pub fn create_custom_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true)
        .user_agent(user_agent)
        .use_rustls_tls()
        .build()
        .map_err(|e| DexError::Other(format!("Failed to create HTTP client: {}", e)))
}
