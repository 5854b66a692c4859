use log::{debug, warn};
use std::io::Write;
use std::sync::Arc;

use crate::api::{PokeApiClient, RecordFetcher};
use crate::cache::key::CacheKeyGenerator;
use crate::cache::CacheStore;
use crate::catalog::{CategoryResolver, CollectionStore, PageSizes, PaginationController, ViewCoordinator};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::Result;
use crate::output::TerminalRenderer;
use crate::progress::{messages, LoadProgress, ProgressManager};

pub type TerminalView<W> = ViewCoordinator<TerminalRenderer<W>>;

/// Catalog locale for this invocation: `--locale` wins over the config file
pub fn catalog_locale(config: &Config, opts: &GlobalOpts) -> String {
    opts.locale
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(&config.catalog.locale)
        .to_lowercase()
}

/// Open the collection cache, or `None` when disabled or unavailable
pub async fn open_cache(config: &Config, opts: &GlobalOpts) -> Option<Arc<CacheStore>> {
    if !config.cache.enabled || opts.no_cache {
        debug!("Collection cache disabled for this run");
        return None;
    }

    let cache_config = match config.cache.to_cache_config() {
        Ok(cache_config) => cache_config,
        Err(e) => {
            warn!("Collection cache unavailable, continuing without it: {}", e);
            return None;
        }
    };

    match CacheStore::new(cache_config).await {
        Ok(cache) => {
            match cache.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => debug!("Removed {} expired cache entries", removed),
                Err(e) => warn!("Failed to clean up expired cache entries: {}", e),
            }
            Some(Arc::new(cache))
        }
        Err(e) => {
            warn!("Collection cache unavailable, continuing without it: {}", e);
            None
        }
    }
}

/// Wire a coordinator for one session from the configuration
pub async fn build<W: Write>(
    config: &Config,
    opts: &GlobalOpts,
    sizes: PageSizes,
    out: W,
) -> Result<TerminalView<W>> {
    let locale = catalog_locale(config, opts);
    let cache = open_cache(config, opts).await;
    let cache_key = CacheKeyGenerator::collection_key(&config.api.base_url, &locale);

    let client = PokeApiClient::new(config.api.to_client_config())?;
    let fetcher = RecordFetcher::new(Arc::new(client), CategoryResolver::new(&locale))
        .with_concurrency(config.api.concurrency);

    Ok(ViewCoordinator::new(
        CollectionStore::new(cache, cache_key),
        PaginationController::new(fetcher),
        TerminalRenderer::new(out, opts.format),
        sizes,
    ))
}

/// Run `init` behind a spinner without printing cards.
/// Returns the collection size.
pub async fn start<W: Write>(view: &mut TerminalView<W>, progress: &Arc<ProgressManager>) -> usize {
    view.renderer_mut().mute_cards(true);
    let total = {
        let _spinner = LoadProgress::new(progress.clone(), &messages::restoring());
        view.init().await
    };
    view.renderer_mut().mute_cards(false);
    total
}
