use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::record::Record;
use super::store::CollectionStore;
use crate::api::RecordFetcher;

/// Result of a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Records newly added to the collection (possibly none)
    Loaded(Vec<Record>),
    /// The listing request failed; nothing was merged and the caller may retry
    Failed(String),
    /// Another page request was in flight; nothing was requested
    Busy,
}

impl LoadOutcome {
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Loaded(records) => records,
            Self::Failed(_) | Self::Busy => &[],
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Marks the controller as fetching until dropped
struct FetchGuard<'a>(&'a AtomicBool);

impl<'a> FetchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Requests successive pages, one at a time
pub struct PaginationController {
    fetcher: RecordFetcher,
    fetching: AtomicBool,
}

impl PaginationController {
    pub fn new(fetcher: RecordFetcher) -> Self {
        Self {
            fetcher,
            fetching: AtomicBool::new(false),
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::Acquire)
    }

    /// Fetch the page that starts at the current collection size, merge it
    /// and persist. Returns the records that were actually added.
    ///
    /// A call made while another is in flight returns [`LoadOutcome::Busy`]
    /// immediately. A failed listing request returns [`LoadOutcome::Failed`]
    /// and leaves the collection untouched.
    pub async fn load_next(&self, store: &Mutex<CollectionStore>, limit: u32) -> LoadOutcome {
        let Some(_guard) = FetchGuard::acquire(&self.fetching) else {
            debug!("Page request dropped: another page is in flight");
            return LoadOutcome::Busy;
        };

        let offset = store.lock().await.len();
        info!("Loading {} records at offset {}", limit, offset);

        let listing = match self.fetcher.client().list_page(offset, limit).await {
            Ok(listing) => listing,
            Err(e) => {
                error!("Failed to load page at offset {}: {}", offset, e);
                return LoadOutcome::Failed(e.to_string());
            }
        };

        let records = self.fetcher.fetch_many(&listing.urls()).await;

        let mut store = store.lock().await;
        let before = store.len();
        let inserted = store.merge(records);
        store.persist().await;

        debug!("Page at offset {} added {} records", offset, inserted);
        LoadOutcome::Loaded(store.all()[before..].to_vec())
    }
}
