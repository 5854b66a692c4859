use log::{debug, info, warn};
use std::collections::HashSet;
use tokio::sync::Mutex;

use super::pagination::{LoadOutcome, PaginationController};
use super::record::Record;
use super::search::SearchIndex;
use super::store::CollectionStore;
use crate::error::{DexError, Result};

/// How a card batch relates to what is already on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Clear the card container first
    Replace,
    /// Add below the existing cards
    Append,
}

/// Which half of the detail view is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailPane {
    #[default]
    Info,
    Stats,
}

/// Detail navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Presentation surface driven by the coordinator
pub trait RenderGateway {
    fn render_cards(&mut self, records: &[&Record], mode: RenderMode) -> Result<()>;

    /// Show `record`, which sits at `position` (0-based) of `total`
    fn render_detail(
        &mut self,
        record: &Record,
        position: usize,
        total: usize,
        pane: DetailPane,
    ) -> Result<()>;

    fn close_detail(&mut self) -> Result<()>;
}

/// Page sizes used by the coordinator
#[derive(Debug, Clone, Copy)]
pub struct PageSizes {
    pub initial: u32,
    pub more: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self { initial: 40, more: 20 }
    }
}

/// Sequences startup, search, paging and detail navigation over one
/// collection
pub struct ViewCoordinator<R: RenderGateway> {
    store: Mutex<CollectionStore>,
    pager: PaginationController,
    renderer: R,
    sizes: PageSizes,
    /// Ids currently in the card container
    rendered: HashSet<u32>,
    query: String,
    /// Record shown in the detail view; `Some` while the view is open
    current: Option<u32>,
    pane: DetailPane,
}

impl<R: RenderGateway> ViewCoordinator<R> {
    pub fn new(
        store: CollectionStore,
        pager: PaginationController,
        renderer: R,
        sizes: PageSizes,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            pager,
            renderer,
            sizes,
            rendered: HashSet::new(),
            query: String::new(),
            current: None,
            pane: DetailPane::Info,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn records(&mut self) -> &[Record] {
        self.store.get_mut().all()
    }

    pub fn len(&mut self) -> usize {
        self.store.get_mut().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.store.get_mut().is_empty()
    }

    pub fn current(&mut self) -> Option<&Record> {
        let id = self.current?;
        self.store.get_mut().get(id)
    }

    pub fn is_detail_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn pane(&self) -> DetailPane {
        self.pane
    }

    /// Restore the persisted collection, or fetch the first page when there
    /// is none, then show every card. Returns the collection size.
    pub async fn init(&mut self) -> usize {
        let restored = self.store.get_mut().restore().await;
        if restored == 0 && self.store.get_mut().is_empty() {
            info!("Cold start: loading the first {} records", self.sizes.initial);
            self.pager.load_next(&self.store, self.sizes.initial).await;
        }

        self.render_all();
        self.store.get_mut().len()
    }

    /// Drop the persisted collection so the next `init` fetches fresh data
    pub async fn forget_persisted(&mut self) {
        self.store.get_mut().forget_persisted().await;
    }

    /// Filter the cards by name. Short queries show every card.
    /// Returns the number of matching records.
    pub fn search(&mut self, query: &str) -> usize {
        self.query = SearchIndex::normalize(query);

        if !SearchIndex::is_active(&self.query) {
            return self.render_all();
        }

        let store = self.store.get_mut();
        let matches = SearchIndex::filter(&self.query, store.all());
        let count = matches.len();
        Self::draw(&mut self.renderer, &mut self.rendered, &matches, RenderMode::Replace);
        count
    }

    /// Clear the filter and show every card
    pub fn show_all(&mut self) -> usize {
        self.query.clear();
        self.render_all()
    }

    /// Load the next page and show the cards that are not on screen yet
    pub async fn load_more(&mut self) -> LoadOutcome {
        let outcome = self.pager.load_next(&self.store, self.sizes.more).await;
        if outcome.records().is_empty() {
            return outcome;
        }

        if SearchIndex::is_active(&self.query) {
            let query = self.query.clone();
            self.search(&query);
        } else {
            let fresh: Vec<&Record> = outcome
                .records()
                .iter()
                .filter(|r| !self.rendered.contains(&r.id))
                .collect();
            Self::draw(&mut self.renderer, &mut self.rendered, &fresh, RenderMode::Append);
        }
        outcome
    }

    /// Open the detail view for a record in the collection
    pub fn open_detail(&mut self, id: u32) -> Result<()> {
        if !self.store.get_mut().contains(id) {
            return Err(DexError::NotFound(format!("record #{} is not loaded", id)));
        }
        self.current = Some(id);
        self.pane = DetailPane::Info;
        self.show_current();
        Ok(())
    }

    /// Move the detail view to the adjacent record, wrapping at both ends.
    /// No-op when the detail view is closed.
    pub fn navigate(&mut self, direction: Direction) -> Option<u32> {
        let id = self.current?;
        let store = self.store.get_mut();
        let Some(index) = store.position(id) else {
            warn!("Current record {} vanished from the collection", id);
            self.current = None;
            return None;
        };

        let total = store.len();
        let next = match direction {
            Direction::Previous if index == 0 => total - 1,
            Direction::Previous => index - 1,
            Direction::Next if index + 1 == total => 0,
            Direction::Next => index + 1,
        };

        let next_id = store.all()[next].id;
        debug!("Navigating {:?} from #{} to #{}", direction, id, next_id);
        self.current = Some(next_id);
        self.show_current();
        Some(next_id)
    }

    /// Switch the detail view between info and stats
    pub fn toggle_pane(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.pane = match self.pane {
            DetailPane::Info => DetailPane::Stats,
            DetailPane::Stats => DetailPane::Info,
        };
        self.show_current();
    }

    pub fn close_detail(&mut self) {
        if self.current.take().is_some() {
            if let Err(e) = self.renderer.close_detail() {
                warn!("Failed to close detail view: {}", e);
            }
        }
    }

    fn render_all(&mut self) -> usize {
        let store = self.store.get_mut();
        let all: Vec<&Record> = store.all().iter().collect();
        Self::draw(&mut self.renderer, &mut self.rendered, &all, RenderMode::Replace);
        all.len()
    }

    fn draw(renderer: &mut R, rendered: &mut HashSet<u32>, records: &[&Record], mode: RenderMode) {
        if mode == RenderMode::Replace {
            rendered.clear();
        }
        rendered.extend(records.iter().map(|r| r.id));
        if let Err(e) = renderer.render_cards(records, mode) {
            warn!("Failed to render cards: {}", e);
        }
    }

    fn show_current(&mut self) {
        let Some(id) = self.current else {
            return;
        };
        let store = self.store.get_mut();
        let Some(index) = store.position(id) else {
            return;
        };
        let total = store.len();
        if let Err(e) = self
            .renderer
            .render_detail(&store.all()[index], index, total, self.pane)
        {
            warn!("Failed to render detail view: {}", e);
        }
    }
}
