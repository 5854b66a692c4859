//! Collection pipeline: records, localization, persistence, paging, search
//! and the view coordinator that ties them together.

pub mod coordinator;
pub mod pagination;
pub mod record;
pub mod resolver;
pub mod search;
pub mod store;

pub use coordinator::{DetailPane, Direction, PageSizes, RenderGateway, RenderMode, ViewCoordinator};
pub use pagination::{LoadOutcome, PaginationController};
pub use record::{Record, Stat};
pub use resolver::CategoryResolver;
pub use search::SearchIndex;
pub use store::CollectionStore;
