//! Feed ingestion for Feedmill.
//!
//! Subscriptions, fetching/parsing, the concurrent ingestion engine, the
//! background scheduler, and the fetch activity log.

pub mod activity;
pub mod engine;
pub mod fetcher;
pub mod repository;
pub mod scheduler;
pub mod types;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog, DEFAULT_ACTIVITY_CAPACITY};
pub use engine::{FeedSelection, IngestEngine, IngestStats, FETCH_POOL_SIZE};
pub use fetcher::{validate_url, FeedFetcher, FetchFeed};
pub use repository::{FeedRepository, ItemRepository};
pub use scheduler::{start_scheduler, FetchScheduler};
pub use types::{
    Feed, Item, ItemUpdate, NewItem, ParsedEntry, ParsedFeed, MAX_DESCRIPTION_LENGTH,
    MAX_FEED_SIZE, SANDBOX_URL_FRAGMENT,
};
