//! API handlers for the admin UI.

pub mod auth;
pub mod feeds;
pub mod items;
pub mod system;
pub mod users;

use crate::auth::SessionStore;
use crate::config::FetchConfig;
use crate::db::Database;
use crate::feed::{ActivityLog, FeedFetcher, IngestEngine};
use crate::Result;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Session store for cookie auth.
    pub sessions: SessionStore,
    /// Shared fetch activity log.
    pub activity: ActivityLog,
    /// The ingestion engine behind the fetch endpoints.
    pub engine: IngestEngine<FeedFetcher>,
    /// Fetch configuration, surfaced on the info page.
    pub fetch_config: FetchConfig,
}

impl AppState {
    /// Create the application state.
    ///
    /// The engine shares the given activity log, so scheduler runs and
    /// API-triggered runs land in the same trail.
    pub fn new(db: Database, fetch_config: FetchConfig, activity: ActivityLog) -> Result<Self> {
        let fetcher = FeedFetcher::with_config(&fetch_config)?;
        let engine = IngestEngine::new(db.clone(), fetcher, activity.clone());

        Ok(Self {
            db,
            sessions: SessionStore::new(),
            activity,
            engine,
            fetch_config,
        })
    }
}
