//! Concurrent feed-ingestion engine.
//!
//! Fetches every selected feed across a fixed-size worker pool, reconciles
//! parsed entries against stored items keyed by (feed id, guid), and records
//! per-feed outcomes in the activity log. Failures are isolated per feed and
//! per item; the bulk path always returns aggregate counts.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::activity::ActivityLog;
use super::fetcher::FetchFeed;
use super::repository::{FeedRepository, ItemRepository};
use super::types::{Feed, ParsedEntry, ParsedFeed};
use crate::db::Database;
use crate::{FeedmillError, Result};

/// Number of concurrent fetch workers for bulk ingestion.
pub const FETCH_POOL_SIZE: usize = 10;

/// Aggregate counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Items created.
    pub created: u64,
    /// Items updated in place.
    pub updated: u64,
    /// Fetch and persistence failures.
    pub errors: u64,
}

impl IngestStats {
    /// Fold another tally into this one.
    pub fn merge(&mut self, other: &IngestStats) {
        self.created += other.created;
        self.updated += other.updated;
        self.errors += other.errors;
    }
}

/// Which feeds a bulk run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSelection {
    /// Every subscription.
    All,
    /// Subscriptions excluding sandbox fixture feeds.
    Production,
}

/// The ingestion engine.
///
/// Cheap to clone; every clone shares the database pool and activity log.
/// Each bulk-run worker receives its own clone of the fetcher, so a fetcher
/// implementation never has to cope with concurrent use of one instance.
#[derive(Clone)]
pub struct IngestEngine<F> {
    db: Database,
    fetcher: F,
    activity: ActivityLog,
}

impl<F> IngestEngine<F>
where
    F: FetchFeed + Clone + 'static,
{
    /// Create an engine.
    pub fn new(db: Database, fetcher: F, activity: ActivityLog) -> Self {
        Self {
            db,
            fetcher,
            activity,
        }
    }

    /// The activity log this engine reports into.
    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Ingest every subscription.
    pub async fn run_full_ingestion(&self) -> IngestStats {
        self.ingest_selected(FeedSelection::All).await
    }

    /// Ingest every subscription except sandbox fixture feeds.
    ///
    /// Used by scheduled background runs so fixture feeds do not pollute
    /// real statistics.
    pub async fn run_production_ingestion(&self) -> IngestStats {
        self.ingest_selected(FeedSelection::Production).await
    }

    /// Bulk-ingest the selected feeds across the worker pool.
    ///
    /// Never fails as a whole: every per-feed and per-item failure is
    /// recorded, counted, and left behind in the returned stats.
    pub async fn ingest_selected(&self, selection: FeedSelection) -> IngestStats {
        let feeds = {
            let repo = FeedRepository::new(self.db.pool());
            let listed = match selection {
                FeedSelection::All => repo.list_all().await,
                FeedSelection::Production => repo.list_production().await,
            };
            match listed {
                Ok(feeds) => feeds,
                Err(e) => {
                    error!(error = %e, "failed to list feeds for ingestion");
                    return IngestStats {
                        errors: 1,
                        ..IngestStats::default()
                    };
                }
            }
        };

        if feeds.is_empty() {
            debug!("no feeds selected, skipping ingestion");
            return IngestStats::default();
        }

        let worker_count = FETCH_POOL_SIZE.min(feeds.len());
        debug!(
            feeds = feeds.len(),
            workers = worker_count,
            "starting bulk ingestion"
        );

        // All feeds are queued up front; workers drain the queue until empty.
        let queue = Arc::new(Mutex::new(VecDeque::from(feeds)));
        let mut workers: JoinSet<IngestStats> = JoinSet::new();

        for _ in 0..worker_count {
            let engine = self.clone();
            let queue = Arc::clone(&queue);
            workers.spawn(async move {
                let fetcher = engine.fetcher.clone();
                let mut tally = IngestStats::default();
                loop {
                    let feed = { queue.lock().await.pop_front() };
                    let Some(feed) = feed else { break };
                    let feed_tally = engine.process_feed(&fetcher, &feed).await;
                    tally.merge(&feed_tally);
                }
                tally
            });
        }

        // Per-worker tallies are merged here; workers never touch shared
        // counters while running.
        let mut totals = IngestStats::default();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(tally) => totals.merge(&tally),
                Err(e) => {
                    error!(error = %e, "ingestion worker failed");
                    totals.errors += 1;
                }
            }
        }

        totals
    }

    /// Fetch and reconcile a single feed by ID.
    ///
    /// Serves the interactive "fetch this feed now" action: an unknown id or
    /// a fetch failure is returned to the caller, after the failure has been
    /// recorded on the feed row and in the activity log.
    pub async fn ingest_single_feed(&self, feed_id: i64) -> Result<(u64, u64)> {
        let feed = FeedRepository::new(self.db.pool())
            .get_by_id(feed_id)
            .await?
            .ok_or_else(|| FeedmillError::NotFound("feed".into()))?;

        match self.fetcher.fetch_and_parse(&feed.url).await {
            Ok(parsed) => {
                let tally = self.apply_parsed_feed(&feed, &parsed).await;
                Ok((tally.created, tally.updated))
            }
            Err(e) => {
                self.record_fetch_failure(&feed, &e).await;
                Err(e)
            }
        }
    }

    /// Fetch and reconcile one feed, swallowing the failure into the tally.
    async fn process_feed(&self, fetcher: &F, feed: &Feed) -> IngestStats {
        match fetcher.fetch_and_parse(&feed.url).await {
            Ok(parsed) => self.apply_parsed_feed(feed, &parsed).await,
            Err(e) => {
                self.record_fetch_failure(feed, &e).await;
                IngestStats {
                    errors: 1,
                    ..IngestStats::default()
                }
            }
        }
    }

    /// Persist feed metadata and reconcile every parsed entry.
    async fn apply_parsed_feed(&self, feed: &Feed, parsed: &ParsedFeed) -> IngestStats {
        let mut tally = IngestStats::default();

        let title = (!parsed.title.is_empty()).then_some(parsed.title.as_str());
        let description = (!parsed.description.is_empty()).then_some(parsed.description.as_str());

        let feeds = FeedRepository::new(self.db.pool());
        if let Err(e) = feeds.record_fetch_success(feed.id, title, description).await {
            error!(feed = %feed.url, error = %e, "failed to save feed metadata");
            tally.errors += 1;
        }

        for entry in &parsed.entries {
            self.reconcile_entry(feed, entry, &mut tally).await;
        }

        self.activity.success(
            &feed.url,
            format!(
                "Successfully fetched feed: {} created, {} updated",
                tally.created, tally.updated
            ),
        );

        tally
    }

    /// Create or update the stored item for one parsed entry.
    ///
    /// A failure here is counted and logged; the remaining entries of the
    /// feed are still processed.
    async fn reconcile_entry(&self, feed: &Feed, entry: &ParsedEntry, tally: &mut IngestStats) {
        let items = ItemRepository::new(self.db.pool());
        let guid = entry.dedup_guid();

        match items.get_by_guid(feed.id, guid).await {
            Ok(Some(existing)) => {
                match items.update(existing.id, &entry.to_item_update()).await {
                    Ok(_) => tally.updated += 1,
                    Err(e) => {
                        error!(feed = %feed.url, guid, error = %e, "failed to update item");
                        tally.errors += 1;
                    }
                }
            }
            Ok(None) => match items.create(&entry.to_new_item(feed.id)).await {
                Ok(_) => tally.created += 1,
                Err(e) => {
                    error!(feed = %feed.url, guid, error = %e, "failed to create item");
                    tally.errors += 1;
                }
            },
            Err(e) => {
                error!(feed = %feed.url, guid, error = %e, "failed to look up item");
                tally.errors += 1;
            }
        }
    }

    /// Record a fetch failure on the feed row and in the activity log.
    async fn record_fetch_failure(&self, feed: &Feed, e: &FeedmillError) {
        warn!(feed = %feed.url, error = %e, "feed fetch failed");

        let feeds = FeedRepository::new(self.db.pool());
        if let Err(db_err) = feeds.record_fetch_error(feed.id, &e.to_string()).await {
            error!(feed = %feed.url, error = %db_err, "failed to save feed error state");
        }

        self.activity
            .error(&feed.url, format!("Failed to fetch feed: {e}"));
    }
}
