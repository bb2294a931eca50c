//! Feed and item types for Feedmill.

use chrono::{DateTime, Utc};

/// Maximum length for item descriptions after HTML stripping.
pub const MAX_DESCRIPTION_LENGTH: usize = 10000;

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// URL fragment marking sandbox fixture feeds.
///
/// Feeds whose URL contains this fragment are served by the app itself for
/// browser-level test suites and are excluded from scheduled background
/// ingestion.
pub const SANDBOX_URL_FRAGMENT: &str = "/test_feeds/";

/// A subscribed feed.
#[derive(Debug, Clone)]
pub struct Feed {
    /// Feed ID.
    pub id: i64,
    /// Subscription URL (unique).
    pub url: String,
    /// Cached feed title, refreshed on successful fetches.
    pub title: String,
    /// Cached feed description, refreshed on successful fetches.
    pub description: String,
    /// Last successful fetch, if any.
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// Message of the most recent fetch failure; cleared on the next success.
    pub last_error: Option<String>,
    /// Timestamp of the most recent fetch failure; cleared on the next success.
    pub last_error_at: Option<DateTime<Utc>>,
    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Feed {
    /// Whether this feed is a sandbox fixture excluded from background runs.
    pub fn is_sandbox(&self) -> bool {
        self.url.contains(SANDBOX_URL_FRAGMENT)
    }
}

/// An ingested feed entry.
#[derive(Debug, Clone)]
pub struct Item {
    /// Item ID.
    pub id: i64,
    /// Feed this item belongs to.
    pub feed_id: i64,
    /// Dedup identifier (entry guid, or its link when no guid was supplied).
    pub guid: String,
    /// Item title.
    pub title: String,
    /// Link to the original article.
    pub link: String,
    /// Item summary.
    pub description: String,
    /// Full content; equals the description when the feed supplies none.
    pub content: String,
    /// Author name, empty when the feed names nobody.
    pub author: String,
    /// Published timestamp (falls back to the entry's updated timestamp).
    pub published_at: Option<DateTime<Utc>>,
    /// When the item was first stored.
    pub created_at: DateTime<Utc>,
    /// When the item was last overwritten by a fetch.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    /// Feed ID.
    pub feed_id: i64,
    /// Dedup identifier.
    pub guid: String,
    /// Item title.
    pub title: String,
    /// Link to the original article.
    pub link: String,
    /// Item summary.
    pub description: String,
    /// Full content.
    pub content: String,
    /// Author name.
    pub author: String,
    /// Published timestamp.
    pub published_at: Option<DateTime<Utc>>,
}

/// Replacement values applied to an existing item.
///
/// Every textual field overwrites unconditionally; `published_at` only
/// overwrites when present, so an entry that stops reporting a timestamp
/// does not erase a previously known one.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    /// New title.
    pub title: String,
    /// New link.
    pub link: String,
    /// New summary.
    pub description: String,
    /// New content.
    pub content: String,
    /// New author.
    pub author: String,
    /// New published timestamp, if the entry reports one.
    pub published_at: Option<DateTime<Utc>>,
}

/// A fetched and normalized feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Feed title; empty when the feed supplies none.
    pub title: String,
    /// Feed description; empty when the feed supplies none.
    pub description: String,
    /// Normalized entries.
    pub entries: Vec<ParsedEntry>,
}

/// A normalized feed entry.
#[derive(Debug, Clone, Default)]
pub struct ParsedEntry {
    /// Explicit entry identifier; empty when the feed supplies none.
    pub guid: String,
    /// Entry link.
    pub link: String,
    /// Entry title.
    pub title: String,
    /// Entry summary.
    pub description: String,
    /// Full entry content.
    pub content: String,
    /// Primary named author, if any.
    pub author: Option<String>,
    /// Additional author names, in feed order.
    pub authors: Vec<String>,
    /// Published timestamp.
    pub published_at: Option<DateTime<Utc>>,
    /// Updated timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ParsedEntry {
    /// The identifier used for deduplication: the explicit guid, or the link
    /// when the feed supplies none.
    pub fn dedup_guid(&self) -> &str {
        if self.guid.is_empty() {
            &self.link
        } else {
            &self.guid
        }
    }

    /// Effective published timestamp: published, else updated, else absent.
    pub fn effective_published(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.updated_at)
    }

    /// Effective content: the entry content, or the description when the
    /// feed supplies no distinct content.
    pub fn effective_content(&self) -> &str {
        if self.content.is_empty() {
            &self.description
        } else {
            &self.content
        }
    }

    /// Derived author: the primary named author, else the first entry of the
    /// authors list, else empty.
    pub fn author_name(&self) -> String {
        if let Some(author) = &self.author {
            if !author.is_empty() {
                return author.clone();
            }
        }
        match self.authors.first() {
            Some(name) if !name.is_empty() => name.clone(),
            _ => String::new(),
        }
    }

    /// Build a new item for this entry.
    pub fn to_new_item(&self, feed_id: i64) -> NewItem {
        NewItem {
            feed_id,
            guid: self.dedup_guid().to_string(),
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
            content: self.effective_content().to_string(),
            author: self.author_name(),
            published_at: self.effective_published(),
        }
    }

    /// Build the replacement values for an existing item.
    pub fn to_item_update(&self) -> ItemUpdate {
        ItemUpdate {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
            content: self.effective_content().to_string(),
            author: self.author_name(),
            published_at: self.effective_published(),
        }
    }
}
