//! Response DTOs for the admin API.

use serde::Serialize;

use crate::db::User;
use crate::feed::{ActivityEntry, Feed, IngestStats, Item};
use crate::seed::SeedSummary;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
}

/// User information in responses.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Feed information in responses.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// Feed ID.
    pub id: i64,
    /// Subscription URL.
    pub url: String,
    /// Cached feed title.
    pub title: String,
    /// Cached feed description.
    pub description: String,
    /// Last successful fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetched_at: Option<String>,
    /// Most recent fetch failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Most recent fetch failure timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            url: feed.url,
            title: feed.title,
            description: feed.description,
            last_fetched_at: feed.last_fetched_at.map(|dt| dt.to_rfc3339()),
            last_error: feed.last_error,
            last_error_at: feed.last_error_at.map(|dt| dt.to_rfc3339()),
            created_at: feed.created_at.to_rfc3339(),
        }
    }
}

/// Item information in responses.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    /// Item ID.
    pub id: i64,
    /// Owning feed.
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// When the item was first stored.
    pub created_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            feed_id: item.feed_id,
            guid: item.guid,
            title: item.title,
            link: item.link,
            description: item.description,
            content: item.content,
            author: item.author,
            published_at: item.published_at.map(|dt| dt.to_rfc3339()),
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Result of an ingestion run.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// Items created.
    pub created: u64,
    /// Items updated.
    pub updated: u64,
    /// Errors encountered.
    pub errors: u64,
}

impl From<IngestStats> for IngestResponse {
    fn from(stats: IngestStats) -> Self {
        Self {
            created: stats.created,
            updated: stats.updated,
            errors: stats.errors,
        }
    }
}

/// Result of seeding default feeds.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// Feeds created.
    pub created: u64,
    /// Feeds that already existed.
    pub existed: u64,
    /// Errors encountered.
    pub errors: u64,
}

impl From<SeedSummary> for SeedResponse {
    fn from(summary: SeedSummary) -> Self {
        Self {
            created: summary.created,
            existed: summary.existed,
            errors: summary.errors,
        }
    }
}

/// One activity log entry.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    /// When the outcome was recorded.
    pub timestamp: String,
    /// "success" or "error".
    pub kind: &'static str,
    /// Feed URL concerned.
    pub feed_url: String,
    /// Outcome message.
    pub message: String,
}

impl From<ActivityEntry> for ActivityResponse {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            timestamp: entry.timestamp.to_rfc3339(),
            kind: entry.kind.as_str(),
            feed_url: entry.feed_url,
            message: entry.message,
        }
    }
}

/// System information for the info page.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Number of subscriptions.
    pub feeds_count: i64,
    /// Number of stored items.
    pub items_count: i64,
    /// Most recent successful fetch, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success: Option<FetchStateResponse>,
    /// Most recent failed fetch, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<FetchStateResponse>,
    /// Whether the background fetcher is enabled.
    pub background_fetch_enabled: bool,
    /// Effective background fetch interval in seconds.
    pub background_fetch_interval_secs: u64,
}

/// Fetch-state summary of one feed.
#[derive(Debug, Serialize)]
pub struct FetchStateResponse {
    /// Feed URL.
    pub feed_url: String,
    /// Timestamp of the recorded outcome.
    pub timestamp: String,
    /// Failure message, for errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
