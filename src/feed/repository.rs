//! Feed and item repositories for Feedmill.

use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;

use super::types::{Feed, Item, ItemUpdate, NewItem, SANDBOX_URL_FRAGMENT};
use crate::db::DbPool;
use crate::{FeedmillError, Result};

/// Row type for feeds from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FeedRow {
    id: i64,
    url: String,
    title: String,
    description: String,
    last_fetched_at: Option<String>,
    last_error: Option<String>,
    last_error_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: row.id,
            url: row.url,
            title: row.title,
            description: row.description,
            last_fetched_at: row.last_fetched_at.and_then(|s| parse_datetime(&s)),
            last_error: row.last_error,
            last_error_at: row.last_error_at.and_then(|s| parse_datetime(&s)),
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Row type for items from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    feed_id: i64,
    guid: String,
    title: String,
    link: String,
    description: String,
    content: String,
    author: String,
    published_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            feed_id: row.feed_id,
            guid: row.guid,
            title: row.title,
            link: row.link,
            description: row.description,
            content: row.content,
            author: row.author,
            published_at: row.published_at.and_then(|s| parse_datetime(&s)),
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

const FEED_COLUMNS: &str = "id, url, title, description, last_fetched_at, last_error, \
                            last_error_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, feed_id, guid, title, link, description, content, author, \
                            published_at, created_at, updated_at";

/// Repository for feed subscriptions.
pub struct FeedRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new subscription.
    pub async fn create(&self, url: &str) -> Result<Feed> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO feeds (url)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FeedmillError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| FeedmillError::NotFound("feed".into()))
    }

    /// Get a feed by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE id = $1");
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(row.map(Feed::from))
    }

    /// Get a feed by URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds WHERE url = $1");
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(url)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(row.map(Feed::from))
    }

    /// List every subscription in registration order.
    pub async fn list_all(&self) -> Result<Vec<Feed>> {
        let query = format!("SELECT {FEED_COLUMNS} FROM feeds ORDER BY id ASC");
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_all(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// List subscriptions excluding sandbox fixture feeds.
    pub async fn list_production(&self) -> Result<Vec<Feed>> {
        let query = format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE url NOT LIKE $1 ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .bind(format!("%{SANDBOX_URL_FRAGMENT}%"))
            .fetch_all(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// List subscriptions newest first, paginated.
    pub async fn list_page(&self, limit: usize, offset: usize) -> Result<Vec<Feed>> {
        let query = format!(
            "SELECT {FEED_COLUMNS} FROM feeds ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// Record a successful fetch.
    ///
    /// Sets the success timestamp and clears any previous error; the cached
    /// title and description are only overwritten when the parser supplied
    /// non-empty values.
    pub async fn record_fetch_success(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE feeds SET ");
        let mut separated = query.separated(", ");

        if let Some(title) = title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }

        if let Some(description) = description {
            separated.push("description = ");
            separated.push_bind_unseparated(description);
        }

        separated.push("last_fetched_at = datetime('now')");
        separated.push("last_error = NULL");
        separated.push("last_error_at = NULL");
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a failed fetch.
    ///
    /// Stores the failure message and timestamp; the last success timestamp
    /// is left untouched.
    pub async fn record_fetch_error(&self, id: i64, message: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE feeds
            SET last_error = $1,
                last_error_at = datetime('now'),
                updated_at = datetime('now')
            WHERE id = $2
            "#,
        )
        .bind(message)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a feed; its items go with it.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every feed.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM feeds")
            .execute(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Count all feeds.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feeds")
            .fetch_one(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Most recently successfully fetched feed, if any.
    pub async fn last_successful(&self) -> Result<Option<Feed>> {
        let query = format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE last_fetched_at IS NOT NULL \
             ORDER BY last_fetched_at DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(row.map(Feed::from))
    }

    /// Most recently failed feed, if any.
    pub async fn last_failed(&self) -> Result<Option<Feed>> {
        let query = format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE last_error_at IS NOT NULL \
             ORDER BY last_error_at DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(row.map(Feed::from))
    }
}

/// Repository for ingested items.
pub struct ItemRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new item.
    pub async fn create(&self, item: &NewItem) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO items (feed_id, guid, title, link, description, content, author, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(item.feed_id)
        .bind(&item.guid)
        .bind(&item.title)
        .bind(&item.link)
        .bind(&item.description)
        .bind(&item.content)
        .bind(&item.author)
        .bind(item.published_at.map(|dt| dt.to_rfc3339()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(id)
    }

    /// Overwrite an existing item with freshly parsed values.
    ///
    /// The published timestamp is kept when the update carries none.
    pub async fn update(&self, id: i64, update: &ItemUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET title = $1,
                link = $2,
                description = $3,
                content = $4,
                author = $5,
                published_at = COALESCE($6, published_at),
                updated_at = datetime('now')
            WHERE id = $7
            "#,
        )
        .bind(&update.title)
        .bind(&update.link)
        .bind(&update.description)
        .bind(&update.content)
        .bind(&update.author)
        .bind(update.published_at.map(|dt| dt.to_rfc3339()))
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Get an item by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Item>> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(row.map(Item::from))
    }

    /// Get an item by its dedup key.
    pub async fn get_by_guid(&self, feed_id: i64, guid: &str) -> Result<Option<Item>> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE feed_id = $1 AND guid = $2");
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(feed_id)
            .bind(guid)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(row.map(Item::from))
    }

    /// List items newest first, optionally restricted to one feed.
    pub async fn list_page(
        &self,
        feed_id: Option<i64>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Item>> {
        let rows = match feed_id {
            Some(feed_id) => {
                let query = format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE feed_id = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, ItemRow>(&query)
                    .bind(feed_id)
                    .bind(limit as i64)
                    .bind(offset as i64)
                    .fetch_all(self.pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {ITEM_COLUMNS} FROM items \
                     ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, ItemRow>(&query)
                    .bind(limit as i64)
                    .bind(offset as i64)
                    .fetch_all(self.pool)
                    .await
            }
        }
        .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Count items, optionally restricted to one feed.
    pub async fn count(&self, feed_id: Option<i64>) -> Result<i64> {
        let count: i64 = match feed_id {
            Some(feed_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE feed_id = $1")
                    .bind(feed_id)
                    .fetch_one(self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM items")
                    .fetch_one(self.pool)
                    .await
            }
        }
        .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(count)
    }

    /// Delete every item.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM items")
            .execute(self.pool)
            .await
            .map_err(|e| FeedmillError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

/// Parse a datetime string to DateTime<Utc>.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // SQLite datetime('now') format
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn new_item(feed_id: i64, guid: &str) -> NewItem {
        NewItem {
            feed_id,
            guid: guid.to_string(),
            title: "Article".to_string(),
            link: format!("https://example.com/{guid}"),
            description: "summary".to_string(),
            content: "content".to_string(),
            author: "Alice".to_string(),
            published_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_feed() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        let feed = repo.create("https://example.com/feed.xml").await.unwrap();

        assert!(feed.id > 0);
        assert_eq!(feed.url, "https://example.com/feed.xml");
        assert_eq!(feed.title, "");
        assert!(feed.last_fetched_at.is_none());
        assert!(feed.last_error.is_none());
    }

    #[tokio::test]
    async fn test_feed_url_is_unique() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        repo.create("https://example.com/feed.xml").await.unwrap();
        let result = repo.create("https://example.com/feed.xml").await;

        assert!(matches!(result, Err(FeedmillError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_feed_by_url() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        repo.create("https://example.com/feed.xml").await.unwrap();

        let found = repo
            .get_by_url("https://example.com/feed.xml")
            .await
            .unwrap();
        assert!(found.is_some());
        assert!(repo.get_by_url("https://other.example").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_production_excludes_sandbox_feeds() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        repo.create("https://example.com/feed.xml").await.unwrap();
        repo.create("http://localhost:8082/test_feeds/sample.xml")
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);

        let production = repo.list_production().await.unwrap();
        assert_eq!(production.len(), 1);
        assert_eq!(production[0].url, "https://example.com/feed.xml");
    }

    #[tokio::test]
    async fn test_record_fetch_success_updates_metadata() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        let feed = repo.create("https://example.com/feed.xml").await.unwrap();
        repo.record_fetch_success(feed.id, Some("Title"), Some("Desc"))
            .await
            .unwrap();

        let updated = repo.get_by_id(feed.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.description, "Desc");
        assert!(updated.last_fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_record_fetch_success_keeps_cached_metadata() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        let feed = repo.create("https://example.com/feed.xml").await.unwrap();
        repo.record_fetch_success(feed.id, Some("Title"), Some("Desc"))
            .await
            .unwrap();

        // A later fetch without metadata must not erase the cache
        repo.record_fetch_success(feed.id, None, None).await.unwrap();

        let updated = repo.get_by_id(feed.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.description, "Desc");
    }

    #[tokio::test]
    async fn test_record_fetch_error_then_success_clears_error() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        let feed = repo.create("https://example.com/feed.xml").await.unwrap();

        repo.record_fetch_error(feed.id, "connection refused")
            .await
            .unwrap();
        let errored = repo.get_by_id(feed.id).await.unwrap().unwrap();
        assert_eq!(errored.last_error, Some("connection refused".to_string()));
        assert!(errored.last_error_at.is_some());
        assert!(errored.last_fetched_at.is_none());

        repo.record_fetch_success(feed.id, None, None).await.unwrap();
        let recovered = repo.get_by_id(feed.id).await.unwrap().unwrap();
        assert!(recovered.last_error.is_none());
        assert!(recovered.last_error_at.is_none());
        assert!(recovered.last_fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_record_fetch_error_keeps_last_success() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        let feed = repo.create("https://example.com/feed.xml").await.unwrap();
        repo.record_fetch_success(feed.id, None, None).await.unwrap();
        let success_at = repo
            .get_by_id(feed.id)
            .await
            .unwrap()
            .unwrap()
            .last_fetched_at;
        assert!(success_at.is_some());

        repo.record_fetch_error(feed.id, "boom").await.unwrap();
        let errored = repo.get_by_id(feed.id).await.unwrap().unwrap();
        assert_eq!(errored.last_fetched_at, success_at);
        assert_eq!(errored.last_error, Some("boom".to_string()));
    }

    #[tokio::test]
    async fn test_delete_feed_cascades_to_items() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed = feeds.create("https://example.com/feed.xml").await.unwrap();
        items.create(&new_item(feed.id, "guid-1")).await.unwrap();
        items.create(&new_item(feed.id, "guid-2")).await.unwrap();

        assert!(feeds.delete(feed.id).await.unwrap());
        assert_eq!(items.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_last_successful_and_failed() {
        let db = setup_db().await;
        let repo = FeedRepository::new(db.pool());

        assert!(repo.last_successful().await.unwrap().is_none());
        assert!(repo.last_failed().await.unwrap().is_none());

        let good = repo.create("https://good.example/feed.xml").await.unwrap();
        let bad = repo.create("https://bad.example/feed.xml").await.unwrap();
        repo.record_fetch_success(good.id, None, None).await.unwrap();
        repo.record_fetch_error(bad.id, "boom").await.unwrap();

        assert_eq!(repo.last_successful().await.unwrap().unwrap().id, good.id);
        assert_eq!(repo.last_failed().await.unwrap().unwrap().id, bad.id);
    }

    #[tokio::test]
    async fn test_create_and_get_item_by_guid() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed = feeds.create("https://example.com/feed.xml").await.unwrap();
        items.create(&new_item(feed.id, "guid-1")).await.unwrap();

        let found = items.get_by_guid(feed.id, "guid-1").await.unwrap().unwrap();
        assert_eq!(found.guid, "guid-1");
        assert_eq!(found.author, "Alice");

        assert!(items.get_by_guid(feed.id, "missing").await.unwrap().is_none());
        // Same guid under another feed is a different item
        assert!(items.get_by_guid(feed.id + 1, "guid-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_item_update_overwrites_previous_content() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed = feeds.create("https://example.com/feed.xml").await.unwrap();
        let id = items.create(&new_item(feed.id, "guid-1")).await.unwrap();

        let update = ItemUpdate {
            title: "Rewritten".to_string(),
            link: "https://example.com/rewritten".to_string(),
            description: "new summary".to_string(),
            content: "new content".to_string(),
            author: "Bob".to_string(),
            published_at: None,
        };
        assert!(items.update(id, &update).await.unwrap());

        // The old content is gone; updates do not keep history
        let item = items.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(item.title, "Rewritten");
        assert_eq!(item.content, "new content");
        assert_eq!(item.author, "Bob");
        assert_eq!(items.count(Some(feed.id)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_item_update_preserves_published_when_absent() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed = feeds.create("https://example.com/feed.xml").await.unwrap();
        let published = Utc::now();
        let mut item = new_item(feed.id, "guid-1");
        item.published_at = Some(published);
        let id = items.create(&item).await.unwrap();

        let update = ItemUpdate {
            title: "t".to_string(),
            link: "l".to_string(),
            description: "d".to_string(),
            content: "c".to_string(),
            author: "a".to_string(),
            published_at: None,
        };
        items.update(id, &update).await.unwrap();

        let stored = items.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(
            stored.published_at.map(|dt| dt.timestamp()),
            Some(published.timestamp())
        );
    }

    #[tokio::test]
    async fn test_item_update_overwrites_published_when_present() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed = feeds.create("https://example.com/feed.xml").await.unwrap();
        let id = items.create(&new_item(feed.id, "guid-1")).await.unwrap();

        let published = Utc::now();
        let update = ItemUpdate {
            title: "t".to_string(),
            link: "l".to_string(),
            description: "d".to_string(),
            content: "c".to_string(),
            author: "a".to_string(),
            published_at: Some(published),
        };
        items.update(id, &update).await.unwrap();

        let stored = items.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(
            stored.published_at.map(|dt| dt.timestamp()),
            Some(published.timestamp())
        );
    }

    #[tokio::test]
    async fn test_list_items_with_feed_filter() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed1 = feeds.create("https://a.example/feed.xml").await.unwrap();
        let feed2 = feeds.create("https://b.example/feed.xml").await.unwrap();

        for i in 0..3 {
            items.create(&new_item(feed1.id, &format!("a-{i}"))).await.unwrap();
        }
        items.create(&new_item(feed2.id, "b-0")).await.unwrap();

        assert_eq!(items.list_page(None, 10, 0).await.unwrap().len(), 4);
        assert_eq!(items.list_page(Some(feed1.id), 10, 0).await.unwrap().len(), 3);
        assert_eq!(items.list_page(Some(feed1.id), 2, 2).await.unwrap().len(), 1);
        assert_eq!(items.count(Some(feed2.id)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_items() {
        let db = setup_db().await;
        let feeds = FeedRepository::new(db.pool());
        let items = ItemRepository::new(db.pool());

        let feed = feeds.create("https://example.com/feed.xml").await.unwrap();
        items.create(&new_item(feed.id, "guid-1")).await.unwrap();
        items.create(&new_item(feed.id, "guid-2")).await.unwrap();

        assert_eq!(items.delete_all().await.unwrap(), 2);
        assert_eq!(items.count(None).await.unwrap(), 0);
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2025-06-01T12:00:00Z").is_some());
        assert!(parse_datetime("2025-06-01 12:00:00").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }
}
