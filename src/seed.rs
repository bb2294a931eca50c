//! Database seeding for Feedmill.
//!
//! Idempotent bootstrap of the default admin account and a starter set of
//! feed subscriptions, shared by the CLI and the admin API.

use tracing::{info, warn};

use crate::auth::hash_password;
use crate::db::{NewUser, UserRepository};
use crate::feed::FeedRepository;
use crate::{Database, FeedmillError, Result};

/// Default admin username.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Default admin password; change it after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Starter feed subscriptions.
pub const DEFAULT_FEED_URLS: &[&str] = &[
    "https://feeds.bbci.co.uk/news/rss.xml",
    "http://rss.cnn.com/rss/cnn_topstories.rss",
    "https://www.wired.com/feed/rss",
    "https://habr.com/ru/rss/articles/?fl=ru",
];

/// Outcome of a feed-seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Feeds newly created.
    pub created: u64,
    /// Feeds that already existed.
    pub existed: u64,
    /// Failures while checking or inserting.
    pub errors: u64,
}

/// Create the default feed subscriptions if they do not exist.
pub async fn seed_feeds(db: &Database) -> SeedSummary {
    seed_feeds_with_urls(db, DEFAULT_FEED_URLS).await
}

/// Create subscriptions for the given URLs if they do not exist.
pub async fn seed_feeds_with_urls(db: &Database, urls: &[&str]) -> SeedSummary {
    let repo = FeedRepository::new(db.pool());
    let mut summary = SeedSummary::default();

    for url in urls {
        match repo.get_by_url(url).await {
            Ok(Some(_)) => {
                info!(url, "feed already exists");
                summary.existed += 1;
            }
            Ok(None) => match repo.create(url).await {
                Ok(_) => {
                    info!(url, "feed created");
                    summary.created += 1;
                }
                Err(e) => {
                    warn!(url, error = %e, "failed to create feed");
                    summary.errors += 1;
                }
            },
            Err(e) => {
                warn!(url, error = %e, "failed to check for existing feed");
                summary.errors += 1;
            }
        }
    }

    summary
}

/// Create the default admin user if absent.
///
/// Returns true when the user was created, false when it already existed.
pub async fn seed_admin_user(db: &Database) -> Result<bool> {
    let repo = UserRepository::new(db.pool());

    if repo.get_by_username(DEFAULT_ADMIN_USERNAME).await?.is_some() {
        info!("admin user already exists");
        return Ok(false);
    }

    let hash = hash_password(DEFAULT_ADMIN_PASSWORD)
        .map_err(|e| FeedmillError::Auth(e.to_string()))?;
    repo.create(&NewUser::new(DEFAULT_ADMIN_USERNAME, hash))
        .await?;

    info!(
        username = DEFAULT_ADMIN_USERNAME,
        "admin user created with the default password"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;

    #[tokio::test]
    async fn test_seed_feeds_creates_defaults() {
        let db = Database::open_in_memory().await.unwrap();

        let summary = seed_feeds(&db).await;

        assert_eq!(summary.created, DEFAULT_FEED_URLS.len() as u64);
        assert_eq!(summary.existed, 0);
        assert_eq!(summary.errors, 0);

        let repo = FeedRepository::new(db.pool());
        assert_eq!(repo.count().await.unwrap(), DEFAULT_FEED_URLS.len() as i64);
    }

    #[tokio::test]
    async fn test_seed_feeds_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();

        seed_feeds(&db).await;
        let second = seed_feeds(&db).await;

        assert_eq!(second.created, 0);
        assert_eq!(second.existed, DEFAULT_FEED_URLS.len() as u64);

        let repo = FeedRepository::new(db.pool());
        assert_eq!(repo.count().await.unwrap(), DEFAULT_FEED_URLS.len() as i64);
    }

    #[tokio::test]
    async fn test_seed_feeds_partial_overlap() {
        let db = Database::open_in_memory().await.unwrap();

        seed_feeds_with_urls(&db, &["https://a.example/feed.xml"]).await;
        let summary =
            seed_feeds_with_urls(&db, &["https://a.example/feed.xml", "https://b.example/feed.xml"])
                .await;

        assert_eq!(summary.created, 1);
        assert_eq!(summary.existed, 1);
    }

    #[tokio::test]
    async fn test_seed_admin_user() {
        let db = Database::open_in_memory().await.unwrap();

        assert!(seed_admin_user(&db).await.unwrap());
        assert!(!seed_admin_user(&db).await.unwrap());

        let repo = UserRepository::new(db.pool());
        let admin = repo
            .get_by_username(DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password(DEFAULT_ADMIN_PASSWORD, &admin.password).is_ok());
    }
}
