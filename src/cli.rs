//! CLI command implementations.

use tracing::info;

use crate::config::Config;
use crate::db::UserRepository;
use crate::feed::{start_scheduler, ActivityLog, FeedFetcher, IngestEngine};
use crate::seed::{seed_admin_user, seed_feeds};
use crate::web::WebServer;
use crate::{Database, Result};

/// Run the web server, with the background fetcher when enabled.
pub async fn serve(config: &Config) -> Result<()> {
    let db = Database::open(&config.database.path).await?;
    let activity = ActivityLog::new();

    let server = WebServer::new(
        &config.server,
        config.fetch.clone(),
        db.clone(),
        activity.clone(),
    )?;

    if config.fetch.background_enabled {
        let fetcher = FeedFetcher::with_config(&config.fetch)?;
        let engine = IngestEngine::new(db, fetcher, activity);
        start_scheduler(engine, &config.fetch);
    } else {
        info!("background feed fetcher is disabled");
    }

    server.run().await
}

/// Apply pending database migrations.
pub async fn migrate(config: &Config) -> Result<()> {
    let db = Database::open(&config.database.path).await?;
    let version = db.schema_version().await?;
    info!(version, "database migration completed");
    Ok(())
}

/// Create the default admin user if absent.
pub async fn seed_users(config: &Config) -> Result<()> {
    let db = Database::open(&config.database.path).await?;
    seed_admin_user(&db).await?;
    Ok(())
}

/// Create the default feed subscriptions.
pub async fn seed_default_feeds(config: &Config) -> Result<()> {
    let db = Database::open(&config.database.path).await?;
    let summary = seed_feeds(&db).await;
    info!(
        created = summary.created,
        existed = summary.existed,
        errors = summary.errors,
        "seeded feeds"
    );
    Ok(())
}

/// Fetch and reconcile every feed once.
pub async fn fetch_feeds(config: &Config) -> Result<()> {
    let db = Database::open(&config.database.path).await?;
    let fetcher = FeedFetcher::with_config(&config.fetch)?;
    let engine = IngestEngine::new(db, fetcher, ActivityLog::new());

    info!("starting feed fetch");
    let stats = engine.run_full_ingestion().await;
    info!(
        created = stats.created,
        updated = stats.updated,
        errors = stats.errors,
        "feed fetch completed"
    );
    Ok(())
}

/// Delete every user account.
pub async fn clear_users(config: &Config) -> Result<()> {
    let db = Database::open(&config.database.path).await?;
    let deleted = UserRepository::new(db.pool()).delete_all().await?;
    info!(deleted, "cleared users table");
    Ok(())
}
