//! Activity log and system information handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::feed::FeedRepository;
use crate::web::dto::{ActivityResponse, ApiResponse, FetchStateResponse, InfoResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/activity - Recent fetch outcomes, newest first.
pub async fn activity(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Json<ApiResponse<Vec<ActivityResponse>>> {
    let mut entries = state.activity.snapshot();
    entries.reverse();

    Json(ApiResponse::new(
        entries.into_iter().map(ActivityResponse::from).collect(),
    ))
}

/// GET /api/info - Feed/item counts and fetcher status.
pub async fn info(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Result<Json<ApiResponse<InfoResponse>>, ApiError> {
    let feeds = FeedRepository::new(state.db.pool());
    let items = crate::feed::ItemRepository::new(state.db.pool());

    let feeds_count = feeds.count().await.map_err(internal)?;
    let items_count = items.count(None).await.map_err(internal)?;

    let last_success = feeds.last_successful().await.map_err(internal)?.and_then(|feed| {
        feed.last_fetched_at.map(|at| FetchStateResponse {
            feed_url: feed.url,
            timestamp: at.to_rfc3339(),
            error: None,
        })
    });

    let last_failure = feeds.last_failed().await.map_err(internal)?.and_then(|feed| {
        feed.last_error_at.map(|at| FetchStateResponse {
            feed_url: feed.url,
            timestamp: at.to_rfc3339(),
            error: feed.last_error,
        })
    });

    Ok(Json(ApiResponse::new(InfoResponse {
        feeds_count,
        items_count,
        last_success,
        last_failure,
        background_fetch_enabled: state.fetch_config.background_enabled,
        background_fetch_interval_secs: state.fetch_config.effective_interval_secs(),
    })))
}

fn internal(e: crate::FeedmillError) -> ApiError {
    tracing::error!("Failed to collect system info: {}", e);
    ApiError::internal("Failed to collect system info")
}
