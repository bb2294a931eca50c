//! Feed management handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::feed::{validate_url, FeedRepository};
use crate::seed::seed_feeds;
use crate::web::dto::{
    ApiResponse, CreateFeedRequest, FeedResponse, IngestResponse, PaginatedResponse,
    PaginationQuery, SeedResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/feeds - List subscriptions.
pub async fn list_feeds(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<FeedResponse>>, ApiError> {
    let repo = FeedRepository::new(state.db.pool());
    let (offset, limit) = pagination.to_offset_limit();

    let total = repo.count().await.map_err(internal("list feeds"))?;
    let feeds = repo
        .list_page(limit, offset)
        .await
        .map_err(internal("list feeds"))?;

    Ok(Json(PaginatedResponse::new(
        feeds.into_iter().map(FeedResponse::from).collect(),
        pagination.page,
        pagination.per_page,
        total as u64,
    )))
}

/// POST /api/feeds - Subscribe to a feed.
///
/// The feed is not fetched here; its metadata fills in on the first
/// ingestion run.
pub async fn create_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Json(req): Json<CreateFeedRequest>,
) -> Result<Json<ApiResponse<FeedResponse>>, ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;
    validate_url(&req.url).map_err(ApiError::from)?;

    let repo = FeedRepository::new(state.db.pool());

    if repo
        .get_by_url(&req.url)
        .await
        .map_err(internal("create feed"))?
        .is_some()
    {
        return Err(ApiError::conflict("Feed already exists"));
    }

    let feed = repo.create(&req.url).await.map_err(internal("create feed"))?;

    Ok(Json(ApiResponse::new(feed.into())))
}

/// DELETE /api/feeds/:id - Unsubscribe; items go with the feed.
pub async fn delete_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Path(feed_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = FeedRepository::new(state.db.pool())
        .delete(feed_id)
        .await
        .map_err(internal("delete feed"))?;

    if !deleted {
        return Err(ApiError::not_found("Feed not found"));
    }

    Ok(Json(ApiResponse::new(())))
}

/// DELETE /api/feeds - Remove every subscription.
pub async fn delete_all_feeds(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    FeedRepository::new(state.db.pool())
        .delete_all()
        .await
        .map_err(internal("delete feeds"))?;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/feeds/seed - Create the default subscriptions.
pub async fn seed_default_feeds(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Result<Json<ApiResponse<SeedResponse>>, ApiError> {
    let summary = seed_feeds(&state.db).await;
    Ok(Json(ApiResponse::new(summary.into())))
}

/// POST /api/feeds/:id/fetch - Fetch one feed now.
///
/// The interactive path: failures surface to the caller instead of being
/// folded into counters.
pub async fn fetch_feed(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Path(feed_id): Path<i64>,
) -> Result<Json<ApiResponse<IngestResponse>>, ApiError> {
    let (created, updated) = state.engine.ingest_single_feed(feed_id).await?;

    Ok(Json(ApiResponse::new(IngestResponse {
        created,
        updated,
        errors: 0,
    })))
}

/// POST /api/feeds/fetch - Fetch every feed.
pub async fn fetch_all_feeds(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Result<Json<ApiResponse<IngestResponse>>, ApiError> {
    let stats = state.engine.run_full_ingestion().await;
    Ok(Json(ApiResponse::new(stats.into())))
}

fn internal(action: &'static str) -> impl Fn(crate::FeedmillError) -> ApiError {
    move |e| {
        tracing::error!("Failed to {}: {}", action, e);
        ApiError::internal(format!("Failed to {action}"))
    }
}
