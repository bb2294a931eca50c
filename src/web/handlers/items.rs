//! Item browsing handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::feed::ItemRepository;
use crate::web::dto::{
    ApiResponse, IngestResponse, ItemListQuery, ItemResponse, PaginatedResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/items - List items, optionally for one feed.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<PaginatedResponse<ItemResponse>>, ApiError> {
    let repo = ItemRepository::new(state.db.pool());
    let (offset, limit) = query.pagination().to_offset_limit();

    let total = repo
        .count(query.feed_id)
        .await
        .map_err(internal("list items"))?;
    let items = repo
        .list_page(query.feed_id, limit, offset)
        .await
        .map_err(internal("list items"))?;

    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(ItemResponse::from).collect(),
        query.page,
        query.per_page,
        total as u64,
    )))
}

/// GET /api/items/:id - Get one item.
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Path(item_id): Path<i64>,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    let item = ItemRepository::new(state.db.pool())
        .get_by_id(item_id)
        .await
        .map_err(internal("get item"))?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    Ok(Json(ApiResponse::new(item.into())))
}

/// POST /api/items/fetch - Run full ingestion.
pub async fn fetch_items(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Result<Json<ApiResponse<IngestResponse>>, ApiError> {
    let stats = state.engine.run_full_ingestion().await;
    Ok(Json(ApiResponse::new(stats.into())))
}

/// DELETE /api/items - Delete every item.
pub async fn delete_all_items(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    ItemRepository::new(state.db.pool())
        .delete_all()
        .await
        .map_err(internal("delete items"))?;

    Ok(Json(ApiResponse::new(())))
}

fn internal(action: &'static str) -> impl Fn(crate::FeedmillError) -> ApiError {
    move |e| {
        tracing::error!("Failed to {}: {}", action, e);
        ApiError::internal(format!("Failed to {action}"))
    }
}
