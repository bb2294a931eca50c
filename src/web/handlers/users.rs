//! User management handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::auth::hash_password;
use crate::db::{NewUser, UserRepository, UserUpdate};
use crate::web::dto::{
    ApiResponse, CreateUserRequest, PaginatedResponse, PaginationQuery, UpdateUserRequest,
    UserResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /api/users - List users.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<UserResponse>>, ApiError> {
    let repo = UserRepository::new(state.db.pool());
    let (offset, limit) = pagination.to_offset_limit();

    let total = repo.count().await.map_err(internal("list users"))?;
    let users = repo.list(limit, offset).await.map_err(internal("list users"))?;

    Ok(Json(PaginatedResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
        pagination.page,
        pagination.per_page,
        total as u64,
    )))
}

/// POST /api/users - Create a user.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    let repo = UserRepository::new(state.db.pool());

    if repo
        .get_by_username(&req.username)
        .await
        .map_err(internal("create user"))?
        .is_some()
    {
        return Err(ApiError::conflict("Username already exists"));
    }

    let hash = hash_password(&req.password)
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;
    let user = repo
        .create(&NewUser::new(req.username, hash))
        .await
        .map_err(internal("create user"))?;

    Ok(Json(ApiResponse::new(user.into())))
}

/// GET /api/users/:id - Get a user.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(user_id)
        .await
        .map_err(internal("get user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(user.into())))
}

/// PUT /api/users/:id - Update a user.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let repo = UserRepository::new(state.db.pool());

    let user = repo
        .get_by_id(user_id)
        .await
        .map_err(internal("update user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let mut update = UserUpdate::new();

    if let Some(username) = req.username.filter(|u| !u.is_empty()) {
        if let Some(existing) = repo
            .get_by_username(&username)
            .await
            .map_err(internal("update user"))?
        {
            if existing.id != user.id {
                return Err(ApiError::conflict("Username already exists"));
            }
        }
        update = update.with_username(username);
    }

    if let Some(password) = req.password.filter(|p| !p.is_empty()) {
        let hash = hash_password(&password)
            .map_err(|e| ApiError::unprocessable(e.to_string()))?;
        update = update.with_password(hash);
    }

    if !update.is_empty() {
        repo.update(user.id, &update)
            .await
            .map_err(internal("update user"))?;
    }

    let updated = repo
        .get_by_id(user.id)
        .await
        .map_err(internal("update user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(updated.into())))
}

/// DELETE /api/users/:id - Delete a user.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(_session): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = UserRepository::new(state.db.pool())
        .delete(user_id)
        .await
        .map_err(internal("delete user"))?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(ApiResponse::new(())))
}

fn internal(action: &'static str) -> impl Fn(crate::FeedmillError) -> ApiError {
    move |e| {
        tracing::error!("Failed to {}: {}", action, e);
        ApiError::internal(format!("Failed to {action}"))
    }
}
