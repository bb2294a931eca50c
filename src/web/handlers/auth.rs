//! Authentication handlers.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::Arc;

use crate::auth::{verify_password, SESSION_COOKIE};
use crate::db::UserRepository;
use crate::web::dto::{ApiResponse, LoginRequest, UserResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/auth/login - User login.
///
/// On success sets the session cookie and returns the user.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserResponse>>), ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = UserRepository::new(state.db.pool())
        .get_by_username(&req.username)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {}", e);
            ApiError::internal("Login failed")
        })?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    verify_password(&req.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    let session = state.sessions.create(user.id, &user.username);

    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Json(ApiResponse::new(user.into()))))
}

/// POST /api/auth/logout - End the current session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Json(ApiResponse::new(())))
}

/// GET /api/auth/me - The logged-in user.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(session.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user: {}", e);
            ApiError::internal("Failed to load user")
        })?;

    match user {
        Some(user) => Ok(Json(ApiResponse::new(user.into()))),
        None => {
            // Account deleted while the session was live
            state.sessions.remove(&session.token);
            Err(ApiError::unauthorized("Invalid or expired session"))
        }
    }
}
