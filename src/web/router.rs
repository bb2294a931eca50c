//! Router configuration for the admin API.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{auth, feeds, items, system, users, AppState};
use super::middleware::session_auth;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let sessions = app_state.sessions.clone();

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let feed_routes = Router::new()
        .route(
            "/",
            get(feeds::list_feeds)
                .post(feeds::create_feed)
                .delete(feeds::delete_all_feeds),
        )
        .route("/seed", post(feeds::seed_default_feeds))
        .route("/fetch", post(feeds::fetch_all_feeds))
        .route("/:id", delete(feeds::delete_feed))
        .route("/:id/fetch", post(feeds::fetch_feed));

    let item_routes = Router::new()
        .route("/", get(items::list_items).delete(items::delete_all_items))
        .route("/fetch", post(items::fetch_items))
        .route("/:id", get(items::get_item));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/feeds", feed_routes)
        .nest("/items", item_routes)
        .route("/activity", get(system::activity))
        .route("/info", get(system::info));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(move |req, next| {
                    let store = sessions.clone();
                    session_auth(store, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Serve sandbox feed fixtures used by browser-level test suites.
pub fn create_fixture_router(fixtures_path: &str) -> Router {
    Router::new().nest_service("/test_feeds", ServeDir::new(fixtures_path))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
