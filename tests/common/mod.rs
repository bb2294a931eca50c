//! Test helpers for admin API integration tests.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::json;

use feedmill::config::FetchConfig;
use feedmill::feed::ActivityLog;
use feedmill::web::{create_health_router, create_router, AppState};
use feedmill::Database;

/// Create a test server over an in-memory database.
///
/// Cookies are persisted across requests so a login carries over.
pub async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let state = AppState::new(db.clone(), FetchConfig::default(), ActivityLog::new())
        .expect("Failed to create app state");

    let router = create_router(Arc::new(state)).merge(create_health_router());

    let mut server = TestServer::new(router).expect("Failed to create test server");
    server.save_cookies();

    (server, db)
}

/// Seed the default admin user and log the test client in.
pub async fn login_as_admin(server: &TestServer, db: &Database) {
    feedmill::seed::seed_admin_user(db)
        .await
        .expect("Failed to seed admin user");

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "username": "admin",
            "password": "password"
        }))
        .await;

    response.assert_status_ok();
}
