//! Middleware for the admin API.

mod auth;

pub use auth::{session_auth, AuthUser, SessionUser};
