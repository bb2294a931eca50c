//! Authentication for Feedmill.
//!
//! Password hashing and session management for the admin API.

mod password;
mod session;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use session::{
    AuthSession, SessionStore, DEFAULT_SESSION_DURATION_SECS, SESSION_COOKIE,
};
