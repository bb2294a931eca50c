//! Request DTOs for the admin API.

use serde::Deserialize;
use validator::Validate;

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Create-user request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username.
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    /// Plaintext password; hashed before storage.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Update-user request; empty fields are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateUserRequest {
    /// New username.
    pub username: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
}

/// Create-feed request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedRequest {
    /// Subscription URL.
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}

/// Pagination query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    50
}

/// Maximum page size.
const MAX_PER_PAGE: u32 = 100;

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationQuery {
    /// Convert to (offset, limit), clamping out-of-range values.
    pub fn to_offset_limit(self) -> (usize, usize) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        let offset = (page - 1) as usize * per_page as usize;
        (offset, per_page as usize)
    }
}

/// Item listing query parameters.
///
/// Pagination fields are inlined rather than flattened; serde_urlencoded
/// cannot deserialize numbers through a flattened struct.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ItemListQuery {
    /// Restrict to one feed.
    pub feed_id: Option<i64>,
    /// Page number, starting at 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for ItemListQuery {
    fn default() -> Self {
        Self {
            feed_id: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl ItemListQuery {
    /// The pagination part of the query.
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
