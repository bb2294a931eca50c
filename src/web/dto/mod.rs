//! Request and response DTOs for the admin API.

mod request;
mod response;

pub use request::{
    CreateFeedRequest, CreateUserRequest, ItemListQuery, LoginRequest, PaginationQuery,
    UpdateUserRequest,
};
pub use response::{
    ActivityResponse, ApiResponse, FeedResponse, FetchStateResponse, InfoResponse, IngestResponse,
    ItemResponse, PaginatedResponse, PaginationMeta, SeedResponse, UserResponse,
};
