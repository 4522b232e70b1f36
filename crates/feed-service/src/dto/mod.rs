//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers from domain entities to response DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, CreatePostRequest, FeedPageRequest, LoginRequest, LogoutRequest, RefreshTokenRequest,
    RegisterRequest, UpdateUserRequest,
};

pub use responses::{
    AuthResponse, AuthorResponse, CommentResponse, CurrentProfileResponse, CurrentUserResponse,
    HealthChecks, HealthResponse, PaginatedResponse, PaginationMeta, PostResponse,
    ProfileResponse, ProfileStatsResponse, ReactionSummary, ReactionToggleResponse,
    ReadinessResponse, UserResponse,
};
