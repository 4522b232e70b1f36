//! Axum extractors for request handling
//!
//! Bearer authentication, validated JSON bodies, typed path ids and feed
//! paging parameters.

mod auth;
mod page;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use page::FeedPage;
pub use path::{CommentPath, CommentReactionPath, PostPath, PostReactionPath, UserPath};
pub use validated::ValidatedJson;
