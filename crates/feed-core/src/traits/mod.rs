mod ports;
mod repositories;

pub use ports::{EventPublisher, RefreshSession, SessionStore};
pub use repositories::{
    CommentRepository, FeedQuery, FeedSort, PostRepository, ReactionRepository, RepoResult,
    UserRepository,
};
