//! Repository implementations

mod comment;
mod error;
mod post;
mod reaction;
mod user;

pub use comment::PgCommentRepository;
pub use post::PgPostRepository;
pub use reaction::PgReactionRepository;
pub use user::PgUserRepository;
