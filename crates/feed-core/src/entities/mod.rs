//! Domain entities - core business objects

mod comment;
mod post;
mod reactions;
mod user;

pub use comment::{sort_for_thread, Comment};
pub use post::{validate_content, Post};
pub use reactions::{
    Reactable, ReactionInvariantError, ReactionTransition, Reactions, ToggleOutcome,
};
pub use user::{normalize_email, ProfileStats, User};
