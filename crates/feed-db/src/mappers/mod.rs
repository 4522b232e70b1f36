//! Row <-> entity conversions
//!
//! Reaction columns are validated on the way in: a row that breaks the
//! invariants becomes `DomainError::CorruptReactions` rather than a silently
//! repaired entity.

mod post;
mod reactions;
mod user;

pub use post::{comment_from_model, post_from_model};
pub use reactions::{ids_to_column, reactions_from_row};
