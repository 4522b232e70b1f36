//! Like/dislike state carried by every post and comment, and the toggle that
//! moves it.
//!
//! Invariants maintained by every constructor and by [`Reactions::toggle`]:
//! - no user is in both `liked_by` and `disliked_by`
//! - `like_count == |liked_by|` and `dislike_count == |disliked_by|`

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ReactableRef, ReactionIntent, ReactionState, Snowflake};

/// Raised when persisted reaction data does not satisfy the invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReactionInvariantError {
    #[error("user {0} both likes and dislikes")]
    Overlap(Snowflake),

    #[error("{intent} count is {count} but {members} users are recorded")]
    CountMismatch {
        intent: ReactionIntent,
        count: i64,
        members: usize,
    },

    #[error("user {0} appears more than once")]
    Duplicate(Snowflake),
}

/// A user's state before and after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionTransition {
    pub previous: ReactionState,
    pub current: ReactionState,
}

impl ReactionTransition {
    /// The user took back their vote
    pub fn is_retraction(&self) -> bool {
        self.previous != ReactionState::None && self.current == ReactionState::None
    }

    /// The user flipped from like to dislike or back
    pub fn is_switch(&self) -> bool {
        self.previous != ReactionState::None
            && self.current != ReactionState::None
            && self.previous != self.current
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawReactions")]
pub struct Reactions {
    like_count: i64,
    dislike_count: i64,
    liked_by: BTreeSet<Snowflake>,
    disliked_by: BTreeSet<Snowflake>,
}

#[derive(Deserialize)]
struct RawReactions {
    like_count: i64,
    dislike_count: i64,
    liked_by: Vec<Snowflake>,
    disliked_by: Vec<Snowflake>,
}

impl TryFrom<RawReactions> for Reactions {
    type Error = ReactionInvariantError;

    fn try_from(raw: RawReactions) -> Result<Self, Self::Error> {
        Self::from_parts(raw.like_count, raw.dislike_count, raw.liked_by, raw.disliked_by)
    }
}

impl Reactions {
    /// Fresh state: nobody has reacted
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored columns, checking every invariant.
    pub fn from_parts(
        like_count: i64,
        dislike_count: i64,
        liked_by: impl IntoIterator<Item = Snowflake>,
        disliked_by: impl IntoIterator<Item = Snowflake>,
    ) -> Result<Self, ReactionInvariantError> {
        let liked_by = collect_unique(liked_by)?;
        let disliked_by = collect_unique(disliked_by)?;

        if let Some(both) = liked_by.intersection(&disliked_by).next() {
            return Err(ReactionInvariantError::Overlap(*both));
        }
        check_count(ReactionIntent::Like, like_count, &liked_by)?;
        check_count(ReactionIntent::Dislike, dislike_count, &disliked_by)?;

        Ok(Self {
            like_count,
            dislike_count,
            liked_by,
            disliked_by,
        })
    }

    #[inline]
    pub fn like_count(&self) -> i64 {
        self.like_count
    }

    #[inline]
    pub fn dislike_count(&self) -> i64 {
        self.dislike_count
    }

    /// Likes minus dislikes; may be negative. Display ordering only.
    #[inline]
    pub fn net_score(&self) -> i64 {
        self.like_count - self.dislike_count
    }

    pub fn liked_by(&self) -> &BTreeSet<Snowflake> {
        &self.liked_by
    }

    pub fn disliked_by(&self) -> &BTreeSet<Snowflake> {
        &self.disliked_by
    }

    pub fn state_of(&self, user_id: Snowflake) -> ReactionState {
        if self.liked_by.contains(&user_id) {
            ReactionState::Liked
        } else if self.disliked_by.contains(&user_id) {
            ReactionState::Disliked
        } else {
            ReactionState::None
        }
    }

    /// Apply one press of the like or dislike button by `user_id`.
    ///
    /// Pressing the same button twice retracts the vote, pressing the other
    /// button moves the vote across. Each call touches each set at most once.
    pub fn toggle(&mut self, user_id: Snowflake, intent: ReactionIntent) -> ReactionTransition {
        let previous = self.state_of(user_id);

        let (own, own_count, other, other_count) = match intent {
            ReactionIntent::Like => (
                &mut self.liked_by,
                &mut self.like_count,
                &mut self.disliked_by,
                &mut self.dislike_count,
            ),
            ReactionIntent::Dislike => (
                &mut self.disliked_by,
                &mut self.dislike_count,
                &mut self.liked_by,
                &mut self.like_count,
            ),
        };

        if own.remove(&user_id) {
            *own_count -= 1;
        } else {
            if other.remove(&user_id) {
                *other_count -= 1;
            }
            own.insert(user_id);
            *own_count += 1;
        }

        let transition = ReactionTransition {
            previous,
            current: self.state_of(user_id),
        };
        debug_assert_eq!(transition.current, previous.next(intent));
        transition
    }

    /// Non-mutating form of [`Reactions::toggle`]
    pub fn toggled(&self, user_id: Snowflake, intent: ReactionIntent) -> (Self, ReactionTransition) {
        let mut next = self.clone();
        let transition = next.toggle(user_id, intent);
        (next, transition)
    }

    /// Re-check the invariants. Cheap enough to call after every write.
    pub fn validate(&self) -> Result<(), ReactionInvariantError> {
        if let Some(both) = self.liked_by.intersection(&self.disliked_by).next() {
            return Err(ReactionInvariantError::Overlap(*both));
        }
        check_count(ReactionIntent::Like, self.like_count, &self.liked_by)?;
        check_count(ReactionIntent::Dislike, self.dislike_count, &self.disliked_by)
    }
}

fn collect_unique(
    ids: impl IntoIterator<Item = Snowflake>,
) -> Result<BTreeSet<Snowflake>, ReactionInvariantError> {
    let mut set = BTreeSet::new();
    for id in ids {
        if !set.insert(id) {
            return Err(ReactionInvariantError::Duplicate(id));
        }
    }
    Ok(set)
}

fn check_count(
    intent: ReactionIntent,
    count: i64,
    members: &BTreeSet<Snowflake>,
) -> Result<(), ReactionInvariantError> {
    if usize::try_from(count).ok() == Some(members.len()) {
        Ok(())
    } else {
        Err(ReactionInvariantError::CountMismatch {
            intent,
            count,
            members: members.len(),
        })
    }
}

/// Snapshot of one post or comment's reactions, as pushed to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactable {
    pub target: ReactableRef,
    pub reactions: Reactions,
}

impl Reactable {
    pub fn new(target: ReactableRef, reactions: Reactions) -> Self {
        Self { target, reactions }
    }
}

/// Result of one committed toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub reactable: Reactable,
    pub user_id: Snowflake,
    pub intent: ReactionIntent,
    pub transition: ReactionTransition,
}
