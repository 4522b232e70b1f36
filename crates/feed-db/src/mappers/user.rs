use feed_core::{ProfileStats, Snowflake, User};

use crate::models::{ProfileStatsModel, UserModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ProfileStatsModel> for ProfileStats {
    fn from(model: ProfileStatsModel) -> Self {
        ProfileStats {
            post_count: model.post_count,
            comment_count: model.comment_count,
            total_likes: model.total_likes,
        }
    }
}
