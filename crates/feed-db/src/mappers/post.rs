use feed_core::{Comment, DomainError, Post, ReactableRef, Snowflake};

use super::reactions::reactions_from_row;
use crate::models::{CommentModel, PostModel, ReactionRowModel};

pub fn post_from_model(model: PostModel) -> Result<Post, DomainError> {
    let id = Snowflake::new(model.id);
    let reactions = reactions_from_row(
        ReactableRef::post(id),
        ReactionRowModel {
            like_count: model.like_count,
            dislike_count: model.dislike_count,
            liked_by: model.liked_by,
            disliked_by: model.disliked_by,
        },
    )?;

    Ok(Post {
        id,
        author_id: Snowflake::new(model.author_id),
        content: model.content,
        reactions,
        created_at: model.created_at,
    })
}

pub fn comment_from_model(model: CommentModel) -> Result<Comment, DomainError> {
    let id = Snowflake::new(model.id);
    let post_id = Snowflake::new(model.post_id);
    let reactions = reactions_from_row(
        ReactableRef::comment(post_id, id),
        ReactionRowModel {
            like_count: model.like_count,
            dislike_count: model.dislike_count,
            liked_by: model.liked_by,
            disliked_by: model.disliked_by,
        },
    )?;

    Ok(Comment {
        id,
        post_id,
        author_id: Snowflake::new(model.author_id),
        content: model.content,
        reactions,
        created_at: model.created_at,
    })
}
