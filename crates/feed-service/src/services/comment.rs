//! Comment service

use chrono::Utc;
use feed_core::events::{CommentCreatedEvent, CommentDeletedEvent};
use feed_core::{validate_content, Comment, DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CommentResponse, CreateCommentRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::load_authors;

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        actor: Option<Snowflake>,
        post_id: Snowflake,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let author_id = actor.ok_or(DomainError::Unauthenticated)?;
        let content =
            validate_content(&request.content, self.ctx.feed_config().max_comment_length)?;

        self.ensure_post(post_id).await?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(author_id))?;

        let comment = Comment::new(self.ctx.generate_id(), post_id, author_id, content);
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");

        self.ctx
            .publish(DomainEvent::CommentCreated(CommentCreatedEvent {
                comment_id: comment.id,
                post_id,
                author_id,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(CommentResponse::new(&comment, Some(&author), actor))
    }

    /// The thread of a post: most liked first, oldest first among equals
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        post_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<Vec<CommentResponse>> {
        self.ensure_post(post_id).await?;

        let comments = self.ctx.comment_repo().find_by_post(post_id).await?;
        let authors = load_authors(self.ctx, comments.iter().map(|c| c.author_id)).await?;

        Ok(comments
            .iter()
            .map(|c| CommentResponse::new(c, authors.get(&c.author_id), viewer))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        actor: Option<Snowflake>,
        post_id: Snowflake,
        comment_id: Snowflake,
    ) -> ServiceResult<()> {
        let user_id = actor.ok_or(DomainError::Unauthenticated)?;

        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(post_id, comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;

        if !comment.is_author(user_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }

        self.ctx.comment_repo().delete(post_id, comment_id).await?;

        info!(comment_id = %comment_id, post_id = %post_id, "Comment deleted");

        self.ctx
            .publish(DomainEvent::CommentDeleted(CommentDeletedEvent {
                comment_id,
                post_id,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(())
    }

    async fn ensure_post(&self, post_id: Snowflake) -> ServiceResult<()> {
        match self.ctx.post_repo().find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::PostNotFound(post_id).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestHarness;
    use feed_core::{ReactableRef, ReactionIntent, ReactionRepository};

    fn request(content: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let harness = TestHarness::new();
        let ada = harness.user("ada").await;

        let err = CommentService::new(&harness.ctx)
            .create_comment(Some(ada), Snowflake::new(404), request("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_POST");
    }

    #[tokio::test]
    async fn test_anonymous_cannot_comment() {
        let harness = TestHarness::new();
        let ada = harness.user("ada").await;
        let post = harness.post(ada, "post").await;

        let err = CommentService::new(&harness.ctx)
            .create_comment(None, post, request("hi"))
            .await
            .unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn test_thread_order_follows_likes() {
        let harness = TestHarness::new();
        let ada = harness.user("ada").await;
        let bob = harness.user("bob").await;
        let post = harness.post(ada, "post").await;
        let service = CommentService::new(&harness.ctx);

        let first = service
            .create_comment(Some(bob), post, request("first"))
            .await
            .unwrap();
        let second = service
            .create_comment(Some(ada), post, request("second"))
            .await
            .unwrap();
        let third = service
            .create_comment(Some(bob), post, request("third"))
            .await
            .unwrap();

        let liked = Snowflake::parse(&third.id).unwrap();
        harness
            .store
            .toggle(ReactableRef::comment(post, liked), ada, ReactionIntent::Like)
            .await
            .unwrap();

        let thread = service.list_comments(post, Some(ada)).await.unwrap();
        let ids: Vec<_> = thread.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec![third.id, first.id, second.id]);
        assert_eq!(thread[0].reactions.likes, 1);
        assert_eq!(thread[1].author.username.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_only_author_deletes_comment() {
        let harness = TestHarness::new();
        let ada = harness.user("ada").await;
        let bob = harness.user("bob").await;
        let post = harness.post(ada, "post").await;
        let comment = harness.comment(post, bob, "mine").await;
        let service = CommentService::new(&harness.ctx);

        let err = service
            .delete_comment(Some(ada), post, comment)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_COMMENT_AUTHOR");

        service.delete_comment(Some(bob), post, comment).await.unwrap();
        assert!(service.list_comments(post, None).await.unwrap().is_empty());

        let again = service
            .delete_comment(Some(bob), post, comment)
            .await
            .unwrap_err();
        assert_eq!(again.status_code(), 404);
    }
}
