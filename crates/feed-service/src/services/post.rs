//! Post service - creating, reading, listing and deleting posts

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use feed_core::events::{PostCreatedEvent, PostDeletedEvent};
use feed_core::{
    validate_content, DomainError, DomainEvent, FeedQuery, FeedSort, Post, Snowflake, User,
};
use tracing::{info, instrument};

use crate::dto::{
    CreatePostRequest, FeedPageRequest, PaginatedResponse, PaginationMeta, PostResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        actor: Option<Snowflake>,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let author_id = actor.ok_or(DomainError::Unauthenticated)?;
        let content = validate_content(&request.content, self.ctx.feed_config().max_post_length)?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(author_id))?;

        let post = Post::new(self.ctx.generate_id(), author_id, content);
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");

        self.ctx
            .publish(DomainEvent::PostCreated(PostCreatedEvent {
                post_id: post.id,
                author_id,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(PostResponse::new(&post, Some(&author), actor))
    }

    #[instrument(skip(self))]
    pub async fn get_post(
        &self,
        post_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PostResponse> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        let author = self.ctx.user_repo().find_by_id(post.author_id).await?;
        Ok(PostResponse::new(&post, author.as_ref(), viewer))
    }

    /// The global feed
    #[instrument(skip(self, page))]
    pub async fn list_posts(
        &self,
        page: &FeedPageRequest,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        let query = page.to_query(self.ctx.feed_config())?;
        let posts = self.ctx.post_repo().list(query.clone()).await?;
        self.build_page(posts, &query, viewer).await
    }

    /// Posts written by one user
    #[instrument(skip(self, page))]
    pub async fn list_by_author(
        &self,
        author_id: Snowflake,
        page: &FeedPageRequest,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        if self.ctx.user_repo().find_by_id(author_id).await?.is_none() {
            return Err(DomainError::UserNotFound(author_id).into());
        }

        let query = page.to_query(self.ctx.feed_config())?;
        let posts = self
            .ctx
            .post_repo()
            .find_by_author(author_id, query.clone())
            .await?;
        self.build_page(posts, &query, viewer).await
    }

    /// Only the author may delete; comments go with the post
    #[instrument(skip(self))]
    pub async fn delete_post(&self, actor: Option<Snowflake>, post_id: Snowflake) -> ServiceResult<()> {
        let user_id = actor.ok_or(DomainError::Unauthenticated)?;

        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        if !post.is_author(user_id) {
            return Err(DomainError::NotPostAuthor.into());
        }

        self.ctx.post_repo().delete(post_id).await?;

        info!(post_id = %post_id, "Post deleted");

        self.ctx
            .publish(DomainEvent::PostDeleted(PostDeletedEvent {
                post_id,
                timestamp: Utc::now(),
            }))
            .await;

        Ok(())
    }

    async fn build_page(
        &self,
        posts: Vec<Post>,
        query: &FeedQuery,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PaginatedResponse<PostResponse>> {
        let has_more = i64::try_from(posts.len()).unwrap_or(i64::MAX) >= query.limit;
        let authors = load_authors(self.ctx, posts.iter().map(|p| p.author_id)).await?;

        let mut pagination = PaginationMeta {
            has_more,
            limit: query.limit,
            ..PaginationMeta::default()
        };
        if has_more {
            match query.sort {
                FeedSort::New => {
                    pagination.next_before = posts.last().map(|p| p.id.to_string());
                }
                FeedSort::Top => {
                    pagination.next_offset = Some(query.offset + query.limit);
                }
            }
        }

        let data = posts
            .iter()
            .map(|post| PostResponse::new(post, authors.get(&post.author_id), viewer))
            .collect();

        Ok(PaginatedResponse::new(data, pagination))
    }
}

/// Fetch each distinct author once. Authors that no longer exist are left
/// out and render without a username.
pub(crate) async fn load_authors(
    ctx: &ServiceContext,
    ids: impl IntoIterator<Item = Snowflake>,
) -> ServiceResult<HashMap<Snowflake, User>> {
    let ids: BTreeSet<Snowflake> = ids.into_iter().collect();
    let mut authors = HashMap::with_capacity(ids.len());
    for id in ids {
        if let Some(user) = ctx.user_repo().find_by_id(id).await? {
            authors.insert(id, user);
        }
    }
    Ok(authors)
}
