//! In-memory stores for service tests.
//!
//! One mutex guards every table, and `toggle` holds it across the whole
//! read-compute-write, the same guarantee the row lock gives in PostgreSQL.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use feed_common::{FeedConfig, JwtService};
use feed_core::{
    sort_for_thread, Comment, CommentRepository, DomainError, DomainEvent, EventPublisher,
    FeedQuery, FeedSort, Post, PostRepository, ProfileStats, Reactable, ReactableRef,
    ReactionIntent, ReactionRepository, RefreshSession, RepoResult, SessionStore, Snowflake,
    SnowflakeGenerator, ToggleOutcome, User, UserRepository,
};
use parking_lot::Mutex;

use super::context::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct Tables {
    users: HashMap<Snowflake, (User, String)>,
    posts: BTreeMap<Snowflake, Post>,
    comments: BTreeMap<Snowflake, Comment>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn page(mut posts: Vec<Post>, query: &FeedQuery) -> Vec<Post> {
        let limit = usize::try_from(query.limit.max(1)).unwrap_or(1);
        match query.sort {
            FeedSort::New => {
                posts.retain(|p| query.before.map_or(true, |before| p.id < before));
                posts.sort_by(|a, b| b.id.cmp(&a.id));
                posts.into_iter().take(limit).collect()
            }
            FeedSort::Top => {
                posts.sort_by(|a, b| {
                    b.reactions
                        .net_score()
                        .cmp(&a.reactions.net_score())
                        .then(b.id.cmp(&a.id))
                });
                let offset = usize::try_from(query.offset).unwrap_or(0);
                posts.into_iter().skip(offset).take(limit).collect()
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.tables.lock().users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self
            .tables
            .lock()
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(UserRepository::find_by_email(self, email).await?.is_some())
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        if tables.users.values().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        tables
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        if tables
            .users
            .values()
            .any(|(u, _)| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::EmailAlreadyExists);
        }
        let entry = tables
            .users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        entry.0 = user.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.tables.lock().users.get(&id).map(|(_, h)| h.clone()))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        let entry = tables
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        entry.1 = password_hash.to_string();
        Ok(())
    }

    async fn profile_stats(&self, id: Snowflake) -> RepoResult<ProfileStats> {
        let tables = self.tables.lock();
        let posts = tables.posts.values().filter(|p| p.author_id == id);
        let comments = tables.comments.values().filter(|c| c.author_id == id);
        let (post_count, post_likes) = posts.fold((0, 0), |(n, likes), p| {
            (n + 1, likes + p.reactions.like_count())
        });
        let (comment_count, comment_likes) = comments.fold((0, 0), |(n, likes), c| {
            (n + 1, likes + c.reactions.like_count())
        });
        Ok(ProfileStats {
            post_count,
            comment_count,
            total_likes: post_likes + comment_likes,
        })
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.tables.lock().posts.get(&id).cloned())
    }

    async fn list(&self, query: FeedQuery) -> RepoResult<Vec<Post>> {
        let posts = self.tables.lock().posts.values().cloned().collect();
        Ok(Self::page(posts, &query))
    }

    async fn find_by_author(&self, author_id: Snowflake, query: FeedQuery) -> RepoResult<Vec<Post>> {
        let posts = self
            .tables
            .lock()
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::page(posts, &query))
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.tables.lock().posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        tables
            .posts
            .remove(&id)
            .ok_or(DomainError::PostNotFound(id))?;
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_id(
        &self,
        post_id: Snowflake,
        comment_id: Snowflake,
    ) -> RepoResult<Option<Comment>> {
        Ok(self
            .tables
            .lock()
            .comments
            .get(&comment_id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }

    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .tables
            .lock()
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        sort_for_thread(&mut comments);
        Ok(comments)
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn delete(&self, post_id: Snowflake, comment_id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.lock();
        match tables.comments.get(&comment_id) {
            Some(c) if c.post_id == post_id => {
                tables.comments.remove(&comment_id);
                Ok(())
            }
            _ => Err(DomainError::CommentNotFound(comment_id)),
        }
    }
}

#[async_trait]
impl ReactionRepository for InMemoryStore {
    async fn find(&self, target: ReactableRef) -> RepoResult<Option<Reactable>> {
        let tables = self.tables.lock();
        let reactions = match target {
            ReactableRef::Post { post_id } => tables.posts.get(&post_id).map(|p| &p.reactions),
            ReactableRef::Comment {
                post_id,
                comment_id,
            } => tables
                .comments
                .get(&comment_id)
                .filter(|c| c.post_id == post_id)
                .map(|c| &c.reactions),
        };
        Ok(reactions.map(|r| Reactable::new(target, r.clone())))
    }

    async fn toggle(
        &self,
        target: ReactableRef,
        user_id: Snowflake,
        intent: ReactionIntent,
    ) -> RepoResult<ToggleOutcome> {
        let mut tables = self.tables.lock();
        let reactions = match target {
            ReactableRef::Post { post_id } => {
                tables.posts.get_mut(&post_id).map(|p| &mut p.reactions)
            }
            ReactableRef::Comment {
                post_id,
                comment_id,
            } => tables
                .comments
                .get_mut(&comment_id)
                .filter(|c| c.post_id == post_id)
                .map(|c| &mut c.reactions),
        }
        .ok_or(DomainError::ReactableNotFound(target))?;

        let transition = reactions.toggle(user_id, intent);
        Ok(ToggleOutcome {
            reactable: Reactable::new(target, reactions.clone()),
            user_id,
            intent,
            transition,
        })
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, RefreshSession>>,
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn store(&self, token: &str, session: &RefreshSession, _ttl: u64) -> RepoResult<()> {
        self.sessions
            .lock()
            .insert(token.to_string(), session.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> RepoResult<Option<RefreshSession>> {
        Ok(self.sessions.lock().get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> RepoResult<bool> {
        Ok(self.sessions.lock().remove(token).is_some())
    }

    async fn revoke_all(&self, user_id: Snowflake) -> RepoResult<u32> {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok(u32::try_from(before - sessions.len()).unwrap_or(u32::MAX))
    }
}

/// Keeps every published event; can be switched to fail
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("connection refused".into()));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}

pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub store: Arc<InMemoryStore>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_feed_config(FeedConfig::default())
    }

    pub fn with_feed_config(feed_config: FeedConfig) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let publisher = Arc::new(RecordingPublisher::default());

        let ctx = ServiceContextBuilder::new()
            .user_repo(store.clone())
            .post_repo(store.clone())
            .comment_repo(store.clone())
            .reaction_repo(store.clone())
            .session_store(Arc::new(InMemorySessions::default()))
            .publisher(publisher.clone())
            .jwt_service(Arc::new(JwtService::new(
                "test-secret-that-is-long-enough-32b",
                900,
                2_592_000,
                86_400,
            )))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .feed_config(feed_config)
            .build()
            .expect("all dependencies provided");

        Self {
            ctx: Arc::new(ctx),
            store,
            publisher,
        }
    }

    /// Insert a user directly, skipping password hashing
    pub async fn user(&self, name: &str) -> Snowflake {
        let user = User::new(
            self.ctx.generate_id(),
            name.to_string(),
            format!("{name}@example.com"),
        );
        UserRepository::create(self.store.as_ref(), &user, "unused")
            .await
            .expect("insert user");
        user.id
    }

    pub async fn post(&self, author: Snowflake, content: &str) -> Snowflake {
        let post = Post::new(self.ctx.generate_id(), author, content.to_string());
        PostRepository::create(self.store.as_ref(), &post)
            .await
            .expect("insert post");
        post.id
    }

    pub async fn comment(&self, post_id: Snowflake, author: Snowflake, content: &str) -> Snowflake {
        let comment = Comment::new(self.ctx.generate_id(), post_id, author, content.to_string());
        CommentRepository::create(self.store.as_ref(), &comment)
            .await
            .expect("insert comment");
        comment.id
    }
}
