//! Route definitions, mounted under /api/v1

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, comments, events, health, posts, reactions, users};
use crate::state::AppState;

/// API routes (rate limited)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health routes, mounted outside the rate limiter
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes())
        .merge(event_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/@me/posts", get(users::get_current_user_posts))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/posts", get(users::get_user_posts))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:post_id",
            get(posts::get_post).delete(posts::delete_post),
        )
        // Comments
        .route(
            "/posts/:post_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            delete(comments::delete_comment),
        )
        // Reactions
        .route(
            "/posts/:post_id/reactions",
            get(reactions::get_post_reactions),
        )
        .route(
            "/posts/:post_id/reactions/:reaction",
            put(reactions::toggle_post_reaction),
        )
        .route(
            "/posts/:post_id/comments/:comment_id/reactions",
            get(reactions::get_comment_reactions),
        )
        .route(
            "/posts/:post_id/comments/:comment_id/reactions/:reaction",
            put(reactions::toggle_comment_reaction),
        )
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/feed/events", get(events::feed_events))
        .route("/posts/:post_id/events", get(events::post_events))
}
