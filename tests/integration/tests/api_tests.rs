//! API integration tests
//!
//! These tests need a running PostgreSQL and Redis, reachable through
//! DATABASE_URL and REDIS_URL (JWT_SECRET as usual). Without them every
//! test returns early.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

/// Register a fresh account and return its session
async fn signup(server: &TestServer) -> AuthResponse {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn publish(server: &TestServer, token: &str, content: &str) -> PostResponse {
    let response = server
        .post_auth("/posts", token, &ContentRequest::new(content))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn press(server: &TestServer, token: &str, path: &str) -> ReactionToggleResponse {
    let response = server.put_auth(path, token).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "healthy");
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_register_and_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(auth.user.username, request.name);
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.token_type, "Bearer");

    let response = server
        .post("/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(login.user.id, auth.user.id);
    assert!(!login.access_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "EMAIL_ALREADY_EXISTS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let login = LoginRequest {
        email: request.email,
        password: "not-the-password-1".to_string(),
    };
    let response = server.post("/auth/login", &login).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_then_logout() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server).await;

    let refresh = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/auth/refresh", &refresh).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // the old refresh token was consumed by the rotation
    let response = server.post("/auth/refresh", &refresh).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post_auth(
            "/auth/logout",
            &rotated.access_token,
            &RefreshTokenRequest {
                refresh_token: rotated.refresh_token.clone(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post(
            "/auth/refresh",
            &RefreshTokenRequest {
                refresh_token: rotated.refresh_token,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_profile_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/users/@me").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/users/@me", "not-a-jwt").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();
}

// ============================================================================
// Posts and comments
// ============================================================================

#[tokio::test]
async fn test_create_post_requires_sign_in() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/posts", &ContentRequest::new("anonymous"))
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_blank_post_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server).await;
    let response = server
        .post_auth("/posts", &auth.access_token, &ContentRequest::new("   "))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_post_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = signup(&server).await;
    let bob = signup(&server).await;

    let post = publish(&server, &alice.access_token, "first light").await;
    assert_eq!(post.author.id, alice.user.id);
    assert_eq!(post.author.username.as_deref(), Some(alice.user.username.as_str()));
    assert_eq!(post.reactions.likes, 0);

    let response = server.get(&format!("/posts/{}", post.id)).await.unwrap();
    let fetched: PostResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.content, "first light");
    assert!(fetched.reactions.me.is_none());

    let path = format!("/posts/{}", post.id);
    let response = server.delete_auth(&path, &bob.access_token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_POST_AUTHOR")
        .await
        .unwrap();

    let response = server.delete_auth(&path, &alice.access_token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_POST")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_author_posts_are_newest_first() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = signup(&server).await;
    let first = publish(&server, &auth.access_token, "one").await;
    let second = publish(&server, &auth.access_token, "two").await;
    let third = publish(&server, &auth.access_token, "three").await;

    let path = format!("/users/{}/posts?limit=2", auth.user.id);
    let response = server.get(&path).await.unwrap();
    let page: Page<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<_> = page.data.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, [third.id.as_str(), second.id.as_str()]);
    assert!(page.pagination.has_more);
    assert_eq!(page.pagination.limit, 2);

    let before = page.pagination.next_before.expect("cursor for the next page");
    let path = format!("/users/{}/posts?limit=2&before={before}", auth.user.id);
    let response = server.get(&path).await.unwrap();
    let page: Page<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, first.id);
}

#[tokio::test]
async fn test_unknown_sort_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/posts?sort=sideways").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_comment_thread() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = signup(&server).await;
    let bob = signup(&server).await;
    let post = publish(&server, &alice.access_token, "thread").await;
    let comments_path = format!("/posts/{}/comments", post.id);

    let response = server
        .post_auth(&comments_path, &bob.access_token, &ContentRequest::new("early"))
        .await
        .unwrap();
    let early: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(early.post_id, post.id);

    let response = server
        .post_auth(&comments_path, &alice.access_token, &ContentRequest::new("late"))
        .await
        .unwrap();
    let late: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // a like lifts the later comment above the earlier one
    press(
        &server,
        &bob.access_token,
        &format!("{comments_path}/{}/reactions/like", late.id),
    )
    .await;

    let response = server.get(&comments_path).await.unwrap();
    let thread: Vec<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let ids: Vec<_> = thread.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, [late.id.as_str(), early.id.as_str()]);
    assert_eq!(thread[0].reactions.likes, 1);

    let response = server
        .delete_auth(&format!("{comments_path}/{}", early.id), &alice.access_token)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_COMMENT_AUTHOR")
        .await
        .unwrap();

    let response = server
        .delete_auth(&format!("{comments_path}/{}", early.id), &bob.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&comments_path).await.unwrap();
    let thread: Vec<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].author.id, alice.user.id);
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle_sequence() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = signup(&server).await;
    let bob = signup(&server).await;
    let post = publish(&server, &alice.access_token, "vote on me").await;
    let like = format!("/posts/{}/reactions/like", post.id);
    let dislike = format!("/posts/{}/reactions/dislike", post.id);

    let r = press(&server, &alice.access_token, &like).await;
    assert_eq!((r.likes, r.dislikes, r.me.as_str()), (1, 0, "liked"));

    let r = press(&server, &alice.access_token, &dislike).await;
    assert_eq!((r.likes, r.dislikes), (0, 1));
    assert_eq!((r.previous.as_str(), r.me.as_str()), ("liked", "disliked"));

    let r = press(&server, &bob.access_token, &like).await;
    assert_eq!((r.likes, r.dislikes, r.score), (1, 1, 0));

    let r = press(&server, &alice.access_token, &dislike).await;
    assert_eq!((r.likes, r.dislikes, r.me.as_str()), (1, 0, "none"));

    let path = format!("/posts/{}/reactions", post.id);
    let response = server.get_auth(&path, &bob.access_token).await.unwrap();
    let summary: ReactionSummary = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((summary.likes, summary.dislikes), (1, 0));
    assert_eq!(summary.me.as_deref(), Some("liked"));
}

#[tokio::test]
async fn test_reaction_without_sign_in_changes_nothing() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = signup(&server).await;
    let post = publish(&server, &alice.access_token, "hands off").await;
    press(
        &server,
        &alice.access_token,
        &format!("/posts/{}/reactions/like", post.id),
    )
    .await;

    let response = server
        .put(&format!("/posts/{}/reactions/dislike", post.id))
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED")
        .await
        .unwrap();

    let response = server
        .get(&format!("/posts/{}/reactions", post.id))
        .await
        .unwrap();
    let summary: ReactionSummary = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((summary.likes, summary.dislikes), (1, 0));
    assert!(summary.me.is_none());
}

#[tokio::test]
async fn test_reaction_on_missing_target() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = signup(&server).await;

    let response = server
        .put_auth("/posts/1/reactions/like", &alice.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let post = publish(&server, &alice.access_token, "real").await;
    let response = server
        .put_auth(
            &format!("/posts/{}/reactions/shrug", post.id),
            &alice.access_token,
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_likes_all_count() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = signup(&server).await;
    let post = publish(&server, &author.access_token, "popular").await;

    let mut voters = Vec::new();
    for _ in 0..8 {
        voters.push(signup(&server).await);
    }

    let like = format!("/posts/{}/reactions/like", post.id);
    let handles: Vec<_> = voters
        .iter()
        .map(|voter| {
            let request = server
                .client
                .put(server.url(&like))
                .bearer_auth(&voter.access_token);
            tokio::spawn(async move { request.send().await.map(|r| r.status()) })
        })
        .collect();
    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap().unwrap());
    }

    // a press that lost a serialization race reports 409 and may be retried
    let mut conflicts = Vec::new();
    for (voter, status) in voters.iter().zip(statuses) {
        match status {
            StatusCode::OK => {}
            StatusCode::CONFLICT => conflicts.push(voter),
            other => panic!("unexpected status {other}"),
        }
    }
    for voter in conflicts {
        press(&server, &voter.access_token, &like).await;
    }

    let response = server
        .get(&format!("/posts/{}/reactions", post.id))
        .await
        .unwrap();
    let summary: ReactionSummary = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(summary.likes, 8);
    assert_eq!(summary.dislikes, 0);
}

#[tokio::test]
async fn test_profile_counts_received_likes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = signup(&server).await;
    let bob = signup(&server).await;
    let post = publish(&server, &alice.access_token, "count me").await;
    press(
        &server,
        &bob.access_token,
        &format!("/posts/{}/reactions/like", post.id),
    )
    .await;

    let response = server
        .get(&format!("/users/{}", alice.user.id))
        .await
        .unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.id, alice.user.id);
    assert_eq!(profile.username, alice.user.username);
    assert_eq!(profile.stats.post_count, 1);
    assert_eq!(profile.stats.comment_count, 0);
    assert_eq!(profile.stats.total_likes, 1);
}
