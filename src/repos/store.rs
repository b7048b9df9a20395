//! Storage interface used by handlers.
//!
//! Handlers only see these traits. `PgUserRepo` / `PgPostRepo` implement them against
//! PostgreSQL; tests use the in-memory store.
//!
//! Implementations must be cheap to share (`Arc<dyn ...>` in `AppState`).
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub nick: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub nick: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile fields replaced by `PUT /users/{user_id}` (password excluded).
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub name: String,
    pub nick: String,
    pub email: String,
}

/// Minimal data needed by login.
#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub user_id: u64,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author_id: u64,
    pub author_nick: String,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PostContent {
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> RepoResult<User>;

    /// Case-insensitive substring match on name or nick.
    async fn search(&self, name_or_nick: &str) -> RepoResult<Vec<User>>;

    async fn get(&self, user_id: u64) -> RepoResult<Option<User>>;

    // Returns false when the user does not exist.
    async fn update_profile(&self, user_id: u64, profile: UserProfile) -> RepoResult<bool>;

    async fn delete(&self, user_id: u64) -> RepoResult<bool>;

    async fn find_login_by_email(&self, email: &str) -> RepoResult<Option<LoginRecord>>;

    async fn fetch_password_hash(&self, user_id: u64) -> RepoResult<Option<String>>;

    async fn update_password_hash(&self, user_id: u64, password_hash: &str) -> RepoResult<bool>;

    /// `follower_id` starts following `user_id`. Idempotent.
    async fn follow(&self, user_id: u64, follower_id: u64) -> RepoResult<()>;

    /// `follower_id` stops following `user_id`. Idempotent.
    async fn unfollow(&self, user_id: u64, follower_id: u64) -> RepoResult<()>;

    async fn followers(&self, user_id: u64) -> RepoResult<Vec<User>>;

    async fn following(&self, user_id: u64) -> RepoResult<Vec<User>>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, author_id: u64, content: PostContent) -> RepoResult<Post>;

    async fn get(&self, post_id: u64) -> RepoResult<Option<Post>>;

    /// Owner recorded at creation time, `None` when the post does not exist.
    async fn fetch_owner(&self, post_id: u64) -> RepoResult<Option<u64>>;

    /// Posts by `user_id` and by everyone `user_id` follows, newest first.
    async fn feed(&self, user_id: u64) -> RepoResult<Vec<Post>>;

    async fn list_by_author(&self, author_id: u64) -> RepoResult<Vec<Post>>;

    async fn update(&self, post_id: u64, content: PostContent) -> RepoResult<bool>;

    async fn delete(&self, post_id: u64) -> RepoResult<bool>;

    async fn like(&self, post_id: u64) -> RepoResult<bool>;

    /// Never goes below zero.
    async fn unlike(&self, post_id: u64) -> RepoResult<bool>;
}
