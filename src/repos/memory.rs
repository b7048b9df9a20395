//! In-memory `UserStore` + `PostStore` for router tests.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{
    LoginRecord, NewUser, Post, PostContent, PostStore, User, UserProfile, UserStore,
};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    next_user_id: u64,
    next_post_id: u64,
    users: BTreeMap<u64, StoredUser>,
    posts: BTreeMap<u64, Post>,
    // (user_id, follower_id)
    followers: BTreeSet<(u64, u64)>,
}

impl Tables {
    fn nick_of(&self, user_id: u64) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.user.nick.clone())
            .unwrap_or_default()
    }

    fn taken(&self, except: Option<u64>, nick: &str, email: &str) -> bool {
        self.users.values().any(|u| {
            Some(u.user.id) != except && (u.user.nick == nick || u.user.email == email)
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn is_following(&self, user_id: u64, follower_id: u64) -> bool {
        self.lock().followers.contains(&(user_id, follower_id))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new: NewUser) -> RepoResult<User> {
        let mut t = self.lock();
        if t.taken(None, &new.nick, &new.email) {
            return Err(RepoError::Conflict);
        }
        t.next_user_id += 1;
        let user = User {
            id: t.next_user_id,
            name: new.name,
            nick: new.nick,
            email: new.email,
            created_at: Utc::now(),
        };
        t.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(user)
    }

    async fn search(&self, name_or_nick: &str) -> RepoResult<Vec<User>> {
        let needle = name_or_nick.to_lowercase();
        Ok(self
            .lock()
            .users
            .values()
            .filter(|u| {
                u.user.name.to_lowercase().contains(&needle)
                    || u.user.nick.to_lowercase().contains(&needle)
            })
            .map(|u| u.user.clone())
            .collect())
    }

    async fn get(&self, user_id: u64) -> RepoResult<Option<User>> {
        Ok(self.lock().users.get(&user_id).map(|u| u.user.clone()))
    }

    async fn update_profile(&self, user_id: u64, profile: UserProfile) -> RepoResult<bool> {
        let mut t = self.lock();
        if t.taken(Some(user_id), &profile.nick, &profile.email) {
            return Err(RepoError::Conflict);
        }
        let Some(stored) = t.users.get_mut(&user_id) else {
            return Ok(false);
        };
        stored.user.name = profile.name;
        stored.user.nick = profile.nick;
        stored.user.email = profile.email;
        Ok(true)
    }

    async fn delete(&self, user_id: u64) -> RepoResult<bool> {
        let mut t = self.lock();
        let existed = t.users.remove(&user_id).is_some();
        t.posts.retain(|_, p| p.author_id != user_id);
        t.followers
            .retain(|&(user, follower)| user != user_id && follower != user_id);
        Ok(existed)
    }

    async fn find_login_by_email(&self, email: &str) -> RepoResult<Option<LoginRecord>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| LoginRecord {
                user_id: u.user.id,
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn fetch_password_hash(&self, user_id: u64) -> RepoResult<Option<String>> {
        Ok(self
            .lock()
            .users
            .get(&user_id)
            .map(|u| u.password_hash.clone()))
    }

    async fn update_password_hash(&self, user_id: u64, password_hash: &str) -> RepoResult<bool> {
        let mut t = self.lock();
        let Some(stored) = t.users.get_mut(&user_id) else {
            return Ok(false);
        };
        stored.password_hash = password_hash.to_string();
        Ok(true)
    }

    async fn follow(&self, user_id: u64, follower_id: u64) -> RepoResult<()> {
        self.lock().followers.insert((user_id, follower_id));
        Ok(())
    }

    async fn unfollow(&self, user_id: u64, follower_id: u64) -> RepoResult<()> {
        self.lock().followers.remove(&(user_id, follower_id));
        Ok(())
    }

    async fn followers(&self, user_id: u64) -> RepoResult<Vec<User>> {
        let t = self.lock();
        Ok(t.followers
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, follower)| t.users.get(follower).map(|u| u.user.clone()))
            .collect())
    }

    async fn following(&self, user_id: u64) -> RepoResult<Vec<User>> {
        let t = self.lock();
        Ok(t.followers
            .iter()
            .filter(|(_, follower)| *follower == user_id)
            .filter_map(|(user, _)| t.users.get(user).map(|u| u.user.clone()))
            .collect())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, author_id: u64, content: PostContent) -> RepoResult<Post> {
        let mut t = self.lock();
        t.next_post_id += 1;
        let post = Post {
            id: t.next_post_id,
            title: content.title,
            content: content.content,
            author_id,
            author_nick: t.nick_of(author_id),
            likes: 0,
            created_at: Utc::now(),
        };
        t.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get(&self, post_id: u64) -> RepoResult<Option<Post>> {
        Ok(self.lock().posts.get(&post_id).cloned())
    }

    async fn fetch_owner(&self, post_id: u64) -> RepoResult<Option<u64>> {
        Ok(self.lock().posts.get(&post_id).map(|p| p.author_id))
    }

    async fn feed(&self, user_id: u64) -> RepoResult<Vec<Post>> {
        let t = self.lock();
        Ok(t.posts
            .values()
            .rev()
            .filter(|p| p.author_id == user_id || t.followers.contains(&(p.author_id, user_id)))
            .cloned()
            .collect())
    }

    async fn list_by_author(&self, author_id: u64) -> RepoResult<Vec<Post>> {
        Ok(self
            .lock()
            .posts
            .values()
            .rev()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update(&self, post_id: u64, content: PostContent) -> RepoResult<bool> {
        let mut t = self.lock();
        let Some(post) = t.posts.get_mut(&post_id) else {
            return Ok(false);
        };
        post.title = content.title;
        post.content = content.content;
        Ok(true)
    }

    async fn delete(&self, post_id: u64) -> RepoResult<bool> {
        Ok(self.lock().posts.remove(&post_id).is_some())
    }

    async fn like(&self, post_id: u64) -> RepoResult<bool> {
        let mut t = self.lock();
        let Some(post) = t.posts.get_mut(&post_id) else {
            return Ok(false);
        };
        post.likes += 1;
        Ok(true)
    }

    async fn unlike(&self, post_id: u64) -> RepoResult<bool> {
        let mut t = self.lock();
        let Some(post) = t.posts.get_mut(&post_id) else {
            return Ok(false);
        };
        post.likes = post.likes.saturating_sub(1);
        Ok(true)
    }
}
