/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - users / posts store, credential codec, password service
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{PostStore, UserStore};
use crate::services::auth::{CredentialCodec, PasswordService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub credentials: Arc<CredentialCodec>,
    pub passwords: PasswordService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("credentials", &self.credentials)
            .field("passwords", &self.passwords)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        credentials: Arc<CredentialCodec>,
        passwords: PasswordService,
    ) -> Self {
        Self {
            users,
            posts,
            credentials,
            passwords,
        }
    }
}
