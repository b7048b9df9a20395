/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - gate (middleware::auth::access) が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは services::auth 側の責務
 * - 所有者チェック (ownership) は handler が services::auth::ownership で行う
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は credential の subject (1 リクエストの間だけ生きる値)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: u64,
}

impl AuthCtx {
    pub fn new(user_id: u64) -> Self {
        Self { user_id }
    }
}
