/**
 * Responsibility
 *  - リソースごとの「意味付き ID 型」を宣言する
 *  - /users/{user_id} と /posts/{post_id} を型で取り違えないようにする
 */
use super::core::PathId;

// users
pub enum UserTag {}
pub type UserId = PathId<UserTag>;

// posts
pub enum PostTag {}
pub type PostId = PathId<PostTag>;
