/*!
 * 認証済み subject の受け渡し
 *
 * - access gate が検証に成功した request にだけ AuthCtx が入っている
 * - handler は AuthCtxExtractor で受け取り、credential を再検証しない
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
