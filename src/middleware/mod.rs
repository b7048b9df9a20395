/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route 単位の認証 gate / http, cors, security_headers: Router 全体に掛ける層
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
