/*
 * Responsibility
 * - Path の String を数値 ID (u64) として受け取る
 * - 失敗時は AppError::InvalidRequest (400, 共通の error envelope) へ変換
 * 置くもの
 *  - PathId<T> の定義（ジェネリック本体）
 *  - impl FromRequestParts<AppState> for PathId<T>
 * 置かないもの
 *  - User / Post といった具体リソース名 (types.rs)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

pub struct PathId<T> {
    pub id: u64,
    _marker: PhantomData<T>,
}

impl<T> PathId<T> {
    fn new(id: u64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

pub(super) fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>()
        .map_err(|_| AppError::invalid_request(format!("invalid id: {raw:?}")))
}

impl<T> FromRequestParts<AppState> for PathId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::invalid_request("missing id"))?;
        Ok(Self::new(parse_id(&raw)?))
    }
}

impl<T> Clone for PathId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PathId<T> {}

impl<T> std::fmt::Debug for PathId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathId").field("id", &self.id).finish()
    }
}
