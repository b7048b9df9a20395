/*
 * Responsibility
 * - axum::Json の rejection (400/415/422 の plain text) を AppError::InvalidRequest に寄せる
 * - body の形式エラーも他のエラーと同じ envelope で返す
 */
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::invalid_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}
