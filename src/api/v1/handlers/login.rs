/*
 * Responsibility
 * - POST /login
 * - email で login record を引き、password を検証して credential を発行する
 * - 「email が無い」と「password 違い」は同じ 401 にする
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::auth::{LoginRequest, LoginResponse},
        extractors::JsonBody,
    },
    error::AppError,
    services::auth::password::PasswordError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::invalid_request("email and password are required"));
    }

    let Some(record) = state.users.find_login_by_email(email).await? else {
        tracing::warn!("login failed: unknown email");
        return Err(AppError::Unauthorized);
    };

    match state
        .passwords
        .verify_blocking(record.password_hash, req.password)
        .await
    {
        Ok(()) => {}
        Err(PasswordError::Mismatch) => {
            tracing::warn!(user_id = record.user_id, "login failed: password mismatch");
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    }

    let token = state.credentials.issue(record.user_id)?;
    tracing::info!(user_id = record.user_id, "login succeeded");

    Ok(Json(LoginResponse {
        id: record.user_id.to_string(),
        token,
    }))
}
