/*
 * Responsibility
 * - /users 系 handler (CRUD, search, follow, password)
 * - 書き込み系は body を読む前 / store を触る前に ownership guard を通す
 *   - PUT / DELETE / update-password: 本人のみ (ensure_self)
 *   - follow / unfollow: 本人以外 (ensure_not_self)
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::users::{CreateUserRequest, SearchUsersQuery, UpdatePasswordRequest, UpdateUserRequest},
        extractors::{AuthCtxExtractor, JsonBody, UserId},
    },
    error::AppError,
    repos::store::{NewUser, User},
    services::auth::ownership,
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let profile = req.profile();
    let password_hash = state.passwords.hash_blocking(req.password).await?;

    let user = state
        .users
        .create(NewUser {
            name: profile.name,
            nick: profile.nick,
            email: profile.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn search_users(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    Query(query): Query<SearchUsersQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.search(query.user.trim()).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    user_id: UserId,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .get(user_id.id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    user_id: UserId,
    body: Result<JsonBody<UpdateUserRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    ownership::ensure_self(auth.user_id, user_id.id)?;

    let JsonBody(req) = body?;
    req.validate().map_err(AppError::invalid_request)?;

    if !state.users.update_profile(user_id.id, req.profile()).await? {
        return Err(AppError::NotFound("user"));
    }

    tracing::info!(user_id = user_id.id, "user updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    user_id: UserId,
) -> Result<StatusCode, AppError> {
    ownership::ensure_self(auth.user_id, user_id.id)?;

    if !state.users.delete(user_id.id).await? {
        return Err(AppError::NotFound("user"));
    }

    tracing::info!(user_id = user_id.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn follow_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    user_id: UserId,
) -> Result<StatusCode, AppError> {
    ownership::ensure_not_self(auth.user_id, user_id.id)?;

    if state.users.get(user_id.id).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    state.users.follow(user_id.id, auth.user_id).await?;

    tracing::debug!(user_id = user_id.id, follower_id = auth.user_id, "followed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    user_id: UserId,
) -> Result<StatusCode, AppError> {
    ownership::ensure_not_self(auth.user_id, user_id.id)?;

    if state.users.get(user_id.id).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    state.users.unfollow(user_id.id, auth.user_id).await?;

    tracing::debug!(user_id = user_id.id, follower_id = auth.user_id, "unfollowed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_followers(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    user_id: UserId,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.followers(user_id.id).await?))
}

pub async fn list_following(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    user_id: UserId,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.following(user_id.id).await?))
}

pub async fn update_password(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    user_id: UserId,
    body: Result<JsonBody<UpdatePasswordRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    ownership::ensure_self(auth.user_id, user_id.id)?;

    let JsonBody(req) = body?;
    req.validate().map_err(AppError::invalid_request)?;

    let stored_hash = state
        .users
        .fetch_password_hash(user_id.id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    // current が一致しない → PasswordError::Mismatch → 401
    state
        .passwords
        .verify_blocking(stored_hash, req.current)
        .await?;

    let new_hash = state.passwords.hash_blocking(req.new).await?;
    if !state
        .users
        .update_password_hash(user_id.id, &new_hash)
        .await?
    {
        return Err(AppError::NotFound("user"));
    }

    tracing::info!(user_id = user_id.id, "password updated");
    Ok(StatusCode::NO_CONTENT)
}
