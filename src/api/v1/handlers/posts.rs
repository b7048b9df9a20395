/*
 * Responsibility
 * - /posts 系 handler と GET /users/{user_id}/posts
 * - author は常に AuthCtx の subject (body からは受け取らない)
 * - PUT / DELETE は fetch_owner → ensure_owner を通してから body を読み、書き込む
 *   - post が無い / owner が違う: どちらも 403 (存在を owner 以外に漏らさない)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::posts::PostRequest,
        extractors::{AuthCtxExtractor, JsonBody, PostId, UserId},
    },
    error::AppError,
    repos::store::Post,
    services::auth::ownership,
    state::AppState,
};

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    JsonBody(req): JsonBody<PostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let post = state
        .posts
        .create(auth.user_id, req.into_content())
        .await?;

    tracing::info!(post_id = post.id, author_id = auth.user_id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn feed(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.posts.feed(auth.user_id).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    post_id: PostId,
) -> Result<Json<Post>, AppError> {
    let post = state
        .posts
        .get(post_id.id)
        .await?
        .ok_or(AppError::NotFound("post"))?;
    Ok(Json(post))
}

pub async fn list_user_posts(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    user_id: UserId,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.posts.list_by_author(user_id.id).await?))
}

async fn ensure_post_owner(state: &AppState, subject: u64, post_id: u64) -> Result<(), AppError> {
    let owner = state
        .posts
        .fetch_owner(post_id)
        .await?
        .ok_or(AppError::Forbidden(ownership::OwnershipError::NotOwner))?;

    ownership::ensure_owner(subject, owner).inspect_err(|_| {
        tracing::warn!(post_id, subject, owner, "post write by non-owner rejected");
    })?;
    Ok(())
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    body: Result<JsonBody<PostRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    ensure_post_owner(&state, auth.user_id, post_id.id).await?;

    let JsonBody(req) = body?;
    req.validate().map_err(AppError::invalid_request)?;

    if !state.posts.update(post_id.id, req.into_content()).await? {
        return Err(AppError::NotFound("post"));
    }

    tracing::info!(post_id = post_id.id, "post updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
) -> Result<StatusCode, AppError> {
    ensure_post_owner(&state, auth.user_id, post_id.id).await?;

    if !state.posts.delete(post_id.id).await? {
        return Err(AppError::NotFound("post"));
    }

    tracing::info!(post_id = post_id.id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_post(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    post_id: PostId,
) -> Result<StatusCode, AppError> {
    if !state.posts.like(post_id.id).await? {
        return Err(AppError::NotFound("post"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlike_post(
    State(state): State<AppState>,
    _auth: AuthCtxExtractor,
    post_id: PostId,
) -> Result<StatusCode, AppError> {
    if !state.posts.unlike(post_id.id).await? {
        return Err(AppError::NotFound("post"));
    }
    Ok(StatusCode::NO_CONTENT)
}
