//! Authorization gate: `Authorization: Bearer <jwt>` を検証 → AuthCtx を extensions に入れる
//!
//! - route table で `requires_auth = true` の route にだけ `route_layer` で掛ける
//! - 失敗時は handler を呼ばずに 401 を返す (理由はログにだけ残す)
//! - 成功時は AuthCtx を extensions に格納し、handler は `AuthCtxExtractor` で受け取る

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::bearer;
use crate::state::AppState;

/// Wrap a single route's handler(s) with the gate.
pub fn apply(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    route.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // 非 UTF-8 のヘッダ値は「ヘッダなし」と同じ扱い (空の credential → Malformed)
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user_id = match bearer::extract_subject(&state.credentials, header_value) {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!(
                error = %err,
                method = %req.method(),
                uri = %req.uri(),
                "credential verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(user_id, "authenticated request");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}
