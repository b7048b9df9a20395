/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (PgPool + migrations, stores, credential codec, password service)
 * - Router 組み立てと Middleware の適用 (auth gate は routes 側, HTTP/CORS/security headers はここ)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::{self, PgPostRepo, PgUserRepo},
    services::auth::{build_credential_codec, build_password_service},
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG=info,devbook_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast / production: default hook, server keeps running
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "configuration error, refusing to start");
    })?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    repos::MIGRATOR
        .run(&pool)
        .await
        .context("failed to apply database migrations")?;
    tracing::info!("database schema is up to date");

    let users = Arc::new(PgUserRepo::new(pool.clone()));
    let posts = Arc::new(PgPostRepo::new(pool));
    let credentials = build_credential_codec(config);
    let passwords = build_password_service(config)?;

    Ok(AppState::new(users, posts, credentials, passwords))
}

pub(crate) fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::http::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::security_headers::apply(router)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppEnv, SecretKey};
    use crate::repos::memory::MemoryStore;
    use crate::services::auth::CredentialCodec;
    use crate::services::auth::password::{PasswordCost, test_password_service};

    fn test_config(app_env: AppEnv) -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "postgres://unused".into(),
            database_max_connections: 1,
            app_env,
            cors_allowed_origins: vec!["https://app.example".into()],
            secret_key: SecretKey::new("app-test-secret").unwrap(),
            password_cost: PasswordCost::default(),
        }
    }

    fn test_router(config: &Config) -> Router {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            store.clone(),
            store,
            Arc::new(CredentialCodec::new(&config.secret_key)),
            test_password_service(),
        );
        build_router(state, config)
    }

    #[tokio::test]
    async fn responses_carry_request_id_and_security_headers() {
        let config = test_config(AppEnv::Development);
        let res = test_router(&config)
            .oneshot(
                Request::get("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["cache-control"], "no-store");
    }

    #[tokio::test]
    async fn production_cors_only_allows_listed_origins() {
        let config = test_config(AppEnv::Production);
        let router = test_router(&config);

        let allowed = router
            .clone()
            .oneshot(
                Request::get("/api/v1/health")
                    .header("origin", "https://app.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "https://app.example"
        );

        let denied = router
            .oneshot(
                Request::get("/api/v1/health")
                    .header("origin", "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            !denied
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }

    #[tokio::test]
    async fn gate_rejection_still_gets_security_headers() {
        let config = test_config(AppEnv::Development);
        let res = test_router(&config)
            .oneshot(Request::get("/api/v1/posts").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()["x-frame-options"], "DENY");
    }
}
