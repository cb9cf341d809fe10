// Copyright 2025 Arpy AI Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Arpy AI server: HTTP chat backend with in-memory conversation
//! storage, feedback collection, token-issuing auth, and a relay to a
//! generative-language API.

pub mod api;
pub mod auth;
pub mod config;
pub mod llm;

use anyhow::Result;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use arpy_storage::MemStorage;
use auth::{
    Authenticator, BearerTokenAuth, NoAuth, RateLimitConfig, RateLimiter, TokenIssuer,
};
use config::ServerConfig;
use llm::LlmManager;

/// Signing secret used when none is configured. Tokens signed with it are
/// only ever issued while bearer gating is off.
const DEV_JWT_SECRET: &str = "arpy-dev-secret";

/// Assemble the full application router.
///
/// Health is always public; signup/login sit behind the rate limiter;
/// everything else passes the authenticator (a no-op unless bearer
/// gating is enabled).
pub fn build_router(
    state: AppState,
    authenticator: Arc<dyn Authenticator>,
    rate_limiter: Arc<RateLimiter>,
    enable_cors: bool,
) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/signup", post(api::signup))
        .route("/api/auth/login", post(api::login))
        .layer(axum_middleware::from_fn(auth::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    let api_routes = Router::new()
        .route("/api/chat", post(api::send_message))
        .route("/api/conversations", get(api::list_conversations))
        .route(
            "/api/conversation/:session_id",
            get(api::get_conversation).delete(api::clear_conversation),
        )
        .route(
            "/api/conversation/:session_id/export",
            get(api::export_transcript),
        )
        .route(
            "/api/conversation/:session_id/generate-title",
            post(api::generate_title),
        )
        .route("/api/feedback", post(api::submit_feedback))
        .route("/api/analytics/feedback", get(api::get_feedback_analytics))
        .layer(axum_middleware::from_fn(auth::auth_middleware))
        .layer(Extension(authenticator));

    let router = Router::new()
        .route("/api/health", get(api::health_check))
        .merge(auth_routes)
        .merge(api_routes)
        .with_state(state);

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arpy_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arpy AI Server");

    config.validate()?;

    let storage = Arc::new(MemStorage::new());
    let llm = Arc::new(LlmManager::new(&config.llm));

    let jwt_secret = match &config.auth.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!(
                "No JWT secret configured; issued tokens use a well-known development secret"
            );
            DEV_JWT_SECRET.to_string()
        }
    };

    let state = AppState {
        storage,
        llm,
        token_issuer: Arc::new(TokenIssuer::new(jwt_secret.clone())),
        auth_enabled: config.auth.enabled,
    };

    let authenticator: Arc<dyn Authenticator> = if config.auth.enabled {
        tracing::info!("Bearer token authentication enabled");
        Arc::new(BearerTokenAuth::new(jwt_secret))
    } else {
        let is_localhost = config.server.listen_addr.starts_with("127.0.0.1")
            || config.server.listen_addr.starts_with("localhost");
        if !is_localhost {
            tracing::warn!(
                "Authentication is disabled on non-localhost address {}; \
                 anyone who can reach the server can read and write conversations",
                config.server.listen_addr
            );
        }
        Arc::new(NoAuth)
    };

    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        max_requests: config.auth.rate_limit.max_requests,
        window: Duration::from_secs(config.auth.rate_limit.window_secs),
        enabled: config.auth.rate_limit.enabled,
        ..RateLimitConfig::default()
    }));

    let app = build_router(state, authenticator, rate_limiter, config.server.enable_cors);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }
}
