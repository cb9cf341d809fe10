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

//! Token issuance and request authentication.
//!
//! Signup and login issue JWTs; the rest of the API is gated by a
//! pluggable [`Authenticator`] so deployments can run open (the
//! default) or require bearer tokens.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use arpy_core::User;

pub mod password;
pub mod rate_limit;

pub use password::{hash_password, verify_password};
pub use rate_limit::{extract_client_ip, RateLimitConfig, RateLimitDecision, RateLimiter};

/// Token lifetime: seven days.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Authentication context attached to each request that passes the gate.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Option<u64>,
    pub username: Option<String>,
}

impl AuthContext {
    /// Context for requests admitted without credentials.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            username: None,
        }
    }
}

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingCredentials,

    #[error("JWT token validation failed: {0}")]
    JwtValidation(String),

    #[error("Failed to create token: {0}")]
    TokenCreation(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingCredentials | AuthError::JwtValidation(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    /// Expiration time (seconds since epoch)
    pub exp: usize,
}

/// Signs JWTs for authenticated users.
pub struct TokenIssuer {
    secret: Vec<u8>,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now().timestamp() as u64 + TOKEN_TTL.as_secs()) as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp,
        };

        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }
}

/// Authenticator trait for pluggable auth strategies
pub trait Authenticator: Send + Sync {
    /// Authenticate a request by examining its headers.
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError>;
}

/// Bearer token (JWT) authenticator
pub struct BearerTokenAuth {
    jwt_secret: Vec<u8>,
}

impl BearerTokenAuth {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret: jwt_secret.into_bytes(),
        }
    }
}

impl Authenticator for BearerTokenAuth {
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingCredentials)?;

        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(&self.jwt_secret),
            &jsonwebtoken::Validation::default(),
        )
        .map_err(|e| AuthError::JwtValidation(e.to_string()))?;

        Ok(AuthContext {
            user_id: token_data.claims.sub.parse().ok(),
            username: Some(token_data.claims.username),
        })
    }
}

/// No-op authenticator for open deployments (no auth required)
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        Ok(AuthContext::anonymous())
    }
}

/// Authentication middleware for the API routes.
pub async fn auth_middleware(
    auth: axum::Extension<Arc<dyn Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = auth.authenticate(req.headers())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Rate limiting middleware for the auth endpoints.
///
/// Answers 429 with a `Retry-After` header once a client exhausts its
/// window; successful requests carry `X-RateLimit-Remaining`.
pub async fn rate_limit_middleware(
    limiter: axum::Extension<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let client_id = extract_client_ip(req.headers()).unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&client_id) {
        RateLimitDecision::Allowed { remaining } => {
            let mut response = next.run(req).await;
            response.headers_mut().insert(
                "X-RateLimit-Remaining",
                HeaderValue::from_str(&remaining.to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("0")),
            );
            response
        }
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(
                client = %client_id,
                retry_after_secs = retry_after.as_secs(),
                "rate limit exceeded on auth endpoint"
            );

            let mut response = Response::new(
                format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    retry_after.as_secs()
                )
                .into(),
            );
            *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
            response.headers_mut().insert(
                "Retry-After",
                HeaderValue::from_str(&retry_after.as_secs().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("60")),
            );
            response
        }
    }
}
