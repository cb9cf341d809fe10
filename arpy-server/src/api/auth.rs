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

//! Account creation and login.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{debug, info};

use arpy_core::{LoginRequest, NewUser, PublicUser, SignupRequest};

use crate::api::{ApiError, AppState};
use crate::auth::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Response for POST /api/auth/signup
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: PublicUser,
    pub token: String,
    pub message: String,
}

/// Response for POST /api/auth/login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
}

/// POST /api/auth/signup - Create an account and issue a token
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    req.validate()?;

    if state
        .storage
        .get_user_by_username(&req.username)
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let user = state.storage.create_user(NewUser {
        username: req.username,
        email: req.email,
        password_hash: hash_password(&req.password),
    })?;

    let token = state
        .token_issuer
        .issue(&user)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(user_id = user.id, "user created");

    Ok(Json(SignupResponse {
        user: PublicUser::from(&user),
        token,
        message: "User created successfully".to_string(),
    }))
}

/// POST /api/auth/login - Verify credentials and issue a token
///
/// Unknown usernames and wrong passwords are indistinguishable in the
/// response.
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()?;

    let user = state
        .storage
        .get_user_by_username(&req.username)
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&req.password, &user.password_hash) {
        debug!("password mismatch");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state
        .token_issuer
        .issue(&user)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        user: PublicUser::from(&user),
        token,
    }))
}
