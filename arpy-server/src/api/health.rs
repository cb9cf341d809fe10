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

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

/// Health check response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub features: FeatureFlags,
}

/// Which capabilities this deployment has enabled.
#[derive(Debug, Serialize)]
pub struct FeatureFlags {
    /// True when a generation provider is configured (not demo mode).
    pub ai: bool,
    pub voice: bool,
    pub memory: bool,
    pub auth: bool,
}

/// GET /api/health - Service status and feature flags
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        features: FeatureFlags {
            ai: state.llm.is_configured(),
            voice: true,
            memory: true,
            auth: state.auth_enabled,
        },
    })
}
