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
use tracing::debug;

use arpy_core::{Conversation, Feedback, FeedbackRequest};
use arpy_storage::{feedback_analytics, FeedbackAnalytics};

use crate::api::{ApiError, AppState};

/// Response for POST /api/feedback
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,

    /// The feedback as stored, including the server-side timestamp.
    pub feedback: Feedback,

    pub conversation: Conversation,
}

/// POST /api/feedback - Attach feedback to an assistant message
#[tracing::instrument(skip(state, req), fields(session_id = %req.session_id))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    req.validate()?;
    debug!(message_id = %req.message_id, "feedback received");

    let feedback = Feedback {
        rating: req.rating,
        comment: req.comment.clone(),
        helpful: req.helpful,
        timestamp: None, // stamped by the store
    };

    let conversation =
        state
            .storage
            .update_message_feedback(&req.session_id, req.message_id, feedback)?;

    // Echo what was actually stored.
    let stored = conversation
        .messages
        .iter()
        .find(|m| m.id == req.message_id)
        .and_then(|m| m.feedback.clone())
        .ok_or_else(|| ApiError::Internal("feedback not recorded".to_string()))?;

    Ok(Json(FeedbackResponse {
        success: true,
        feedback: stored,
        conversation,
    }))
}

/// GET /api/analytics/feedback - Aggregate feedback across conversations
pub async fn get_feedback_analytics(State(state): State<AppState>) -> Json<FeedbackAnalytics> {
    let conversations = state.storage.all_conversations();
    Json(feedback_analytics(&conversations))
}
