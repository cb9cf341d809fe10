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

//! Conversation history: fetch, clear, list, title generation, and
//! transcript export.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::debug;

use arpy_core::{Conversation, Message, Role};
use arpy_storage::{summarize, ConversationSummary};

use crate::api::{ApiError, AppState};
use crate::llm::LlmError;

/// Response for GET /api/conversation/:session_id
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// Response for DELETE /api/conversation/:session_id
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for POST /api/conversation/:session_id/generate-title
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub title: String,
    pub conversation: Conversation,
}

/// GET /api/conversation/:session_id - Fetch conversation history
///
/// Unknown sessions answer an empty message list, not 404; the client
/// treats a fresh session id as an empty conversation.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<MessagesResponse> {
    let messages = state
        .storage
        .get_conversation(&session_id)
        .map(|c| c.messages)
        .unwrap_or_default();

    Json(MessagesResponse { messages })
}

/// DELETE /api/conversation/:session_id - Clear a conversation
pub async fn clear_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SuccessResponse> {
    state.storage.delete_conversation(&session_id);
    Json(SuccessResponse { success: true })
}

/// GET /api/conversations - List conversation summaries, newest first
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Json<Vec<ConversationSummary>> {
    let conversations = state.storage.all_conversations();
    Json(summarize(&conversations))
}

/// POST /api/conversation/:session_id/generate-title - Generate and store
/// a short title from the opening exchange
#[tracing::instrument(skip(state))]
pub async fn generate_title(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TitleResponse>, ApiError> {
    let conversation = state
        .storage
        .get_conversation(&session_id)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Conversation {} not found or empty",
                session_id
            ))
        })?;

    let title = state
        .llm
        .conversation_title(&conversation.messages)
        .await
        .map_err(|e| match e {
            LlmError::NotConfigured => ApiError::Unavailable(e.to_string()),
            LlmError::Upstream(_) => ApiError::Internal(e.to_string()),
        })?;

    debug!(title = %title, "generated conversation title");

    let conversation = state
        .storage
        .update_conversation_title(&session_id, &title)?;

    Ok(Json(TitleResponse {
        title,
        conversation,
    }))
}

/// GET /api/conversation/:session_id/export - Download the conversation
/// as a plain-text transcript
pub async fn export_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation = state
        .storage
        .get_conversation(&session_id)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Conversation {} not found or empty",
                session_id
            ))
        })?;

    let transcript = render_transcript(&conversation.messages);
    let filename = format!(
        "arpy-ai-conversation-{}.txt",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        transcript,
    ))
}

fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|msg| {
            let when = chrono::DateTime::from_timestamp_millis(msg.timestamp)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| msg.timestamp.to_string());
            let speaker = match msg.role {
                Role::User => "You",
                Role::Assistant => "Arpy AI",
            };
            let voice = if msg.is_voice { " (voice)" } else { "" };
            format!("[{}] {}{}: {}", when, speaker, voice, msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
