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

use arpy_core::{ChatRequest, Message};

use crate::api::{ApiError, AppState};

/// Response for POST /api/chat
#[derive(Debug, Serialize)]
pub struct ChatResponseBody {
    /// The assistant message just produced.
    pub message: Message,

    /// Full message list after the exchange.
    pub conversation: Vec<Message>,
}

/// POST /api/chat - Send a message and receive the assistant reply
#[tracing::instrument(skip(state, req), fields(session_id = %req.session_id))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    req.validate()?;
    debug!(is_voice = req.is_voice, "chat request received");

    let conversation = match state.storage.get_conversation(&req.session_id) {
        Some(conversation) => conversation,
        None => state.storage.create_conversation(&req.session_id),
    };

    let mut messages = conversation.messages;
    messages.push(Message::user(req.message, req.is_voice));

    // Reply generation sees the history including the new user message;
    // demo fallback keeps this infallible.
    let reply = state.llm.chat_reply(&messages).await;
    let assistant_message = Message::assistant(reply);
    messages.push(assistant_message.clone());

    let updated = state
        .storage
        .update_conversation(&req.session_id, messages)?;

    debug!(
        message_count = updated.messages.len(),
        "chat response stored"
    );

    Ok(Json(ChatResponseBody {
        message: assistant_message,
        conversation: updated.messages,
    }))
}
