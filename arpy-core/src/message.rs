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

//! Chat messages and per-message feedback.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Display name used when rendering transcripts and prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// Reader feedback attached to an assistant message.
///
/// All fields are optional on submission; the server stamps `timestamp`
/// when the feedback is recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Star rating, 1 through 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,

    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Thumbs up / thumbs down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpful: Option<bool>,

    /// When the feedback was recorded (milliseconds since epoch).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Feedback {
    /// True when the submission carries no signal at all.
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.comment.is_none() && self.helpful.is_none()
    }
}

/// A single chat message within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub role: Role,

    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,

    /// Whether the message arrived via voice capture.
    #[serde(default)]
    pub is_voice: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Message {
    /// Build a user message stamped with the current time.
    pub fn user(content: impl Into<String>, is_voice: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role: Role::User,
            timestamp: crate::now_millis(),
            is_voice,
            feedback: None,
        }
    }

    /// Build an assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role: Role::Assistant,
            timestamp: crate::now_millis(),
            is_voice: false,
            feedback: None,
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}
