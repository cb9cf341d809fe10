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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A session-scoped list of messages.
///
/// Conversations are keyed by an opaque client-minted `session_id`; the
/// numeric `id` exists only so records sort stably by creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,
    pub session_id: String,

    /// Short descriptive title, generated after the first exchange.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation for a session.
    pub fn new(id: u64, session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            session_id: session_id.into(),
            title: None,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the message list and bump `updated_at`.
    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Last message in the conversation, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_empty() {
        let conv = Conversation::new(1, "session-a");
        assert!(conv.is_empty());
        assert_eq!(conv.session_id, "session-a");
        assert!(conv.title.is_none());
    }

    #[test]
    fn test_set_messages_bumps_updated_at() {
        let mut conv = Conversation::new(1, "session-a");
        let before = conv.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        conv.set_messages(vec![Message::user("hi", false)]);
        assert!(conv.updated_at > before);
        assert_eq!(conv.messages.len(), 1);
    }

    #[test]
    fn test_wire_shape_uses_camel_case() {
        let conv = Conversation::new(7, "s");
        let json = serde_json::to_value(&conv).unwrap();
        assert_eq!(json["sessionId"], "s");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        // No title until one is generated.
        assert!(json.get("title").is_none());
    }
}
