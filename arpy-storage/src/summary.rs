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

//! Conversation list summaries for the history sidebar.

use arpy_core::Conversation;
use serde::Serialize;

/// Preview length for the last message, in characters.
const PREVIEW_CHARS: usize = 100;

const UNTITLED: &str = "Untitled Chat";
const NO_MESSAGES: &str = "No messages";

/// One row in the conversation history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub session_id: String,
    pub title: String,

    /// First 100 characters of the most recent message.
    pub last_message: String,

    /// `updated_at` in milliseconds since epoch.
    pub timestamp: i64,

    pub message_count: usize,
}

impl From<&Conversation> for ConversationSummary {
    fn from(conv: &Conversation) -> Self {
        let last_message = match conv.last_message() {
            Some(msg) => preview(&msg.content),
            None => NO_MESSAGES.to_string(),
        };

        Self {
            session_id: conv.session_id.clone(),
            title: conv
                .title
                .clone()
                .unwrap_or_else(|| UNTITLED.to_string()),
            last_message,
            timestamp: conv.updated_at.timestamp_millis(),
            message_count: conv.messages.len(),
        }
    }
}

/// Summarize conversations for the history list, most recent first.
pub fn summarize(conversations: &[Conversation]) -> Vec<ConversationSummary> {
    let mut summaries: Vec<ConversationSummary> =
        conversations.iter().map(ConversationSummary::from).collect();
    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    summaries
}

fn preview(content: &str) -> String {
    // char-based truncation; byte slicing would split multibyte input
    if content.chars().count() <= PREVIEW_CHARS {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arpy_core::Message;

    #[test]
    fn test_empty_conversation_summary() {
        let conv = Conversation::new(1, "s1");
        let summary = ConversationSummary::from(&conv);
        assert_eq!(summary.title, "Untitled Chat");
        assert_eq!(summary.last_message, "No messages");
        assert_eq!(summary.message_count, 0);
    }

    #[test]
    fn test_short_message_not_truncated() {
        let mut conv = Conversation::new(1, "s1");
        conv.set_messages(vec![Message::assistant("short reply")]);
        let summary = ConversationSummary::from(&conv);
        assert_eq!(summary.last_message, "short reply");
    }

    #[test]
    fn test_long_message_truncated_with_ellipsis() {
        let mut conv = Conversation::new(1, "s1");
        conv.set_messages(vec![Message::assistant("x".repeat(150))]);
        let summary = ConversationSummary::from(&conv);
        assert_eq!(summary.last_message.chars().count(), 103);
        assert!(summary.last_message.ends_with("..."));
    }

    #[test]
    fn test_multibyte_preview_does_not_panic() {
        let mut conv = Conversation::new(1, "s1");
        conv.set_messages(vec![Message::assistant("é".repeat(120))]);
        let summary = ConversationSummary::from(&conv);
        assert!(summary.last_message.ends_with("..."));
    }

    #[test]
    fn test_summaries_sorted_most_recent_first() {
        let mut old = Conversation::new(1, "old");
        old.set_messages(vec![Message::user("first", false)]);

        std::thread::sleep(std::time::Duration::from_millis(5));

        let mut fresh = Conversation::new(2, "fresh");
        fresh.set_messages(vec![Message::user("second", false)]);

        let summaries = summarize(&[old, fresh]);
        assert_eq!(summaries[0].session_id, "fresh");
        assert_eq!(summaries[1].session_id, "old");
    }

    #[test]
    fn test_wire_shape() {
        let conv = Conversation::new(1, "s1");
        let json = serde_json::to_value(ConversationSummary::from(&conv)).unwrap();
        assert!(json.get("sessionId").is_some());
        assert!(json.get("lastMessage").is_some());
        assert!(json.get("messageCount").is_some());
    }
}
