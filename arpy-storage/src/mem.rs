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

//! In-memory store over concurrent maps.
//!
//! Every map operation is atomic under a multithreaded executor.
//! Nothing is persisted; process exit loses all state.

use std::sync::atomic::{AtomicU64, Ordering};

use arpy_core::{now_millis, Conversation, Feedback, Message, NewUser, User};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::Storage;

/// In-memory [`Storage`] implementation.
pub struct MemStorage {
    users: DashMap<u64, User>,
    conversations: DashMap<String, Conversation>,
    next_user_id: AtomicU64,
    next_conversation_id: AtomicU64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            conversations: DashMap::new(),
            next_user_id: AtomicU64::new(1),
            next_conversation_id: AtomicU64::new(1),
        }
    }

    /// Number of conversations currently held.
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn get_user(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .iter()
            .find(|entry| entry.username == username)
            .map(|entry| entry.clone())
    }

    fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        // Uniqueness check and insert race against concurrent signups for
        // the same name; the id mint is atomic, so the loser of the race
        // only wastes an id.
        if self.get_user_by_username(&user.username).is_some() {
            return Err(StorageError::UsernameTaken(user.username));
        }

        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let record = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: chrono::Utc::now(),
        };
        self.users.insert(id, record.clone());
        debug!(user_id = id, username = %record.username, "created user");
        Ok(record)
    }

    fn get_conversation(&self, session_id: &str) -> Option<Conversation> {
        self.conversations.get(session_id).map(|c| c.clone())
    }

    fn create_conversation(&self, session_id: &str) -> Conversation {
        self.conversations
            .entry(session_id.to_string())
            .or_insert_with(|| {
                let id = self.next_conversation_id.fetch_add(1, Ordering::SeqCst);
                debug!(conversation_id = id, session_id, "created conversation");
                Conversation::new(id, session_id)
            })
            .clone()
    }

    fn update_conversation(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<Conversation, StorageError> {
        let mut entry = self
            .conversations
            .get_mut(session_id)
            .ok_or_else(|| StorageError::UnknownSession(session_id.to_string()))?;
        entry.set_messages(messages);
        Ok(entry.clone())
    }

    fn update_conversation_title(
        &self,
        session_id: &str,
        title: &str,
    ) -> Result<Conversation, StorageError> {
        let mut entry = self
            .conversations
            .get_mut(session_id)
            .ok_or_else(|| StorageError::UnknownSession(session_id.to_string()))?;
        entry.title = Some(title.to_string());
        entry.touch();
        Ok(entry.clone())
    }

    fn update_message_feedback(
        &self,
        session_id: &str,
        message_id: Uuid,
        feedback: Feedback,
    ) -> Result<Conversation, StorageError> {
        let mut entry = self
            .conversations
            .get_mut(session_id)
            .ok_or_else(|| StorageError::UnknownSession(session_id.to_string()))?;

        let message = entry
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(StorageError::UnknownMessage {
                session_id: session_id.to_string(),
                message_id,
            })?;

        message.feedback = Some(Feedback {
            timestamp: Some(now_millis()),
            ..feedback
        });
        entry.touch();
        Ok(entry.clone())
    }

    fn delete_conversation(&self, session_id: &str) {
        if self.conversations.remove(session_id).is_some() {
            debug!(session_id, "deleted conversation");
        }
    }

    fn all_conversations(&self) -> Vec<Conversation> {
        self.conversations
            .iter()
            .map(|entry| entry.clone())
            .collect()
    }
}
