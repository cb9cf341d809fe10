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

use arpy_core::{Conversation, Feedback, Message, NewUser, User};
use uuid::Uuid;

use crate::error::StorageError;

/// The storage seam between the route layer and whatever holds the data.
///
/// Every method is a single atomic operation on the store; callers that
/// read-modify-write across calls get last-write-wins semantics.
pub trait Storage: Send + Sync {
    // Users

    fn get_user(&self, id: u64) -> Option<User>;

    fn get_user_by_username(&self, username: &str) -> Option<User>;

    /// Mint an id and insert the user. Fails if the username is taken.
    fn create_user(&self, user: NewUser) -> Result<User, StorageError>;

    // Conversations

    fn get_conversation(&self, session_id: &str) -> Option<Conversation>;

    /// Insert an empty conversation for the session. Returns the existing
    /// record when one is already present, so concurrent callers converge.
    fn create_conversation(&self, session_id: &str) -> Conversation;

    /// Replace the message list of an existing conversation and bump its
    /// `updated_at`.
    fn update_conversation(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<Conversation, StorageError>;

    fn update_conversation_title(
        &self,
        session_id: &str,
        title: &str,
    ) -> Result<Conversation, StorageError>;

    /// Attach feedback to one message, stamping the feedback timestamp.
    fn update_message_feedback(
        &self,
        session_id: &str,
        message_id: Uuid,
        feedback: Feedback,
    ) -> Result<Conversation, StorageError>;

    /// Remove the conversation. Deleting an unknown session is a no-op.
    fn delete_conversation(&self, session_id: &str);

    /// Snapshot of every conversation in the store.
    fn all_conversations(&self) -> Vec<Conversation>;
}
