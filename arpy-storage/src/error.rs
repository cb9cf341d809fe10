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

use thiserror::Error;
use uuid::Uuid;

/// Storage layer error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("message {message_id} not found in session {session_id}")]
    UnknownMessage { session_id: String, message_id: Uuid },

    #[error("username already exists: {0}")]
    UsernameTaken(String),
}
