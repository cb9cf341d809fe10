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

//! Arpy Core
//!
//! Domain types shared by the storage layer and the HTTP server:
//! messages, conversations, users, feedback, and the validated request
//! payloads the API accepts.

pub mod conversation;
pub mod error;
pub mod message;
pub mod request;
pub mod user;

pub use conversation::Conversation;
pub use error::DomainError;
pub use message::{Feedback, Message, Role};
pub use request::{ChatRequest, FeedbackRequest, LoginRequest, SignupRequest};
pub use user::{NewUser, PublicUser, User};

/// Current time as milliseconds since the Unix epoch.
///
/// Message timestamps are wire-level `i64` milliseconds, matching what
/// browser clients expect from `Date.now()`-style values.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
