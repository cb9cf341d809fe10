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

/// Validation failure on an incoming request payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("username must be between {min} and {max} characters")]
    InvalidUsername { min: usize, max: usize },

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("invalid email address")]
    InvalidEmail,

    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,

    #[error("missing credentials")]
    MissingCredentials,
}
