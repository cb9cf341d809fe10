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

//! Request payloads accepted by the API, with their validation rules.
//!
//! Every payload validates before it reaches storage; the server maps
//! [`DomainError`] to a 400 response.

use serde::Deserialize;
use uuid::Uuid;

use crate::error::DomainError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 6;

/// POST /api/chat
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,

    #[serde(default)]
    pub is_voice: bool,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.message.trim().is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        if self.session_id.is_empty() {
            return Err(DomainError::EmptySessionId);
        }
        Ok(())
    }
}

/// POST /api/feedback
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub message_id: Uuid,
    pub session_id: String,

    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub helpful: Option<bool>,
}

impl FeedbackRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.session_id.is_empty() {
            return Err(DomainError::EmptySessionId);
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(DomainError::RatingOutOfRange);
            }
        }
        Ok(())
    }
}

/// POST /api/auth/signup
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        let len = self.username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            return Err(DomainError::InvalidUsername {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(DomainError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if let Some(email) = &self.email {
            // A full RFC 5322 parse buys nothing here; reject the obviously
            // malformed and let the mail system be the judge of the rest.
            if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
                return Err(DomainError::InvalidEmail);
            }
        }
        Ok(())
    }
}

/// POST /api/auth/login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(DomainError::MissingCredentials);
        }
        Ok(())
    }
}
