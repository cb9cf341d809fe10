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

//! Arpy Storage
//!
//! The conversation and user store behind the API: a [`Storage`] trait
//! describing the CRUD surface, an in-memory [`MemStorage`]
//! implementation, and the derived aggregate views (conversation
//! summaries and feedback analytics) built from store snapshots.

pub mod analytics;
pub mod error;
pub mod mem;
pub mod store;
pub mod summary;

pub use analytics::{feedback_analytics, FeedbackAnalytics, RatingDistribution};
pub use error::StorageError;
pub use mem::MemStorage;
pub use store::Storage;
pub use summary::{summarize, ConversationSummary};
