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

//! Feedback aggregation across all conversations.

use arpy_core::Conversation;
use serde::Serialize;

/// Counts per star rating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingDistribution {
    #[serde(rename = "1")]
    pub one: usize,
    #[serde(rename = "2")]
    pub two: usize,
    #[serde(rename = "3")]
    pub three: usize,
    #[serde(rename = "4")]
    pub four: usize,
    #[serde(rename = "5")]
    pub five: usize,
}

impl RatingDistribution {
    fn record(&mut self, rating: u8) {
        match rating {
            1 => self.one += 1,
            2 => self.two += 1,
            3 => self.three += 1,
            4 => self.four += 1,
            5 => self.five += 1,
            _ => {}
        }
    }
}

/// Aggregate view over feedback left on assistant messages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalytics {
    /// Assistant messages carrying any feedback.
    pub total_feedbacks: usize,

    /// Mean rating over rated messages only; 0.0 when nothing is rated.
    pub average_rating: f64,

    pub helpful_count: usize,
    pub not_helpful_count: usize,
    pub rating_distribution: RatingDistribution,
}

/// Walk every assistant message and fold its feedback into the aggregate.
pub fn feedback_analytics(conversations: &[Conversation]) -> FeedbackAnalytics {
    let mut total_feedbacks = 0;
    let mut helpful_count = 0;
    let mut not_helpful_count = 0;
    let mut rating_sum = 0u64;
    let mut rated_count = 0usize;
    let mut rating_distribution = RatingDistribution::default();

    for message in conversations
        .iter()
        .flat_map(|c| c.messages.iter())
        .filter(|m| m.is_assistant())
    {
        let Some(feedback) = &message.feedback else {
            continue;
        };

        total_feedbacks += 1;

        match feedback.helpful {
            Some(true) => helpful_count += 1,
            Some(false) => not_helpful_count += 1,
            None => {}
        }

        if let Some(rating) = feedback.rating {
            rating_sum += rating as u64;
            rated_count += 1;
            rating_distribution.record(rating);
        }
    }

    let average_rating = if rated_count > 0 {
        rating_sum as f64 / rated_count as f64
    } else {
        0.0
    };

    FeedbackAnalytics {
        total_feedbacks,
        average_rating,
        helpful_count,
        not_helpful_count,
        rating_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arpy_core::{Feedback, Message};

    fn rated_reply(rating: Option<u8>, helpful: Option<bool>) -> Message {
        let mut msg = Message::assistant("reply");
        msg.feedback = Some(Feedback {
            rating,
            helpful,
            ..Default::default()
        });
        msg
    }

    fn conversation_with(messages: Vec<Message>) -> Conversation {
        let mut conv = Conversation::new(1, "s");
        conv.set_messages(messages);
        conv
    }

    #[test]
    fn test_empty_store_yields_zeroes() {
        let analytics = feedback_analytics(&[]);
        assert_eq!(analytics.total_feedbacks, 0);
        assert_eq!(analytics.average_rating, 0.0);
    }

    #[test]
    fn test_user_message_feedback_ignored() {
        // Feedback only counts on assistant messages.
        let mut user_msg = Message::user("hi", false);
        user_msg.feedback = Some(Feedback {
            rating: Some(5),
            ..Default::default()
        });
        let analytics = feedback_analytics(&[conversation_with(vec![user_msg])]);
        assert_eq!(analytics.total_feedbacks, 0);
    }

    #[test]
    fn test_average_over_rated_messages_only() {
        // One 4-star rating plus an unrated "helpful" vote: the unrated
        // vote must not drag the average down.
        let messages = vec![
            rated_reply(Some(4), None),
            rated_reply(None, Some(true)),
        ];
        let analytics = feedback_analytics(&[conversation_with(messages)]);
        assert_eq!(analytics.total_feedbacks, 2);
        assert_eq!(analytics.average_rating, 4.0);
        assert_eq!(analytics.helpful_count, 1);
    }

    #[test]
    fn test_distribution_and_helpful_counts() {
        let messages = vec![
            rated_reply(Some(5), Some(true)),
            rated_reply(Some(5), Some(true)),
            rated_reply(Some(2), Some(false)),
        ];
        let analytics = feedback_analytics(&[conversation_with(messages)]);
        assert_eq!(analytics.rating_distribution.five, 2);
        assert_eq!(analytics.rating_distribution.two, 1);
        assert_eq!(analytics.helpful_count, 2);
        assert_eq!(analytics.not_helpful_count, 1);
        assert!((analytics.average_rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distribution_wire_keys_are_numeric() {
        let analytics = feedback_analytics(&[]);
        let json = serde_json::to_value(&analytics).unwrap();
        assert!(json["ratingDistribution"].get("1").is_some());
        assert!(json["ratingDistribution"].get("5").is_some());
    }
}
