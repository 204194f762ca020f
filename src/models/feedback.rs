use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like/dislike classification of a single item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Like,
    Dislike,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Like => "like",
            FeedbackType::Dislike => "dislike",
        }
    }
}

impl Display for FeedbackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const FEEDBACK_ID_PREFIX: &str = "feedback";
const FEEDBACK_ID_SUFFIX_LEN: usize = 9;

/// Generates `feedback_{unix_millis}_{suffix}` with a random alphanumeric suffix
///
/// Unique within a process in practice, but not idempotent: resubmitting the
/// same action yields a new ID.
pub fn generate_feedback_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        FEEDBACK_ID_PREFIX,
        now.timestamp_millis(),
        &random[..FEEDBACK_ID_SUFFIX_LEN]
    )
}

/// A user's like/dislike signal against one item within a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    pub id: String,
    pub recommendation_id: String,
    pub item_id: String,
    pub feedback_type: FeedbackType,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Records a new feedback action with a client-generated ID
    pub fn new(
        user_id: impl Into<String>,
        recommendation_id: impl Into<String>,
        item_id: impl Into<String>,
        feedback_type: FeedbackType,
    ) -> Self {
        let created_at = Utc::now();
        Self {
            id: generate_feedback_id(created_at),
            recommendation_id: recommendation_id.into(),
            item_id: item_id.into(),
            feedback_type,
            user_id: user_id.into(),
            created_at,
        }
    }

    pub fn is_like(&self) -> bool {
        self.feedback_type == FeedbackType::Like
    }
}
