use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

/// A user-submitted note. `user_id` is nullable so feedback can outlive the
/// account that filed it; only admins move `status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Feedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: Option<ObjectId>,
    pub subject: String,
    pub message: String,
    pub rating: Option<u8>,
    pub status: FeedbackStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackInput {
    pub subject: String,
    pub message: String,
    pub rating: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackStatusInput {
    pub status: FeedbackStatus,
}
