use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A message thread between a tourist and a vendor about one service.
/// The (service_id, tourist_id, vendor_id) triple carries a unique index,
/// so concurrent first contacts collapse onto a single thread.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Conversation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub service_id: ObjectId,
    pub tourist_id: ObjectId,
    pub vendor_id: ObjectId,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub conversation_id: ObjectId,
    pub sender_id: ObjectId,
    pub body: String,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct StartConversationInput {
    pub service_id: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageInput {
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub sender_id: ObjectId,
    pub sender_username: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub service_id: ObjectId,
    pub service_name: String,
    pub tourist_id: ObjectId,
    pub tourist_username: String,
    pub vendor_id: ObjectId,
    pub vendor_username: String,
    pub last_message: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    pub messages: Vec<MessageView>,
}
