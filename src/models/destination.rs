use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationType {
    Landmark,
    Museum,
    Restaurant,
    Park,
    HikingTrail,
    Beach,
}

impl DestinationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationType::Landmark => "LANDMARK",
            DestinationType::Museum => "MUSEUM",
            DestinationType::Restaurant => "RESTAURANT",
            DestinationType::Park => "PARK",
            DestinationType::HikingTrail => "HIKING_TRAIL",
            DestinationType::Beach => "BEACH",
        }
    }
}

/// A point of interest. Reference data seeded at startup, not user-owned.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Destination {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub destination_type: DestinationType,
    pub average_cost: f64,
    pub latitude: f64,
    pub longitude: f64,
}
