use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Festival,
    Concert,
    Exhibition,
    Sport,
    Food,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Festival => "FESTIVAL",
            EventCategory::Concert => "CONCERT",
            EventCategory::Exhibition => "EXHIBITION",
            EventCategory::Sport => "SPORT",
            EventCategory::Food => "FOOD",
        }
    }
}

/// A festival, concert or similar happening around a city.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CulturalEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: EventCategory,
}
