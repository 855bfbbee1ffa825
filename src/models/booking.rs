use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::vendor::Service;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A reservation of a service by a tourist. `total_price` is copied from the
/// service at creation and never recomputed afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub service_id: ObjectId,
    pub status: BookingStatus,
    pub service_start_date: NaiveDate,
    pub service_end_date: Option<NaiveDate>,
    pub total_price: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct BookingInput {
    pub service_id: String,
    pub service_start_date: NaiveDate,
    pub service_end_date: Option<NaiveDate>,
}

/// Booking as returned to either party, with the service embedded.
#[derive(Debug, Serialize)]
pub struct BookingDetails {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub service: Service,
    pub status: BookingStatus,
    pub service_start_date: NaiveDate,
    pub service_end_date: Option<NaiveDate>,
    pub total_price: f64,
    pub created_at: Option<DateTime<Utc>>,
}
