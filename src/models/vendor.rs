use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A local business applying to sell services. One application per account;
/// `is_verified` is flipped by an administrator, never by the vendor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Vendor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub business_name: String,
    pub contact_phone: String,
    pub business_description: Option<String>,
    pub is_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct VendorInput {
    pub business_name: String,
    pub contact_phone: String,
    pub business_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Hotel,
    Guide,
    Transport,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Service {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub vendor_id: ObjectId,
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub price: f64,
    // Context for the price, e.g. "per night", "per hour"
    pub price_per: String,
    pub city: String,
    pub is_available: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub price: f64,
    pub price_per: Option<String>,
    pub city: String,
    pub is_available: Option<bool>,
}
