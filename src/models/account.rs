use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    User,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub password: String, // Always hashed
    pub role: Option<AccountRole>,
    // Security related fields
    pub last_signin: Option<DateTime<Utc>>,
    pub failed_signins: Option<i32>,
    // We always want these fields, but have them optional so we can set them in the code
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelStyle {
    Adventure,
    Relaxation,
    Cultural,
    Family,
    Budget,
}

/// Travel preferences, exactly one per account. Created in the register
/// handler right after the account document so both lifecycles stay explicit.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub travel_style: TravelStyle,
    pub budget: Option<f64>,
    pub preferred_languages: String,
    pub avatar: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh: String,
}

/// A blacklisted refresh token id. Once a jti lands here the token can never
/// be exchanged again.
#[derive(Debug, Deserialize, Serialize)]
pub struct RevokedToken {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub jti: String,
    pub user_id: ObjectId,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub travel_style: TravelStyle,
    pub budget: Option<f64>,
    pub preferred_languages: String,
    pub avatar: Option<String>,
}

/// Account plus nested profile as returned to the client. The credential
/// hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct AccountView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub profile: ProfileView,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateInput {
    pub travel_style: Option<TravelStyle>,
    pub budget: Option<f64>,
    pub preferred_languages: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountUpdateInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile: Option<ProfileUpdateInput>,
}
