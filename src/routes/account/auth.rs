use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::mongo::{is_duplicate_key, DB_NAME};
use crate::middleware::auth::Claims;
use crate::models::account::{
    Account, AccountRole, LoginInput, Profile, RefreshInput, RegisterInput, RevokedToken,
    TokenPair, TravelStyle,
};

const ACCESS_TOKEN_HOURS: i64 = 1;
const REFRESH_TOKEN_DAYS: i64 = 7;

/// Claims carried by refresh tokens. The `jti` is what the logout blacklist
/// keys on.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    pub user_id: String,
    pub jti: String,
}

pub async fn register(
    data: web::Data<Arc<Client>>,
    input: web::Json<RegisterInput>,
) -> impl Responder {
    let client = data.into_inner();
    let accounts: mongodb::Collection<Account> = client.database(DB_NAME).collection("Accounts");
    let profiles: mongodb::Collection<Profile> = client.database(DB_NAME).collection("Profiles");

    let input = input.into_inner();

    if !is_valid_email(&input.email) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid email address"
        }));
    }

    if input.password != input.password2 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Password fields didn't match."
        }));
    }

    let hashed = match bcrypt::hash(&input.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            eprintln!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account");
        }
    };

    let curr_time = Utc::now();
    let account = Account {
        id: None,
        username: input.username,
        email: input.email,
        password: hashed,
        role: Some(AccountRole::User),
        last_signin: None,
        failed_signins: Some(0),
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    let account_id = match accounts.insert_one(&account).await {
        Ok(result) => result.inserted_id.as_object_id().unwrap(),
        Err(err) if is_duplicate_key(&err) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "A user with that username or email already exists."
            }));
        }
        Err(err) => {
            eprintln!("Failed to insert account: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account");
        }
    };

    // Second step of registration. If the profile write fails, the
    // half-created account is rolled back.
    let profile = Profile {
        id: None,
        user_id: account_id,
        travel_style: TravelStyle::Relaxation,
        budget: None,
        preferred_languages: "English".to_string(),
        avatar: None,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    if let Err(err) = profiles.insert_one(&profile).await {
        eprintln!("Failed to insert profile: {:?}", err);
        let _ = accounts.delete_one(doc! { "_id": account_id }).await;
        return HttpResponse::InternalServerError().body("Failed to create account");
    }

    match issue_token_pair(&account.username, account_id, account.role) {
        Ok(tokens) => HttpResponse::Created().json(tokens),
        Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
    }
}

pub async fn login(data: web::Data<Arc<Client>>, input: web::Json<LoginInput>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Account> = client.database(DB_NAME).collection("Accounts");

    let input = input.into_inner();
    let filter = doc! { "username": &input.username };

    match collection.find_one(filter).await {
        Ok(Some(account)) => {
            if bcrypt::verify(&input.password, &account.password).unwrap_or(false) {
                let update = doc! {
                    "$set": {
                        "last_signin": mongodb::bson::to_bson(&Utc::now()).unwrap_or(mongodb::bson::Bson::Null),
                        "failed_signins": 0
                    }
                };

                if let Err(err) = collection
                    .update_one(doc! { "username": &input.username }, update)
                    .await
                {
                    eprintln!("Failed to update document: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to sign in.");
                }

                let account_id = account.id.expect("Unable to read account id.");
                match issue_token_pair(&account.username, account_id, account.role) {
                    Ok(tokens) => HttpResponse::Ok().json(tokens),
                    Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
                }
            } else {
                let failed_signins = account.failed_signins.unwrap_or(0) + 1;
                let update = doc! {
                    "$set": { "failed_signins": failed_signins }
                };

                match collection
                    .update_one(doc! { "username": &input.username }, update)
                    .await
                {
                    Ok(_) => HttpResponse::Unauthorized().body("Invalid credentials"),
                    Err(err) => {
                        eprintln!("Failed to update failed signins: {:?}", err);
                        HttpResponse::InternalServerError().body("Failed to process signin")
                    }
                }
            }
        }
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to process signin")
        }
    }
}

/// Exchanges a refresh token for a fresh access token. Blacklisted or
/// malformed tokens are both turned away with 401.
pub async fn refresh(data: web::Data<Arc<Client>>, input: web::Json<RefreshInput>) -> impl Responder {
    let client = data.into_inner();

    let claims = match decode_refresh_token(&input.refresh) {
        Ok(claims) => claims,
        Err(_) => return HttpResponse::Unauthorized().body("Invalid refresh token"),
    };

    let revoked: mongodb::Collection<RevokedToken> =
        client.database(DB_NAME).collection("RevokedTokens");

    match revoked.find_one(doc! { "jti": &claims.jti }).await {
        Ok(Some(_)) => return HttpResponse::Unauthorized().body("Token has been revoked"),
        Ok(None) => {}
        Err(err) => {
            eprintln!("Failed to check revoked tokens: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to refresh token");
        }
    }

    let accounts: mongodb::Collection<Account> = client.database(DB_NAME).collection("Accounts");
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::Unauthorized().body("Invalid refresh token"),
    };

    match accounts.find_one(doc! { "_id": user_id }).await {
        Ok(Some(account)) => match generate_access_token(&claims.sub, user_id, account.role) {
            Ok(access) => HttpResponse::Ok().json(serde_json::json!({ "access": access })),
            Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
        },
        Ok(None) => HttpResponse::Unauthorized().body("Invalid refresh token"),
        Err(err) => {
            eprintln!("Failed to fetch account: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to refresh token")
        }
    }
}

/// Blacklists the presented refresh token. Once revoked, the same token can
/// never be exchanged again.
pub async fn logout(data: web::Data<Arc<Client>>, input: web::Json<RefreshInput>) -> impl Responder {
    let client = data.into_inner();

    let claims = match decode_refresh_token(&input.refresh) {
        Ok(claims) => claims,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "An error occurred during logout."
            }))
        }
    };

    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "An error occurred during logout."
            }))
        }
    };

    let revoked: mongodb::Collection<RevokedToken> =
        client.database(DB_NAME).collection("RevokedTokens");

    let entry = RevokedToken {
        id: None,
        jti: claims.jti,
        user_id,
        revoked_at: Some(Utc::now()),
    };

    match revoked.insert_one(&entry).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) if is_duplicate_key(&err) => {
            // Already blacklisted
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "An error occurred during logout."
            }))
        }
        Err(err) => {
            eprintln!("Failed to blacklist token: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to log out")
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    return re.unwrap().is_match(email);
}

fn role_str(role: Option<AccountRole>) -> String {
    match role {
        Some(AccountRole::Admin) => "admin".to_string(),
        _ => "user".to_string(),
    }
}

pub fn generate_access_token(
    username: &str,
    user_id: ObjectId,
    role: Option<AccountRole>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();

    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(ACCESS_TOKEN_HOURS)).timestamp() as usize,
        user_id: user_id.to_string(),
        role: Some(role_str(role)),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}

fn generate_refresh_token(
    username: &str,
    user_id: ObjectId,
) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let now = Utc::now();

    let claims = RefreshClaims {
        sub: username.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(REFRESH_TOKEN_DAYS)).timestamp() as usize,
        user_id: user_id.to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}

fn issue_token_pair(
    username: &str,
    user_id: ObjectId,
    role: Option<AccountRole>,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    Ok(TokenPair {
        access: generate_access_token(username, user_id, role)?,
        refresh: generate_refresh_token(username, user_id)?,
    })
}

fn decode_refresh_token(token: &str) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
    let key = std::env::var("JWT_SECRET").unwrap_or_else(|_| "default_secret".to_string());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "iat", "sub", "user_id", "jti"]);

    decode::<RefreshClaims>(token, &DecodingKey::from_secret(key.as_bytes()), &validation)
        .map(|data| data.claims)
}
