use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::{doc, Bson};
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::{is_duplicate_key, DB_NAME};
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::account::{Account, AccountUpdateInput, AccountView, Profile, ProfileView};

/// The caller's own account and travel preferences. There is no way to
/// address anybody else's profile from this endpoint.
pub async fn get_profile(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();

    match load_account_view(&client, &user).await {
        Ok(Some(view)) => HttpResponse::Ok().json(view),
        Ok(None) => HttpResponse::NotFound().body("Account not found"),
        Err(err) => {
            eprintln!("Failed to fetch profile: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch profile")
        }
    }
}

pub async fn update_profile(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<AccountUpdateInput>,
) -> impl Responder {
    let client = data.into_inner();
    let accounts: mongodb::Collection<Account> = client.database(DB_NAME).collection("Accounts");
    let profiles: mongodb::Collection<Profile> = client.database(DB_NAME).collection("Profiles");

    let input = input.into_inner();
    let curr_time = Utc::now();

    let updated_at = mongodb::bson::to_bson(&curr_time).unwrap_or(Bson::Null);

    let mut account_update = doc! { "updated_at": updated_at.clone() };
    if let Some(username) = &input.username {
        account_update.insert("username", username);
    }
    if let Some(email) = &input.email {
        account_update.insert("email", email);
    }

    match accounts
        .update_one(doc! { "_id": user.user_id }, doc! { "$set": account_update })
        .await
    {
        Ok(result) if result.matched_count == 0 => {
            return HttpResponse::NotFound().body("Account not found");
        }
        Ok(_) => {}
        Err(err) if is_duplicate_key(&err) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "A user with that username or email already exists."
            }));
        }
        Err(err) => {
            eprintln!("Failed to update account: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update profile");
        }
    }

    if let Some(profile_input) = input.profile {
        let mut profile_update = doc! { "updated_at": updated_at };
        if let Some(style) = profile_input.travel_style {
            profile_update.insert(
                "travel_style",
                mongodb::bson::to_bson(&style).unwrap_or(Bson::Null),
            );
        }
        if let Some(budget) = profile_input.budget {
            profile_update.insert("budget", budget);
        }
        if let Some(languages) = profile_input.preferred_languages {
            profile_update.insert("preferred_languages", languages);
        }
        if let Some(avatar) = profile_input.avatar {
            profile_update.insert("avatar", avatar);
        }

        if let Err(err) = profiles
            .update_one(
                doc! { "user_id": user.user_id },
                doc! { "$set": profile_update },
            )
            .await
        {
            eprintln!("Failed to update profile: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update profile");
        }
    }

    match load_account_view(&client, &user).await {
        Ok(Some(view)) => HttpResponse::Ok().json(view),
        Ok(None) => HttpResponse::NotFound().body("Account not found"),
        Err(err) => {
            eprintln!("Failed to fetch profile: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch profile")
        }
    }
}

async fn load_account_view(
    client: &Client,
    user: &AuthenticatedUser,
) -> mongodb::error::Result<Option<AccountView>> {
    let accounts: mongodb::Collection<Account> = client.database(DB_NAME).collection("Accounts");
    let profiles: mongodb::Collection<Profile> = client.database(DB_NAME).collection("Profiles");

    let account = match accounts.find_one(doc! { "_id": user.user_id }).await? {
        Some(account) => account,
        None => return Ok(None),
    };
    let profile = match profiles.find_one(doc! { "user_id": user.user_id }).await? {
        Some(profile) => profile,
        None => return Ok(None),
    };

    Ok(Some(AccountView {
        id: user.user_id,
        username: account.username,
        email: account.email,
        profile: ProfileView {
            travel_style: profile.travel_style,
            budget: profile.budget,
            preferred_languages: profile.preferred_languages,
            avatar: profile.avatar,
        },
    }))
}
