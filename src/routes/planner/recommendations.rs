use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::doc;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::account::Profile;
use crate::services::recommendation_service::recommend_destinations;

/// Destination suggestions driven by the caller's travel style and budget.
pub async fn get_recommendations(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let profiles: mongodb::Collection<Profile> = client.database(DB_NAME).collection("Profiles");

    let profile = match profiles.find_one(doc! { "user_id": user.user_id }).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return HttpResponse::NotFound().body("Profile not found"),
        Err(err) => {
            eprintln!("Failed to fetch profile: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch profile");
        }
    };

    match recommend_destinations(&client, &profile).await {
        Ok(recommendations) if recommendations.is_empty() => {
            HttpResponse::NotFound().json(serde_json::json!({
                "message": "Could not find recommendations matching your profile. Try adjusting your travel style or budget."
            }))
        }
        Ok(recommendations) => HttpResponse::Ok().json(recommendations),
        Err(err) => {
            eprintln!("Failed to compute recommendations: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to compute recommendations")
        }
    }
}
