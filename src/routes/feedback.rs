use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::feedback::{Feedback, FeedbackInput, FeedbackStatus};

/// Files a piece of feedback for the calling user. Status starts at NEW and
/// is only ever moved by admins.
pub async fn submit_feedback(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<FeedbackInput>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Feedback> =
        client.database(DB_NAME).collection("Feedback");

    let input = input.into_inner();

    let mut feedback = Feedback {
        id: None,
        user_id: Some(user.user_id),
        subject: input.subject,
        message: input.message,
        rating: input.rating,
        status: FeedbackStatus::New,
        created_at: Some(Utc::now()),
    };

    match collection.insert_one(&feedback).await {
        Ok(result) => {
            feedback.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(feedback)
        }
        Err(err) => {
            eprintln!("Failed to insert feedback: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to submit feedback")
        }
    }
}
