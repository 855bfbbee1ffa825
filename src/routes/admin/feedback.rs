use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::models::feedback::{Feedback, FeedbackStatusInput};

/// The feedback queue, open statuses first, newest within each status.
pub async fn get_feedback(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Feedback> =
        client.database(DB_NAME).collection("Feedback");

    match collection
        .find(doc! {})
        .sort(doc! { "status": 1, "created_at": -1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Feedback>>().await {
            Ok(feedback) => HttpResponse::Ok().json(feedback),
            Err(err) => {
                eprintln!("Failed to collect feedback: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect feedback")
            }
        },
        Err(err) => {
            eprintln!("Failed to find feedback: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find feedback")
        }
    }
}

/// Moves a feedback entry through the status workflow. Only the status is
/// writable; the submitted note itself stays as filed.
pub async fn update_feedback_status(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<FeedbackStatusInput>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Feedback> =
        client.database(DB_NAME).collection("Feedback");

    let feedback_id = match ObjectId::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid feedback ID"),
    };

    let update = doc! {
        "$set": {
            "status": mongodb::bson::to_bson(&input.status).unwrap_or(Bson::Null),
        }
    };

    match collection
        .update_one(doc! { "_id": feedback_id }, update)
        .await
    {
        Ok(result) if result.matched_count == 0 => HttpResponse::NotFound().json(
            serde_json::json!({ "error": "Feedback not found" }),
        ),
        Ok(_) => match collection.find_one(doc! { "_id": feedback_id }).await {
            Ok(Some(feedback)) => HttpResponse::Ok().json(feedback),
            Ok(None) => HttpResponse::NotFound()
                .json(serde_json::json!({ "error": "Feedback not found" })),
            Err(err) => {
                eprintln!("Failed to fetch feedback: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to update feedback")
            }
        },
        Err(err) => {
            eprintln!("Failed to update feedback: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update feedback")
        }
    }
}
