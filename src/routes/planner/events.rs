use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::{bson::doc, Client};
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::models::event::{CulturalEvent, EventCategory};

#[derive(serde::Deserialize)]
pub struct QueryParams {
    city: Option<String>,
    category: Option<EventCategory>,
}

/// Cultural events, soonest first, filterable by city and category.
/// Example: /api/planner/events?city=Gilgit&category=SPORT
pub async fn get_events(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<CulturalEvent> =
        client.database(DB_NAME).collection("CulturalEvents");

    let mut filter = doc! {};
    if let Some(city) = &params.city {
        filter.insert("city", city);
    }
    if let Some(category) = params.category {
        filter.insert("category", category.as_str());
    }

    match collection
        .find(filter)
        .sort(doc! { "start_date": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<CulturalEvent>>().await {
            Ok(events) => HttpResponse::Ok().json(events),
            Err(err) => {
                eprintln!("Failed to collect events: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect events")
            }
        },
        Err(err) => {
            eprintln!("Failed to find events: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find events")
        }
    }
}
