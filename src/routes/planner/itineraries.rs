use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::itinerary::{Itinerary, ItineraryDetail, ItineraryInput};
use crate::routes::planner::items::load_item_details;

/// Resolves an itinerary the caller owns. An itinerary that exists under a
/// different owner is reported exactly like one that doesn't exist, so ids
/// can't be probed.
pub(crate) async fn find_owned_itinerary(
    client: &Client,
    user: &AuthenticatedUser,
    id: &str,
) -> Result<Itinerary, HttpResponse> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid ID"))?;

    let collection: mongodb::Collection<Itinerary> =
        client.database(DB_NAME).collection("Itineraries");

    match collection
        .find_one(doc! { "_id": oid, "user_id": user.user_id })
        .await
    {
        Ok(Some(itinerary)) => Ok(itinerary),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Itinerary not found."
        }))),
        Err(err) => {
            eprintln!("Failed to fetch itinerary: {:?}", err);
            Err(HttpResponse::InternalServerError().body("Failed to fetch itinerary"))
        }
    }
}

pub async fn create_itinerary(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<ItineraryInput>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Itinerary> =
        client.database(DB_NAME).collection("Itineraries");

    let input = input.into_inner();
    let curr_time = Utc::now();

    let mut itinerary = Itinerary {
        id: None,
        user_id: user.user_id,
        name: input.name,
        start_date: input.start_date,
        end_date: input.end_date,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    match collection.insert_one(&itinerary).await {
        Ok(result) => {
            itinerary.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(itinerary)
        }
        Err(err) => {
            eprintln!("Failed to insert itinerary: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create itinerary")
        }
    }
}

/// Only the caller's own trip plans, never anybody else's.
pub async fn get_itineraries(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Itinerary> =
        client.database(DB_NAME).collection("Itineraries");

    match collection
        .find(doc! { "user_id": user.user_id })
        .sort(doc! { "created_at": -1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Itinerary>>().await {
            Ok(itineraries) => HttpResponse::Ok().json(itineraries),
            Err(err) => {
                eprintln!("Failed to collect itineraries: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect itineraries")
            }
        },
        Err(err) => {
            eprintln!("Failed to retrieve itineraries: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve itineraries")
        }
    }
}

pub async fn get_itinerary(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let items = match load_item_details(&client, itinerary.id.unwrap_or_default()).await {
        Ok(items) => items,
        Err(err) => {
            eprintln!("Failed to load itinerary items: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to load itinerary items");
        }
    };

    HttpResponse::Ok().json(ItineraryDetail {
        id: itinerary.id.unwrap_or_default(),
        user_id: itinerary.user_id,
        name: itinerary.name,
        start_date: itinerary.start_date,
        end_date: itinerary.end_date,
        created_at: itinerary.created_at,
        items,
    })
}

pub async fn update_itinerary(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<ItineraryInput>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let collection: mongodb::Collection<Itinerary> =
        client.database(DB_NAME).collection("Itineraries");

    let input = input.into_inner();
    let update = doc! {
        "$set": {
            "name": &input.name,
            "start_date": mongodb::bson::to_bson(&input.start_date).unwrap_or(mongodb::bson::Bson::Null),
            "end_date": mongodb::bson::to_bson(&input.end_date).unwrap_or(mongodb::bson::Bson::Null),
            "updated_at": mongodb::bson::to_bson(&Utc::now()).unwrap_or(mongodb::bson::Bson::Null),
        }
    };

    match collection
        .update_one(doc! { "_id": itinerary.id.unwrap_or_default() }, update)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(Itinerary {
            name: input.name,
            start_date: input.start_date,
            end_date: input.end_date,
            updated_at: Some(Utc::now()),
            ..itinerary
        }),
        Err(err) => {
            eprintln!("Failed to update itinerary: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update itinerary")
        }
    }
}

/// Removing a trip plan removes its scheduled items with it.
pub async fn delete_itinerary(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };
    let itinerary_id = itinerary.id.unwrap_or_default();

    let itineraries: mongodb::Collection<Itinerary> =
        client.database(DB_NAME).collection("Itineraries");

    match itineraries.delete_one(doc! { "_id": itinerary_id }).await {
        Ok(_) => {
            let items: mongodb::Collection<crate::models::itinerary::ItineraryItem> =
                client.database(DB_NAME).collection("ItineraryItems");
            if let Err(err) = items.delete_many(doc! { "itinerary_id": itinerary_id }).await {
                eprintln!("Failed to cascade itinerary items: {:?}", err);
            }
            HttpResponse::NoContent().finish()
        }
        Err(err) => {
            eprintln!("Failed to delete itinerary: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete itinerary")
        }
    }
}
