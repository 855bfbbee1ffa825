use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::destination::Destination;
use crate::models::itinerary::{schedule_order, ItineraryItem, ItineraryItemDetail, ItineraryItemInput};
use crate::routes::planner::itineraries::find_owned_itinerary;

/// Loads an itinerary's items in schedule order with their destinations
/// embedded.
pub(crate) async fn load_item_details(
    client: &Client,
    itinerary_id: ObjectId,
) -> mongodb::error::Result<Vec<ItineraryItemDetail>> {
    let items: mongodb::Collection<ItineraryItem> =
        client.database(DB_NAME).collection("ItineraryItems");
    let destinations: mongodb::Collection<Destination> =
        client.database(DB_NAME).collection("Destinations");

    let mut scheduled = items
        .find(doc! { "itinerary_id": itinerary_id })
        .await?
        .try_collect::<Vec<ItineraryItem>>()
        .await?;
    scheduled.sort_by(schedule_order);

    let ids: Vec<ObjectId> = scheduled.iter().map(|item| item.destination_id).collect();
    let catalog: HashMap<ObjectId, Destination> = destinations
        .find(doc! { "_id": { "$in": ids } })
        .await?
        .try_collect::<Vec<Destination>>()
        .await?
        .into_iter()
        .filter_map(|d| d.id.map(|id| (id, d)))
        .collect();

    Ok(scheduled
        .into_iter()
        .filter_map(|item| {
            let destination = catalog.get(&item.destination_id)?.clone();
            Some(ItineraryItemDetail {
                id: item.id.unwrap_or_default(),
                destination,
                day_number: item.day_number,
                start_time: item.start_time,
                end_time: item.end_time,
            })
        })
        .collect())
}

pub async fn add_item(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<ItineraryItemInput>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let input = input.into_inner();
    let destination_id = match ObjectId::parse_str(&input.destination_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid destination ID"),
    };

    let destinations: mongodb::Collection<Destination> =
        client.database(DB_NAME).collection("Destinations");
    match destinations.find_one(doc! { "_id": destination_id }).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Destination not found."
            }))
        }
        Err(err) => {
            eprintln!("Failed to fetch destination: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch destination");
        }
    }

    let items: mongodb::Collection<ItineraryItem> =
        client.database(DB_NAME).collection("ItineraryItems");

    // Two visits may share a day and time slot; scheduling is permissive.
    let item = ItineraryItem {
        id: None,
        itinerary_id: itinerary.id.unwrap_or_default(),
        destination_id,
        day_number: input.day_number,
        start_time: input.start_time,
        end_time: input.end_time,
        created_at: Some(Utc::now()),
    };

    match items.insert_one(&item).await {
        Ok(result) => {
            let mut created = item;
            created.id = result.inserted_id.as_object_id();
            HttpResponse::Created().json(created)
        }
        Err(err) => {
            eprintln!("Failed to insert itinerary item: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to add item")
        }
    }
}

pub async fn get_items(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    match load_item_details(&client, itinerary.id.unwrap_or_default()).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => {
            eprintln!("Failed to load itinerary items: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to load itinerary items")
        }
    }
}

pub async fn update_item(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<(String, String)>,
    input: web::Json<ItineraryItemInput>,
) -> impl Responder {
    let client = data.into_inner();
    let (itinerary_id, item_id) = path.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &itinerary_id).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let item_oid = match ObjectId::parse_str(&item_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid item ID"),
    };

    let input = input.into_inner();
    let destination_id = match ObjectId::parse_str(&input.destination_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid destination ID"),
    };

    let items: mongodb::Collection<ItineraryItem> =
        client.database(DB_NAME).collection("ItineraryItems");

    let update = doc! {
        "$set": {
            "destination_id": destination_id,
            "day_number": input.day_number,
            "start_time": mongodb::bson::to_bson(&input.start_time).unwrap_or(Bson::Null),
            "end_time": mongodb::bson::to_bson(&input.end_time).unwrap_or(Bson::Null),
        }
    };

    let filter = doc! {
        "_id": item_oid,
        "itinerary_id": itinerary.id.unwrap_or_default(),
    };

    match items.update_one(filter.clone(), update).await {
        Ok(result) if result.matched_count == 0 => HttpResponse::NotFound().json(
            serde_json::json!({ "error": "Itinerary item not found." }),
        ),
        Ok(_) => match items.find_one(filter).await {
            Ok(Some(item)) => HttpResponse::Ok().json(item),
            Ok(None) => HttpResponse::NotFound()
                .json(serde_json::json!({ "error": "Itinerary item not found." })),
            Err(err) => {
                eprintln!("Failed to fetch updated item: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to update item")
            }
        },
        Err(err) => {
            eprintln!("Failed to update item: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update item")
        }
    }
}

pub async fn delete_item(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let client = data.into_inner();
    let (itinerary_id, item_id) = path.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &itinerary_id).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let item_oid = match ObjectId::parse_str(&item_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid item ID"),
    };

    let items: mongodb::Collection<ItineraryItem> =
        client.database(DB_NAME).collection("ItineraryItems");

    match items
        .delete_one(doc! { "_id": item_oid, "itinerary_id": itinerary.id.unwrap_or_default() })
        .await
    {
        Ok(result) if result.deleted_count == 0 => HttpResponse::NotFound().json(
            serde_json::json!({ "error": "Itinerary item not found." }),
        ),
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => {
            eprintln!("Failed to delete item: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete item")
        }
    }
}
