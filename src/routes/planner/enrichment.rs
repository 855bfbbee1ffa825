use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::destination::Destination;
use crate::models::itinerary::{schedule_order, ItineraryItem};
use crate::routes::planner::itineraries::find_owned_itinerary;
use crate::services::routing_service::RoutingService;
use crate::services::weather_service::WeatherService;

/// Current weather for every unique city in the itinerary. A city the
/// upstream can't resolve gets an inline error entry; the request itself
/// still succeeds.
pub async fn itinerary_weather(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let destinations = match scheduled_destinations(&client, itinerary.id.unwrap_or_default()).await
    {
        Ok(destinations) => destinations,
        Err(err) => {
            eprintln!("Failed to load itinerary destinations: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to load itinerary");
        }
    };

    let mut cities: Vec<String> = destinations.iter().map(|d| d.city.clone()).collect();
    cities.sort();
    cities.dedup();

    if cities.is_empty() {
        return HttpResponse::Ok().json(serde_json::json!({
            "message": "No destinations in this itinerary to fetch weather for."
        }));
    }

    let service = match WeatherService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Weather service unavailable: {}", err);
            return HttpResponse::InternalServerError().body("Weather service unavailable");
        }
    };

    HttpResponse::Ok().json(service.weather_for_cities(&cities).await)
}

/// A driving route through the itinerary's destinations in schedule order.
/// Unlike weather, any upstream failure fails the whole request.
pub async fn itinerary_route(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let itinerary = match find_owned_itinerary(&client, &user, &path.into_inner()).await {
        Ok(itinerary) => itinerary,
        Err(resp) => return resp,
    };

    let destinations = match scheduled_destinations(&client, itinerary.id.unwrap_or_default()).await
    {
        Ok(destinations) => destinations,
        Err(err) => {
            eprintln!("Failed to load itinerary destinations: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to load itinerary");
        }
    };

    // ORS expects [lon, lat] pairs
    let coordinates: Vec<[f64; 2]> = destinations
        .iter()
        .map(|d| [d.longitude, d.latitude])
        .collect();

    if coordinates.len() < 2 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "At least two destinations are required to calculate a route."
        }));
    }

    let service = match RoutingService::new() {
        Ok(service) => service,
        Err(err) => {
            eprintln!("Routing service unavailable: {}", err);
            return HttpResponse::InternalServerError().body("Routing service unavailable");
        }
    };

    match service.route_for_coordinates(&coordinates).await {
        Ok(summary) => HttpResponse::Ok().json(serde_json::json!({
            "route_geometry": summary.route_geometry,
            "total_distance_km": summary.total_distance_km,
            "total_duration_hours": summary.total_duration_hours,
        })),
        Err(error) => HttpResponse::BadRequest().json(serde_json::json!({ "error": error })),
    }
}

/// Destinations of an itinerary in schedule order, duplicates preserved.
async fn scheduled_destinations(
    client: &Client,
    itinerary_id: ObjectId,
) -> mongodb::error::Result<Vec<Destination>> {
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
        .iter()
        .filter_map(|item| catalog.get(&item.destination_id).cloned())
        .collect())
}
