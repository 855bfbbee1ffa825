use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;
use crate::models::vendor::Vendor;

/// All vendor applications, unverified first so pending approvals surface at
/// the top.
pub async fn get_vendors(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Vendor> = client.database(DB_NAME).collection("Vendors");

    match collection
        .find(doc! {})
        .sort(doc! { "is_verified": 1, "created_at": -1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Vendor>>().await {
            Ok(vendors) => HttpResponse::Ok().json(vendors),
            Err(err) => {
                eprintln!("Failed to collect vendors: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect vendors")
            }
        },
        Err(err) => {
            eprintln!("Failed to find vendors: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find vendors")
        }
    }
}

pub async fn get_vendor_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Vendor> = client.database(DB_NAME).collection("Vendors");

    let vendor_id = match ObjectId::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid vendor ID"),
    };

    match collection.find_one(doc! { "_id": vendor_id }).await {
        Ok(Some(vendor)) => HttpResponse::Ok().json(vendor),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Vendor not found"
        })),
        Err(err) => {
            eprintln!("Failed to fetch vendor: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch vendor")
        }
    }
}

/// Flips a pending application to verified. Approving twice is reported as
/// an error rather than silently succeeding.
pub async fn approve_vendor(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Vendor> = client.database(DB_NAME).collection("Vendors");

    let vendor_id = match ObjectId::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid vendor ID"),
    };

    let vendor = match collection.find_one(doc! { "_id": vendor_id }).await {
        Ok(Some(vendor)) => vendor,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Vendor not found"
            }))
        }
        Err(err) => {
            eprintln!("Failed to fetch vendor: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to fetch vendor");
        }
    };

    if vendor.is_verified {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "status": "Vendor is already verified"
        }));
    }

    let update = doc! {
        "$set": {
            "is_verified": true,
            "updated_at": mongodb::bson::to_bson(&Utc::now()).unwrap_or(Bson::Null),
        }
    };

    match collection.update_one(doc! { "_id": vendor_id }, update).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "Vendor approved successfully"
        })),
        Err(err) => {
            eprintln!("Failed to approve vendor: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to approve vendor")
        }
    }
}
