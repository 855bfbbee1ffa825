use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use actix_cors::Cors;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use safarnama_api::db::mongo::create_mongo_client;
use safarnama_api::middleware::auth::AuthMiddleware;
use safarnama_api::middleware::role_auth::RequireRole;
use safarnama_api::models::account::AccountRole;
use safarnama_api::routes;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        std::env::set_var("JWT_SECRET", "test_secret");
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = create_mongo_client(&mongo_uri).await;

        Self { client }
    }

    /// The route tree under test. Validation-only paths use the real
    /// handlers (they reject input before ever touching the store); the
    /// store-backed endpoints are mocked so the suite runs without a live
    /// database.
    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.client.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(mock_register))
                            .route("/login", web::post().to(mock_unauthorized))
                            .route("/login/refresh", web::post().to(mock_unauthorized))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route("/profile", web::get().to(whoami)),
                            ),
                    )
                    .service(
                        web::scope("/planner")
                            .route("/destinations", web::get().to(mock_empty_list))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route(
                                        "/itineraries/{id}",
                                        web::get().to(
                                            routes::planner::itineraries::get_itinerary,
                                        ),
                                    )
                                    .route(
                                        "/itineraries/{id}/items/{item_id}",
                                        web::delete()
                                            .to(routes::planner::items::delete_item),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/vendors")
                            .wrap(AuthMiddleware)
                            .route(
                                "/bookings",
                                web::post().to(routes::vendor::bookings::create_booking),
                            ),
                    )
                    .service(
                        web::scope("/messaging")
                            .wrap(AuthMiddleware)
                            .route(
                                "/conversations",
                                web::post().to(routes::messaging::start_conversation),
                            )
                            .route(
                                "/conversations/{id}/messages",
                                web::post().to(routes::messaging::send_message),
                            ),
                    )
                    .service(
                        web::scope("/utils")
                            .wrap(AuthMiddleware)
                            .route("/translate", web::post().to(routes::utils::translate)),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(RequireRole::new(AccountRole::Admin))
                            .wrap(AuthMiddleware)
                            .route("/vendors", web::get().to(mock_empty_list)),
                    ),
            )
    }
}

// Mock handler functions for endpoints that need a live store
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "OK"}))
}

async fn mock_empty_list() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn mock_register() -> impl Responder {
    HttpResponse::Created().json(serde_json::json!({
        "access": "mock_access_token",
        "refresh": "mock_refresh_token"
    }))
}

async fn mock_unauthorized() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Invalid credentials"}))
}

async fn whoami(user: safarnama_api::middleware::auth_context::AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "user_id": user.user_id.to_string(),
        "username": user.username,
    }))
}

/// A signed bearer token for a throwaway account id.
pub fn auth_token(role: &str) -> String {
    std::env::set_var("JWT_SECRET", "test_secret");
    let account_role = if role == "admin" {
        Some(AccountRole::Admin)
    } else {
        Some(AccountRole::User)
    };
    safarnama_api::routes::account::auth::generate_access_token(
        "testuser",
        ObjectId::new(),
        account_role,
    )
    .expect("token generation failed")
}
