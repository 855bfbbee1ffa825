use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use safarnama_api::db;
use safarnama_api::middleware::auth::AuthMiddleware;
use safarnama_api::routes;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    if let Err(err) = db::mongo::ensure_indexes(&client).await {
        eprintln!("WARNING: Failed to create indexes: {}", err);
    }
    if let Err(err) = db::seed::seed_destinations(&client).await {
        eprintln!("WARNING: Failed to seed destinations: {}", err);
    }

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(routes::health::health_check))
            .app_data(web::Data::new(client.clone()))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            // Public routes
                            .route("/register", web::post().to(routes::account::auth::register))
                            .route("/login", web::post().to(routes::account::auth::login))
                            .route(
                                "/login/refresh",
                                web::post().to(routes::account::auth::refresh),
                            )
                            // Protected routes
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route(
                                        "/logout",
                                        web::post().to(routes::account::auth::logout),
                                    )
                                    .route(
                                        "/profile",
                                        web::get().to(routes::account::profile::get_profile),
                                    )
                                    .route(
                                        "/profile",
                                        web::put().to(routes::account::profile::update_profile),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/planner")
                            .route(
                                "/destinations",
                                web::get().to(routes::planner::destinations::get_destinations),
                            )
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
                                    .route(
                                        "/recommendations",
                                        web::get()
                                            .to(routes::planner::recommendations::get_recommendations),
                                    )
                                    .route(
                                        "/events",
                                        web::get().to(routes::planner::events::get_events),
                                    )
                                    .route(
                                        "/itineraries",
                                        web::post()
                                            .to(routes::planner::itineraries::create_itinerary),
                                    )
                                    .route(
                                        "/itineraries",
                                        web::get().to(routes::planner::itineraries::get_itineraries),
                                    )
                                    .route(
                                        "/itineraries/{id}",
                                        web::get().to(routes::planner::itineraries::get_itinerary),
                                    )
                                    .route(
                                        "/itineraries/{id}",
                                        web::put()
                                            .to(routes::planner::itineraries::update_itinerary),
                                    )
                                    .route(
                                        "/itineraries/{id}",
                                        web::delete()
                                            .to(routes::planner::itineraries::delete_itinerary),
                                    )
                                    .route(
                                        "/itineraries/{id}/items",
                                        web::post().to(routes::planner::items::add_item),
                                    )
                                    .route(
                                        "/itineraries/{id}/items",
                                        web::get().to(routes::planner::items::get_items),
                                    )
                                    .route(
                                        "/itineraries/{id}/items/{item_id}",
                                        web::put().to(routes::planner::items::update_item),
                                    )
                                    .route(
                                        "/itineraries/{id}/items/{item_id}",
                                        web::delete().to(routes::planner::items::delete_item),
                                    )
                                    .route(
                                        "/itineraries/{id}/weather",
                                        web::get()
                                            .to(routes::planner::enrichment::itinerary_weather),
                                    )
                                    .route(
                                        "/itineraries/{id}/route",
                                        web::get().to(routes::planner::enrichment::itinerary_route),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/vendors")
                            .wrap(AuthMiddleware)
                            .route(
                                "/register",
                                web::post().to(routes::vendor::vendors::register_vendor),
                            )
                            .route(
                                "/services",
                                web::get().to(routes::vendor::services::get_services),
                            )
                            .route(
                                "/services",
                                web::post().to(routes::vendor::services::create_service),
                            )
                            .route(
                                "/services/{id}",
                                web::get().to(routes::vendor::services::get_service),
                            )
                            .route(
                                "/services/{id}",
                                web::put().to(routes::vendor::services::update_service),
                            )
                            .route(
                                "/services/{id}",
                                web::delete().to(routes::vendor::services::delete_service),
                            )
                            .route(
                                "/bookings",
                                web::post().to(routes::vendor::bookings::create_booking),
                            )
                            .route(
                                "/bookings",
                                web::get().to(routes::vendor::bookings::get_bookings),
                            )
                            .route(
                                "/bookings/{id}",
                                web::get().to(routes::vendor::bookings::get_booking_by_id),
                            )
                            .route(
                                "/my-bookings",
                                web::get().to(routes::vendor::bookings::get_vendor_bookings),
                            )
                            .route(
                                "/my-bookings/{id}",
                                web::get().to(routes::vendor::bookings::get_vendor_booking_by_id),
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
                                "/conversations",
                                web::get().to(routes::messaging::get_conversations),
                            )
                            .route(
                                "/conversations/{id}",
                                web::get().to(routes::messaging::get_conversation),
                            )
                            .route(
                                "/conversations/{id}/messages",
                                web::post().to(routes::messaging::send_message),
                            ),
                    )
                    .service(
                        web::scope("/feedback")
                            .wrap(AuthMiddleware)
                            .route("", web::post().to(routes::feedback::submit_feedback)),
                    )
                    .service(
                        web::scope("/utils")
                            .wrap(AuthMiddleware)
                            .route("/translate", web::post().to(routes::utils::translate)),
                    )
                    .configure(routes::admin::config),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
