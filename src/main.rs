use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripweaver_api::config::AppConfig;
use tripweaver_api::db;
use tripweaver_api::middleware::auth::AuthMiddleware;
use tripweaver_api::routes;
use tripweaver_api::routes::payment::StripeConfig;
use tripweaver_api::services::gemini::GeminiClient;
use tripweaver_api::services::geocoding::GeocodingService;
use tripweaver_api::services::photos::PhotoService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let config = AppConfig::from_env().expect("Incomplete environment configuration");
    log::info!("Binding to {}:{}", config.host, config.port);

    let mongo_client = db::mongo::create_mongo_client(&config.mongodb_uri).await;

    let stripe_client = Arc::new(stripe::Client::new(config.stripe_secret_key.clone()));
    let stripe_config = StripeConfig {
        webhook_secret: config.stripe_webhook_secret.clone(),
        price_id: config.stripe_price_id.clone(),
    };

    let gemini_client =
        Arc::new(GeminiClient::from_env().expect("Gemini configuration is incomplete"));
    let geocoding_service = GeocodingService::new().expect("Failed to build geocoding client");
    let photo_service = PhotoService::from_env().expect("Flickr configuration is incomplete");

    let host = config.host.clone();
    let port = config.port;

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
            .app_data(web::Data::new(mongo_client.clone()))
            .app_data(web::Data::new(stripe_client.clone()))
            .app_data(web::Data::new(stripe_config.clone()))
            .app_data(web::Data::new(gemini_client.clone()))
            .app_data(web::Data::new(geocoding_service.clone()))
            .app_data(web::Data::new(photo_service.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .route(
                "/stripe/webhook",
                web::post().to(routes::payment::handle_stripe_webhook),
            )
            .service(
                web::scope("/api")
                    // Public routes
                    .route("/plan", web::post().to(routes::plan::generate))
                    .route("/places", web::get().to(routes::location::search_places))
                    .route("/photos", web::get().to(routes::location::search_photos))
                    .route(
                        "/shared/{share_id}",
                        web::get().to(routes::trip::get_shared_trip),
                    )
                    // Protected routes
                    .service(
                        web::scope("/trips")
                            .wrap(AuthMiddleware)
                            .route("", web::post().to(routes::trip::save_trip))
                            .route("", web::get().to(routes::trip::list_trips))
                            .route("/{id}", web::get().to(routes::trip::get_trip))
                            .route("/{id}", web::put().to(routes::trip::update_trip))
                            .route("/{id}", web::delete().to(routes::trip::delete_trip))
                            .route(
                                "/{id}/trajectory",
                                web::get().to(routes::itinerary::get_trajectory),
                            )
                            .route(
                                "/{id}/photos",
                                web::get().to(routes::trip::get_trip_photos),
                            )
                            .route(
                                "/{id}/activities",
                                web::post().to(routes::itinerary::append_activity),
                            )
                            .route(
                                "/{id}/activities/reorder",
                                web::put().to(routes::itinerary::reorder_activity),
                            )
                            .route(
                                "/{id}/activities/move",
                                web::put().to(routes::itinerary::move_activity),
                            )
                            .route(
                                "/{id}/activities/drop",
                                web::put().to(routes::itinerary::drop_activity),
                            )
                            .route(
                                "/{id}/activities/{day}/{index}",
                                web::delete().to(routes::itinerary::delete_activity),
                            ),
                    )
                    .service(
                        web::scope("/payment")
                            .wrap(AuthMiddleware)
                            .route(
                                "/checkout-session",
                                web::post().to(routes::payment::create_checkout_session),
                            )
                            .route(
                                "/checkout-session/{id}/verify",
                                web::get().to(routes::payment::verify_checkout_session),
                            )
                            .route(
                                "/subscription",
                                web::get().to(routes::payment::subscription_status),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
