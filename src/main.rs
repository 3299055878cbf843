use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use locanda_api::db;
use locanda_api::routes;
use locanda_api::routes::payment::StripeConfig;
use locanda_api::services::booking_service::RoomLocks;
use locanda_api::services::channel::{smoobu::SmoobuClient, StaticTokenProvider};

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
    println!("MongoDB connection established");

    let stripe_key = std::env::var("STRIPE_SECRET_KEY").unwrap_or_default();
    let stripe_client = Arc::new(stripe::Client::new(stripe_key));
    let stripe_config = StripeConfig {
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
    };

    let smoobu_key = std::env::var("SMOOBU_API_KEY").unwrap_or_default();
    let channel_client = Arc::new(SmoobuClient::new(StaticTokenProvider::new(smoobu_key)));

    let room_locks = Arc::new(RoomLocks::new());

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
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(stripe_client.clone()))
            .app_data(web::Data::new(stripe_config.clone()))
            .app_data(web::Data::new(channel_client.clone()))
            .app_data(web::Data::new(room_locks.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .route(
                "/stripe/webhook",
                web::post().to(routes::payment::handle_stripe_webhook),
            )
            .service(
                web::scope("/api")
                    .route("/rooms", web::get().to(routes::room::get_rooms))
                    .route("/rooms/{id}", web::get().to(routes::room::get_room_by_id))
                    .route(
                        "/rooms/{id}/calendar",
                        web::get().to(routes::availability::get_room_calendar),
                    )
                    .route("/quote", web::post().to(routes::quote::create_quote))
                    .route(
                        "/availability",
                        web::get().to(routes::availability::check_availability),
                    )
                    .service(
                        web::scope("/bookings")
                            .route("", web::post().to(routes::booking::create_booking))
                            .route("/{id}", web::get().to(routes::booking::get_booking_by_id))
                            .route(
                                "/{id}/dates",
                                web::put().to(routes::booking::change_booking_dates),
                            )
                            .route(
                                "/{id}/cancel",
                                web::post().to(routes::booking::cancel_booking),
                            ),
                    )
                    .configure(routes::admin::config),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
