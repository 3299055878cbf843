use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo::DB_NAME;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Check MongoDB connection
    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    // Check Stripe API (just validate key existence for now)
    let stripe_result = check_env_key("STRIPE_SECRET_KEY");
    health
        .services
        .insert("stripe".to_string(), stripe_result.clone());

    // Check Smoobu channel manager credentials
    let smoobu_result = check_env_key("SMOOBU_API_KEY");
    health
        .services
        .insert("smoobu".to_string(), smoobu_result.clone());

    if [mongo_result, stripe_result, smoobu_result]
        .iter()
        .any(|s| s.status != "ok")
    {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &Client) -> ServiceStatus {
    match client
        .database(DB_NAME)
        .run_command(doc! { "ping": 1 })
        .await
    {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => ServiceStatus {
            status: "error".to_string(),
            details: Some(e.to_string()),
        },
    }
}

fn check_env_key(key: &str) -> ServiceStatus {
    match env::var(key) {
        Ok(value) if !value.is_empty() => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        _ => ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} not configured", key)),
        },
    }
}
