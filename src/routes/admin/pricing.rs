use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::mongo;
use crate::errors::BookingError;
use crate::models::pricing::{BlockedDateRange, PriceOverride, Season, SpecialPeriod};
use crate::services::dates::{parse_date, MonthDay};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInput {
    pub name: String,
    #[serde(rename = "type", default)]
    pub season_type: Option<String>,
    pub start_date: MonthDay,
    pub end_date: MonthDay,
    pub price_multiplier: f64,
    #[serde(default)]
    pub description: String,
}

pub async fn list_seasons(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    match mongo::pricing_seasons(&client).find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Season>>().await {
            Ok(seasons) => HttpResponse::Ok().json(seasons),
            Err(err) => {
                eprintln!("Error collecting seasons: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve seasons")
            }
        },
        Err(err) => {
            eprintln!("Error fetching seasons: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch seasons")
        }
    }
}

pub async fn create_season(
    data: web::Data<Arc<Client>>,
    input: web::Json<SeasonInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let input = input.into_inner();

    if input.price_multiplier <= 0.0 {
        return Ok(HttpResponse::BadRequest().body("Price multiplier must be positive"));
    }

    let season = Season {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        season_type: input.season_type.unwrap_or_else(|| "seasonal".to_string()),
        start_date: input.start_date,
        end_date: input.end_date,
        price_multiplier: input.price_multiplier,
        description: input.description,
    };
    mongo::pricing_seasons(&client).insert_one(&season).await?;
    Ok(HttpResponse::Ok().json(season))
}

pub async fn delete_season(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let result = mongo::pricing_seasons(&client)
        .delete_one(doc! { "_id": path.into_inner() })
        .await?;
    if result.deleted_count == 0 {
        return Ok(HttpResponse::NotFound().body("Season not found"));
    }
    Ok(HttpResponse::Ok().body("Season deleted"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialPeriodInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub price_multiplier: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<i32>,
}

pub async fn list_special_periods(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    match mongo::pricing_special_periods(&client).find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<SpecialPeriod>>().await {
            Ok(periods) => HttpResponse::Ok().json(periods),
            Err(err) => {
                eprintln!("Error collecting special periods: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve special periods")
            }
        },
        Err(err) => {
            eprintln!("Error fetching special periods: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch special periods")
        }
    }
}

pub async fn create_special_period(
    data: web::Data<Arc<Client>>,
    input: web::Json<SpecialPeriodInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let input = input.into_inner();

    if input.price_multiplier <= 0.0 {
        return Ok(HttpResponse::BadRequest().body("Price multiplier must be positive"));
    }
    let start_date = parse_date(&input.start_date)?;
    let end_date = parse_date(&input.end_date)?;
    if end_date < start_date {
        return Err(BookingError::InvalidDateRange(format!(
            "special period end {} precedes start {}",
            end_date, start_date
        )));
    }

    let period = SpecialPeriod {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        start_date,
        end_date,
        price_multiplier: input.price_multiplier,
        description: input.description,
        priority: input.priority,
    };
    mongo::pricing_special_periods(&client)
        .insert_one(&period)
        .await?;
    Ok(HttpResponse::Ok().json(period))
}

pub async fn delete_special_period(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let result = mongo::pricing_special_periods(&client)
        .delete_one(doc! { "_id": path.into_inner() })
        .await?;
    if result.deleted_count == 0 {
        return Ok(HttpResponse::NotFound().body("Special period not found"));
    }
    Ok(HttpResponse::Ok().body("Special period deleted"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideInput {
    pub room_id: String,
    pub date: String,
    pub price: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideQuery {
    pub room_id: Option<String>,
}

pub async fn list_overrides(
    data: web::Data<Arc<Client>>,
    params: web::Query<OverrideQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let filter = match &params.room_id {
        Some(room_id) => doc! { "roomId": room_id },
        None => doc! {},
    };
    match mongo::pricing_overrides(&client).find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<PriceOverride>>().await {
            Ok(overrides) => HttpResponse::Ok().json(overrides),
            Err(err) => {
                eprintln!("Error collecting overrides: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve overrides")
            }
        },
        Err(err) => {
            eprintln!("Error fetching overrides: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch overrides")
        }
    }
}

pub async fn create_override(
    data: web::Data<Arc<Client>>,
    input: web::Json<OverrideInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let input = input.into_inner();

    if input.price <= 0.0 {
        return Ok(HttpResponse::BadRequest().body("Override price must be positive"));
    }
    let date = parse_date(&input.date)?;

    // One override per (room, date): replace silently rather than stack
    mongo::pricing_overrides(&client)
        .delete_many(doc! { "roomId": &input.room_id, "date": date.to_string() })
        .await?;

    let price_override = PriceOverride {
        id: Uuid::new_v4().to_string(),
        room_id: input.room_id,
        date,
        price: input.price,
        reason: input.reason,
    };
    mongo::pricing_overrides(&client)
        .insert_one(&price_override)
        .await?;
    Ok(HttpResponse::Ok().json(price_override))
}

pub async fn delete_override(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let result = mongo::pricing_overrides(&client)
        .delete_one(doc! { "_id": path.into_inner() })
        .await?;
    if result.deleted_count == 0 {
        return Ok(HttpResponse::NotFound().body("Override not found"));
    }
    Ok(HttpResponse::Ok().body("Override deleted"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDateInput {
    pub room_id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub reason: String,
}

pub async fn list_blocked_dates(
    data: web::Data<Arc<Client>>,
    params: web::Query<OverrideQuery>,
) -> impl Responder {
    let client = data.into_inner();
    let filter = match &params.room_id {
        Some(room_id) => doc! { "roomId": room_id },
        None => doc! {},
    };
    match mongo::blocked_dates(&client).find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<BlockedDateRange>>().await {
            Ok(ranges) => HttpResponse::Ok().json(ranges),
            Err(err) => {
                eprintln!("Error collecting blocked dates: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve blocked dates")
            }
        },
        Err(err) => {
            eprintln!("Error fetching blocked dates: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch blocked dates")
        }
    }
}

pub async fn create_blocked_date(
    data: web::Data<Arc<Client>>,
    input: web::Json<BlockedDateInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let input = input.into_inner();

    let from = parse_date(&input.from)?;
    let to = parse_date(&input.to)?;
    if to <= from {
        return Err(BookingError::InvalidDateRange(format!(
            "blocked range end {} must be after start {}",
            to, from
        )));
    }

    let range = BlockedDateRange {
        id: Uuid::new_v4().to_string(),
        room_id: input.room_id,
        from,
        to,
        reason: input.reason,
        booking_id: None,
    };
    mongo::blocked_dates(&client).insert_one(&range).await?;
    Ok(HttpResponse::Ok().json(range))
}

pub async fn delete_blocked_date(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let result = mongo::blocked_dates(&client)
        .delete_one(doc! { "_id": path.into_inner() })
        .await?;
    if result.deleted_count == 0 {
        return Ok(HttpResponse::NotFound().body("Blocked date range not found"));
    }
    Ok(HttpResponse::Ok().body("Blocked date range deleted"))
}

#[derive(Deserialize)]
pub struct BasePriceInput {
    pub price: f64,
}

pub async fn update_base_price(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<BasePriceInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let room_id = path.into_inner();

    if input.price <= 0.0 {
        return Ok(HttpResponse::BadRequest().body("Base price must be positive"));
    }

    let result = mongo::rooms(&client)
        .update_one(
            doc! { "_id": &room_id },
            doc! { "$set": { "price": input.price } },
        )
        .await?;
    if result.matched_count == 0 {
        return Err(BookingError::RoomNotFound(room_id));
    }
    println!("Base price for room {} set to {}", room_id, input.price);
    Ok(HttpResponse::Ok().body("Base price updated"))
}

/// Stays whose checkout has passed move to the terminal `completed` state.
pub async fn sweep_completed_bookings(
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let today = Utc::now().date_naive();

    // ISO date strings compare lexicographically in date order
    let result = mongo::bookings(&client)
        .update_many(
            doc! {
                "checkOut": { "$lte": today.to_string() },
                "status": { "$in": ["confirmed", "paid"] },
            },
            doc! { "$set": { "status": "completed", "updatedAt": bson::DateTime::now() } },
        )
        .await?;

    println!("Marked {} bookings completed", result.modified_count);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "completed": result.modified_count })))
}
