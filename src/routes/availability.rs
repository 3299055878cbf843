use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, Client};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::mongo;
use crate::errors::BookingError;
use crate::models::booking::Booking;
use crate::models::pricing::BlockedDateRange;
use crate::routes::quote::{fetch_pricing_rules, fetch_room};
use crate::services::availability_service::AvailabilityService;
use crate::services::dates::parse_date;
use crate::services::pricing_service::PricingService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub room_id: String,
    pub check_in: String,
    pub check_out: String,
}

/// Bookings that can hold dates against a new request.
pub async fn fetch_blocking_bookings(
    client: &Client,
    room_id: &str,
) -> Result<Vec<Booking>, mongodb::error::Error> {
    mongo::bookings(client)
        .find(doc! {
            "roomId": room_id,
            "status": { "$in": ["pending", "confirmed"] },
        })
        .await?
        .try_collect()
        .await
}

/// Booking-form check: can the website take these dates?
pub async fn check_availability(
    data: web::Data<Arc<Client>>,
    params: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();

    let check_in = parse_date(&params.check_in)?;
    let check_out = parse_date(&params.check_out)?;
    // Reject inverted ranges here too; an empty scan would report available
    crate::services::dates::nights_between(check_in, check_out)?;

    fetch_room(&client, &params.room_id).await?;
    let bookings = fetch_blocking_bookings(&client, &params.room_id).await?;

    let available = AvailabilityService::check_room_availability(
        &params.room_id,
        check_in,
        check_out,
        &bookings,
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({ "available": available })))
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub from: String,
    pub to: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub available: bool,
    pub price: f64,
}

/// Per-day availability and nightly price for the booking calendar,
/// `from`..=`to` inclusive.
pub async fn get_room_calendar(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    params: web::Query<CalendarQuery>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let room_id = path.into_inner();

    let from = parse_date(&params.from)?;
    let to = parse_date(&params.to)?;
    if to < from {
        return Err(BookingError::InvalidDateRange(format!(
            "calendar end {} precedes start {}",
            to, from
        )));
    }
    if (to - from).num_days() > 366 {
        return Err(BookingError::InvalidDateRange(
            "calendar span limited to one year".to_string(),
        ));
    }

    let room = fetch_room(&client, &room_id).await?;
    let (seasons, special_periods, overrides) = fetch_pricing_rules(&client, &room_id).await?;

    let bookings: Vec<Booking> = mongo::bookings(&client)
        .find(doc! {
            "roomId": &room_id,
            "status": { "$in": ["pending", "confirmed", "paid"] },
        })
        .await?
        .try_collect()
        .await?;
    let blocked: Vec<BlockedDateRange> = mongo::blocked_dates(&client)
        .find(doc! { "roomId": &room_id })
        .await?
        .try_collect()
        .await?;

    let today = Utc::now().date_naive();
    let mut days = Vec::new();
    let mut date = from;
    while date <= to {
        days.push(CalendarDay {
            date,
            available: !AvailabilityService::day_is_unavailable(
                &room_id, date, today, &bookings, &blocked,
            ),
            price: PricingService::price_for_date(
                &room,
                date,
                &seasons,
                &special_periods,
                &overrides,
            ),
        });
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(HttpResponse::Ok().json(days))
}
