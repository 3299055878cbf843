use actix_web::{web, HttpResponse};
use bson::{doc, DateTime};
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo;
use crate::errors::BookingError;
use crate::models::booking::{Booking, BookingStatus};
use crate::routes::quote::fetch_room;
use crate::services::channel::{ChannelOperations, DefaultChannelClient};
use crate::services::dates::parse_date;

#[derive(Deserialize)]
pub struct SyncInput {
    pub from: String,
    pub to: String,
    pub available: bool,
}

/// Push a date span's availability out to the channel manager so the OTAs
/// stop selling dates the site has taken (or start again after a cancel).
pub async fn sync_availability(
    data: web::Data<Arc<Client>>,
    channel: web::Data<Arc<DefaultChannelClient>>,
    path: web::Path<String>,
    input: web::Json<SyncInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let room_id = path.into_inner();

    let from = parse_date(&input.from)?;
    let to = parse_date(&input.to)?;
    if to <= from {
        return Err(BookingError::InvalidDateRange(format!(
            "sync span end {} must be after start {}",
            to, from
        )));
    }
    fetch_room(&client, &room_id).await?;

    match channel
        .push_availability(&room_id, from, to, input.available)
        .await
    {
        Ok(()) => {
            println!(
                "Pushed availability for room {} ({} -> {}): {}",
                room_id, from, to, input.available
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({ "synced": true })))
        }
        Err(err) => {
            eprintln!("Channel sync failed for room {}: {}", room_id, err);
            Ok(HttpResponse::BadGateway().body(format!("Channel sync failed: {}", err)))
        }
    }
}

/// Pull OTA reservations for a room and store the ones not seen yet.
/// Imported bookings land as `confirmed` with their channel origin, so the
/// availability resolver ranks them above the site's own holds.
pub async fn import_bookings(
    data: web::Data<Arc<Client>>,
    channel: web::Data<Arc<DefaultChannelClient>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let room_id = path.into_inner();

    fetch_room(&client, &room_id).await?;

    let external = match channel.fetch_external_bookings(&room_id).await {
        Ok(bookings) => bookings,
        Err(err) => {
            eprintln!("Channel import failed for room {}: {}", room_id, err);
            return Ok(HttpResponse::BadGateway().body(format!("Channel import failed: {}", err)));
        }
    };

    let collection = mongo::bookings(&client);
    let mut imported = 0u64;
    for reservation in external {
        let seen = collection
            .find_one(doc! { "externalId": &reservation.external_id })
            .await?;
        if seen.is_some() {
            continue;
        }

        let now = DateTime::now();
        let booking = Booking {
            id: None,
            room_id: reservation.room_id,
            guest_name: reservation.guest_name,
            guest_email: String::new(),
            check_in: reservation.check_in,
            check_out: reservation.check_out,
            adults: reservation.adults,
            number_of_children: reservation.children,
            status: BookingStatus::Confirmed,
            origin: reservation.origin,
            // OTA collects the payment; the amount lives on their side
            total_amount: 0.0,
            payment_intent_id: None,
            external_id: Some(reservation.external_id),
            penalty_amount: None,
            refund_amount: None,
            created_at: Some(now),
            updated_at: Some(now),
        };
        collection.insert_one(&booking).await?;
        imported += 1;
    }

    println!("Imported {} channel bookings for room {}", imported, room_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "imported": imported })))
}
