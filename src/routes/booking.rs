use actix_web::{web, HttpResponse};
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::mongo;
use crate::errors::BookingError;
use crate::models::booking::{Booking, BookingOrigin, BookingStatus};
use crate::models::pricing::BlockedDateRange;
use crate::routes::availability::fetch_blocking_bookings;
use crate::routes::quote::{fetch_pricing_rules, fetch_room};
use crate::services::availability_service::AvailabilityService;
use crate::services::booking_service::RoomLocks;
use crate::services::dates::parse_date;
use crate::services::quote_service::QuoteService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub room_id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub check_in: String,
    pub check_out: String,
    pub adults: u32,
    #[serde(default)]
    pub number_of_children: u32,
    /// Channel sync supplies its own origin; website requests omit it.
    pub origin: Option<BookingOrigin>,
    pub payment_intent_id: Option<String>,
}

pub async fn create_booking(
    data: web::Data<Arc<Client>>,
    locks: web::Data<Arc<RoomLocks>>,
    input: web::Json<BookingInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let input = input.into_inner();

    let check_in = parse_date(&input.check_in)?;
    let check_out = parse_date(&input.check_out)?;
    let origin = input.origin.unwrap_or(BookingOrigin::Site);

    let room = fetch_room(&client, &input.room_id).await?;
    let (seasons, special_periods, overrides) =
        fetch_pricing_rules(&client, &input.room_id).await?;

    // Server-side quote is the authoritative total; client estimates are
    // never trusted.
    let quote = QuoteService::quote(
        &room,
        check_in,
        check_out,
        input.adults,
        input.number_of_children,
        &seasons,
        &special_periods,
        &overrides,
    )?;

    // Availability check and insert run under the room's lock; without it
    // two concurrent requests could both pass the check.
    let _room_guard = locks.lock(&input.room_id).await;

    let existing = fetch_blocking_bookings(&client, &input.room_id).await?;
    let check =
        AvailabilityService::has_conflict(&input.room_id, check_in, check_out, origin, &existing);
    if check.conflict {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "error": "dates not available",
            "blockingBooking": check.blocking_booking,
        })));
    }

    let now = DateTime::now();
    let booking = Booking {
        id: None,
        room_id: input.room_id.clone(),
        guest_name: input.guest_name,
        guest_email: input.guest_email,
        check_in,
        check_out,
        adults: input.adults,
        number_of_children: input.number_of_children,
        status: BookingStatus::Pending,
        origin,
        total_amount: quote.total,
        payment_intent_id: input.payment_intent_id,
        external_id: None,
        penalty_amount: None,
        refund_amount: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    match mongo::bookings(&client).insert_one(&booking).await {
        Ok(result) => {
            let booking_id = result
                .inserted_id
                .as_object_id()
                .map(|id| id.to_hex())
                .unwrap_or_default();
            println!(
                "Booking {} created for room {} ({} -> {})",
                booking_id, input.room_id, check_in, check_out
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "bookingId": booking_id,
                "quote": quote,
            })))
        }
        Err(err) => {
            eprintln!("Error creating booking: {:?}", err);
            Ok(HttpResponse::InternalServerError().body("Failed to create booking"))
        }
    }
}

pub async fn get_booking_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let booking_id = path.into_inner();

    let object_id = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().body("Invalid booking ID format"));
        }
    };

    match mongo::bookings(&client)
        .find_one(doc! { "_id": object_id })
        .await?
    {
        Some(booking) => Ok(HttpResponse::Ok().json(booking)),
        None => Ok(HttpResponse::NotFound().body("Booking not found")),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDatesInput {
    pub check_in: String,
    pub check_out: String,
}

pub async fn change_booking_dates(
    data: web::Data<Arc<Client>>,
    locks: web::Data<Arc<RoomLocks>>,
    path: web::Path<String>,
    input: web::Json<ChangeDatesInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let booking_id = path.into_inner();

    let object_id = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().body("Invalid booking ID format"));
        }
    };

    let check_in = parse_date(&input.check_in)?;
    let check_out = parse_date(&input.check_out)?;

    let booking = mongo::bookings(&client)
        .find_one(doc! { "_id": object_id })
        .await?;
    let booking = match booking {
        Some(b) => b,
        None => return Ok(HttpResponse::NotFound().body("Booking not found")),
    };
    if booking.status.is_terminal() {
        return Ok(HttpResponse::Conflict().body(format!(
            "Cannot change dates of a {} booking",
            booking.status
        )));
    }

    let room = fetch_room(&client, &booking.room_id).await?;
    let (seasons, special_periods, overrides) =
        fetch_pricing_rules(&client, &booking.room_id).await?;
    let quote = QuoteService::quote(
        &room,
        check_in,
        check_out,
        booking.adults,
        booking.number_of_children,
        &seasons,
        &special_periods,
        &overrides,
    )?;

    let _room_guard = locks.lock(&booking.room_id).await;

    let existing = fetch_blocking_bookings(&client, &booking.room_id).await?;
    let check = AvailabilityService::has_conflict_excluding(
        &booking.room_id,
        check_in,
        check_out,
        booking.origin,
        &existing,
        Some(&object_id),
    );
    if check.conflict {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "error": "dates not available",
            "blockingBooking": check.blocking_booking,
        })));
    }

    let update = doc! {
        "$set": {
            "checkIn": check_in.to_string(),
            "checkOut": check_out.to_string(),
            "totalAmount": quote.total,
            "updatedAt": DateTime::now(),
        }
    };
    mongo::bookings(&client)
        .update_one(doc! { "_id": object_id }, update)
        .await?;

    // Keep the auto-derived block in step with the new dates
    mongo::blocked_dates(&client)
        .update_one(
            doc! { "bookingId": &booking_id },
            doc! { "$set": {
                "from": check_in.to_string(),
                "to": check_out.to_string(),
            }},
        )
        .await?;

    println!(
        "Booking {} moved to {} -> {}",
        booking_id, check_in, check_out
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "bookingId": booking_id,
        "quote": quote,
    })))
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CancelInput {
    pub penalty_amount: Option<f64>,
    pub refund_amount: Option<f64>,
}

pub async fn cancel_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: Option<web::Json<CancelInput>>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let booking_id = path.into_inner();

    let object_id = match ObjectId::parse_str(&booking_id) {
        Ok(id) => id,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().body("Invalid booking ID format"));
        }
    };

    let booking = mongo::bookings(&client)
        .find_one(doc! { "_id": object_id })
        .await?;
    let booking = match booking {
        Some(b) => b,
        None => return Ok(HttpResponse::NotFound().body("Booking not found")),
    };

    if !booking.status.can_transition_to(BookingStatus::Cancelled) {
        return Err(BookingError::InvalidStatusTransition {
            from: booking.status,
            to: BookingStatus::Cancelled,
        });
    }

    let input = input.map(|json| json.into_inner()).unwrap_or_default();
    let mut set = doc! {
        "status": "cancelled",
        "updatedAt": DateTime::now(),
    };
    if let Some(penalty) = input.penalty_amount {
        set.insert("penaltyAmount", penalty);
    }
    if let Some(refund) = input.refund_amount {
        set.insert("refundAmount", refund);
    }

    mongo::bookings(&client)
        .update_one(doc! { "_id": object_id }, doc! { "$set": set })
        .await?;

    // Release the dates the confirmed booking had blocked
    mongo::blocked_dates(&client)
        .delete_many(doc! { "bookingId": &booking_id })
        .await?;

    println!("Booking {} cancelled", booking_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "bookingId": booking_id, "status": "cancelled" })))
}

/// Confirm a pending booking (webhook path does this too) and derive the
/// date block that keeps the calendar in sync.
pub async fn confirm_booking_by_intent(
    client: &Client,
    payment_intent_id: &str,
) -> Result<Option<String>, BookingError> {
    let booking = mongo::bookings(client)
        .find_one(doc! { "paymentIntentId": payment_intent_id })
        .await?;
    let booking = match booking {
        Some(b) => b,
        None => return Ok(None),
    };
    let object_id = match booking.id {
        Some(id) => id,
        None => return Ok(None),
    };

    if !booking.status.can_transition_to(BookingStatus::Confirmed) {
        return Err(BookingError::InvalidStatusTransition {
            from: booking.status,
            to: BookingStatus::Confirmed,
        });
    }

    mongo::bookings(client)
        .update_one(
            doc! { "_id": object_id },
            doc! { "$set": { "status": "confirmed", "updatedAt": DateTime::now() } },
        )
        .await?;

    let block = BlockedDateRange {
        id: Uuid::new_v4().to_string(),
        room_id: booking.room_id.clone(),
        from: booking.check_in,
        to: booking.check_out,
        reason: "confirmed booking".to_string(),
        booking_id: Some(object_id.to_hex()),
    };
    mongo::blocked_dates(client).insert_one(&block).await?;

    Ok(Some(object_id.to_hex()))
}
