use actix_web::{web, HttpRequest, HttpResponse, Responder};
use bson::doc;
use mongodb::Client;
use std::sync::Arc;
use stripe::{EventObject, EventType, Webhook};

use crate::db::mongo;
use crate::routes::booking::confirm_booking_by_intent;

#[derive(Clone)]
pub struct StripeConfig {
    pub webhook_secret: String,
}

pub async fn handle_stripe_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    stripe_config: web::Data<StripeConfig>,
    mongo_data: web::Data<Arc<Client>>,
) -> impl Responder {
    // Get the Stripe-Signature header
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            return HttpResponse::BadRequest().body("Missing stripe-signature header");
        }
    };

    // Verify the webhook signature and parse the event
    let payload_str = match String::from_utf8(payload.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            return HttpResponse::BadRequest().body("Invalid payload encoding");
        }
    };

    let event =
        match Webhook::construct_event(&payload_str, signature, &stripe_config.webhook_secret) {
            Ok(event) => event,
            Err(e) => {
                println!("Webhook error: {:?}", e);
                return HttpResponse::BadRequest().body(format!("Webhook error: {}", e));
            }
        };

    let client = mongo_data.into_inner();

    match event.type_ {
        EventType::PaymentIntentSucceeded => {
            if let EventObject::PaymentIntent(payment_intent) = event.data.object {
                let intent_id = payment_intent.id.to_string();
                match confirm_booking_by_intent(&client, &intent_id).await {
                    Ok(Some(booking_id)) => {
                        println!("Payment {} confirmed booking {}", intent_id, booking_id);
                    }
                    Ok(None) => {
                        println!("Payment {} matched no pending booking", intent_id);
                    }
                    Err(e) => {
                        eprintln!("Failed to confirm booking for {}: {}", intent_id, e);
                        return HttpResponse::InternalServerError()
                            .body("Failed to confirm booking");
                    }
                }
                HttpResponse::Ok().json(serde_json::json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid payment intent object")
            }
        }

        EventType::PaymentIntentPaymentFailed => {
            if let EventObject::PaymentIntent(payment_intent) = event.data.object {
                let intent_id = payment_intent.id.to_string();
                println!("Payment failed: {}", intent_id);

                // The hold is released so the dates free up immediately
                let update = mongo::bookings(&client)
                    .update_one(
                        doc! { "paymentIntentId": &intent_id, "status": "pending" },
                        doc! { "$set": { "status": "cancelled", "updatedAt": bson::DateTime::now() } },
                    )
                    .await;
                if let Err(e) = update {
                    eprintln!("Failed to cancel booking for {}: {:?}", intent_id, e);
                    return HttpResponse::InternalServerError().body("Failed to cancel booking");
                }

                HttpResponse::Ok().json(serde_json::json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid payment intent object")
            }
        }

        EventType::ChargeSucceeded => {
            if let EventObject::Charge(charge) = event.data.object {
                println!("Charge succeeded: {}", charge.id);
                HttpResponse::Ok().json(serde_json::json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid charge object")
            }
        }

        // Handle other event types as needed
        _ => {
            println!("Unhandled event type: {:?}", event.type_);
            HttpResponse::Ok().json(serde_json::json!({ "received": true }))
        }
    }
}
