use chrono::NaiveDate;
use serde::Deserialize;

use super::{ChannelBooking, ChannelError, ChannelOperations, TokenProvider};
use crate::models::booking::BookingOrigin;

const DEFAULT_BASE_URL: &str = "https://login.smoobu.com/api";

/// Thin Smoobu REST wrapper. Credentials come from the injected token
/// provider; this struct holds no mutable auth state of its own.
pub struct SmoobuClient<T: TokenProvider> {
    http: reqwest::Client,
    base_url: String,
    tokens: T,
}

#[derive(Deserialize)]
struct SmoobuReservationPage {
    bookings: Vec<SmoobuReservation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SmoobuReservation {
    id: i64,
    arrival: String,
    departure: String,
    #[serde(default)]
    channel: SmoobuChannel,
    #[serde(default)]
    guest_name: String,
    #[serde(default)]
    adults: u32,
    #[serde(default)]
    children: u32,
}

#[derive(Default, Deserialize)]
struct SmoobuChannel {
    #[serde(default)]
    name: String,
}

impl<T: TokenProvider> SmoobuClient<T> {
    pub fn new(tokens: T) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, tokens)
    }

    pub fn with_base_url(base_url: impl Into<String>, tokens: T) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens,
        }
    }

    fn origin_from_channel(channel_name: &str) -> BookingOrigin {
        let name = channel_name.to_lowercase();
        if name.contains("booking") {
            BookingOrigin::Booking
        } else if name.contains("airbnb") {
            BookingOrigin::Airbnb
        } else if name.contains("expedia") {
            BookingOrigin::Expedia
        } else {
            BookingOrigin::Direct
        }
    }

    fn parse_reservation(
        room_id: &str,
        reservation: SmoobuReservation,
    ) -> Result<ChannelBooking, ChannelError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ChannelError::Upstream(format!("bad reservation date: {}", s)))
        };
        Ok(ChannelBooking {
            external_id: reservation.id.to_string(),
            room_id: room_id.to_string(),
            check_in: parse(&reservation.arrival)?,
            check_out: parse(&reservation.departure)?,
            origin: Self::origin_from_channel(&reservation.channel.name),
            guest_name: reservation.guest_name,
            adults: reservation.adults,
            children: reservation.children,
        })
    }
}

impl<T: TokenProvider> ChannelOperations for SmoobuClient<T> {
    async fn push_availability(
        &self,
        room_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        available: bool,
    ) -> Result<(), ChannelError> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}/availability", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Api-Key", &token)
            .json(&serde_json::json!({
                "apartmentId": room_id,
                "from": from.to_string(),
                "to": to.to_string(),
                "available": available,
            }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            reqwest::StatusCode::UNAUTHORIZED => Err(ChannelError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                eprintln!("Smoobu availability push failed: {} {}", status, body);
                Err(ChannelError::Upstream(format!(
                    "availability push returned {}",
                    status
                )))
            }
        }
    }

    async fn fetch_external_bookings(
        &self,
        room_id: &str,
    ) -> Result<Vec<ChannelBooking>, ChannelError> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}/reservations", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("Api-Key", &token)
            .query(&[("apartmentId", room_id)])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let page: SmoobuReservationPage = response
                    .json()
                    .await
                    .map_err(|e| ChannelError::Upstream(format!("bad reservations body: {}", e)))?;
                page.bookings
                    .into_iter()
                    .map(|r| Self::parse_reservation(room_id, r))
                    .collect()
            }
            reqwest::StatusCode::UNAUTHORIZED => Err(ChannelError::Unauthorized),
            status => Err(ChannelError::Upstream(format!(
                "reservations fetch returned {}",
                status
            ))),
        }
    }
}
