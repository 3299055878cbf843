use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use mongodb::{bson::doc, Client};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo;
use crate::errors::BookingError;
use crate::models::pricing::{PriceOverride, Season, SpecialPeriod};
use crate::models::room::Room;
use crate::services::dates::parse_date;
use crate::services::quote_service::QuoteService;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    pub room_id: String,
    pub check_in: String,
    pub check_out: String,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

/// All pricing rules relevant to one room, fetched in one place so the
/// quote and calendar handlers stay in sync about what the resolver sees.
pub async fn fetch_pricing_rules(
    client: &Client,
    room_id: &str,
) -> Result<(Vec<Season>, Vec<SpecialPeriod>, Vec<PriceOverride>), mongodb::error::Error> {
    let seasons: Vec<Season> = mongo::pricing_seasons(client)
        .find(doc! {})
        .await?
        .try_collect()
        .await?;
    let special_periods: Vec<SpecialPeriod> = mongo::pricing_special_periods(client)
        .find(doc! {})
        .await?
        .try_collect()
        .await?;
    let overrides: Vec<PriceOverride> = mongo::pricing_overrides(client)
        .find(doc! { "roomId": room_id })
        .await?
        .try_collect()
        .await?;
    Ok((seasons, special_periods, overrides))
}

pub async fn fetch_room(client: &Client, room_id: &str) -> Result<Room, BookingError> {
    mongo::rooms(client)
        .find_one(doc! { "_id": room_id })
        .await?
        .ok_or_else(|| BookingError::RoomNotFound(room_id.to_string()))
}

pub async fn create_quote(
    data: web::Data<Arc<Client>>,
    input: web::Json<QuoteInput>,
) -> Result<HttpResponse, BookingError> {
    let client = data.into_inner();
    let input = input.into_inner();

    let check_in = parse_date(&input.check_in)?;
    let check_out = parse_date(&input.check_out)?;

    let room = fetch_room(&client, &input.room_id).await?;
    let (seasons, special_periods, overrides) =
        fetch_pricing_rules(&client, &input.room_id).await?;

    let quote = QuoteService::quote(
        &room,
        check_in,
        check_out,
        input.adults,
        input.children,
        &seasons,
        &special_periods,
        &overrides,
    )?;

    Ok(HttpResponse::Ok().json(quote))
}
