use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::dates::MonthDay;

/// Recurring season keyed on month-day bounds, no year component.
/// A season whose start is lexicographically after its end wraps across
/// New Year (e.g. `12-20`..`01-05`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub season_type: String,
    pub start_date: MonthDay,
    pub end_date: MonthDay,
    pub price_multiplier: f64,
    #[serde(default)]
    pub description: String,
}

/// One-time absolute span (holidays, local festivals). Always outranks
/// recurring seasons; both bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialPeriod {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price_multiplier: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Explicit final price for a single (room, date) pair. Highest precedence,
/// wins unconditionally and is never multiplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOverride {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_id: String,
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub reason: String,
}

/// Maintenance or booking-derived closure of a room. Half-open: `to` is the
/// first day the room is open again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDateRange {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub reason: String,
    /// Set when the block was auto-derived from a confirmed booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}
