use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Admin-assigned identifier (slug or uuid), referenced by bookings,
    /// overrides and blocked ranges as `roomId`.
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Base nightly price in whole euros. Seasonal multipliers apply to this.
    pub price: f64,
    /// Maximum guests the room sleeps.
    pub capacity: u32,
    pub status: String,
}
