use std::fmt;

use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle of a reservation. `cancelled` and `completed` are terminal;
/// cancellation is a status change, bookings are never hard-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Statuses that hold dates against new requests. Cancelled bookings
    /// never block; completed stays are in the past by definition.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Statuses shown as occupying the calendar.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Paid
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Confirmed) | (Pending, Paid) | (Pending, Cancelled) => true,
            (Confirmed, Paid) | (Confirmed, Completed) | (Confirmed, Cancelled) => true,
            (Paid, Completed) | (Paid, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a reservation came from. The numeric priority encodes the channel
/// ladder: an OTA reservation always outranks the website's own holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingOrigin {
    Booking,
    Airbnb,
    Expedia,
    Site,
    Direct,
}

impl BookingOrigin {
    /// Lower number = stronger claim on the dates.
    pub fn priority(&self) -> u8 {
        match self {
            BookingOrigin::Booking => 1,
            BookingOrigin::Airbnb => 2,
            BookingOrigin::Expedia => 3,
            BookingOrigin::Site => 4,
            BookingOrigin::Direct => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingOrigin::Booking => "booking",
            BookingOrigin::Airbnb => "airbnb",
            BookingOrigin::Expedia => "expedia",
            BookingOrigin::Site => "site",
            BookingOrigin::Direct => "direct",
        }
    }
}

impl fmt::Display for BookingOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub room_id: String,
    pub guest_name: String,
    pub guest_email: String,
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Exclusive: the stay occupies nights up to but not including this day.
    pub check_out: NaiveDate,
    pub adults: u32,
    pub number_of_children: u32,
    pub status: BookingStatus,
    pub origin: BookingOrigin,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    /// Reference into the channel manager for OTA-sourced reservations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
    pub created_at: Option<bson::DateTime>,
    pub updated_at: Option<bson::DateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_priority_ladder() {
        assert!(BookingOrigin::Booking.priority() < BookingOrigin::Airbnb.priority());
        assert!(BookingOrigin::Airbnb.priority() < BookingOrigin::Expedia.priority());
        assert!(BookingOrigin::Expedia.priority() < BookingOrigin::Site.priority());
        assert!(BookingOrigin::Site.priority() < BookingOrigin::Direct.priority());
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Paid.can_transition_to(Cancelled));

        // Terminal states stay terminal
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
        // No going backwards
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Paid.can_transition_to(Confirmed));
    }

    #[test]
    fn test_blocking_statuses() {
        assert!(BookingStatus::Pending.blocks_availability());
        assert!(BookingStatus::Confirmed.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
        assert!(!BookingStatus::Completed.blocks_availability());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(
            serde_json::to_string(&BookingOrigin::Booking).unwrap(),
            "\"booking\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"pending\""
        );
        let origin: BookingOrigin = serde_json::from_str("\"airbnb\"").unwrap();
        assert_eq!(origin, BookingOrigin::Airbnb);
    }
}
