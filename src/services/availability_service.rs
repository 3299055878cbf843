use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::Serialize;

use crate::models::booking::{Booking, BookingOrigin};
use crate::models::pricing::BlockedDateRange;
use crate::services::dates::ranges_overlap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheck {
    pub conflict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_booking: Option<Booking>,
}

pub struct AvailabilityService;

impl AvailabilityService {
    /// Cross-channel conflict detection for a requested stay.
    ///
    /// Only pending/confirmed bookings on the same room are considered,
    /// overlap is half-open (checkout day is free for a new check-in), and
    /// an overlapping booking blocks the request only when its channel
    /// priority is equal or stronger. The asymmetry is deliberate: the
    /// website must never double-book dates an OTA already holds, while an
    /// OTA reservation arriving over a pending site hold goes through.
    pub fn has_conflict(
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        origin: BookingOrigin,
        bookings: &[Booking],
    ) -> ConflictCheck {
        Self::has_conflict_excluding(room_id, check_in, check_out, origin, bookings, None)
    }

    /// Same as `has_conflict`, skipping one booking id — used by the
    /// date-change flow so a booking does not conflict with itself.
    pub fn has_conflict_excluding(
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        origin: BookingOrigin,
        bookings: &[Booking],
        exclude: Option<&ObjectId>,
    ) -> ConflictCheck {
        for booking in bookings {
            if booking.room_id != room_id || !booking.status.blocks_availability() {
                continue;
            }
            if let (Some(skip), Some(id)) = (exclude, booking.id.as_ref()) {
                if skip == id {
                    continue;
                }
            }
            if !ranges_overlap(booking.check_in, booking.check_out, check_in, check_out) {
                continue;
            }
            if booking.origin.priority() <= origin.priority() {
                return ConflictCheck {
                    conflict: true,
                    blocking_booking: Some(booking.clone()),
                };
            }
        }

        ConflictCheck {
            conflict: false,
            blocking_booking: None,
        }
    }

    /// Booking-form wrapper: availability for a website request.
    pub fn check_room_availability(
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        bookings: &[Booking],
    ) -> bool {
        !Self::has_conflict(room_id, check_in, check_out, BookingOrigin::Site, bookings).conflict
    }

    /// Display-layer aggregation for the booking calendar. A date is
    /// unavailable when it lies in the past, inside any active booking's
    /// `[checkIn, checkOut)`, or inside any blocked range's `[from, to)`.
    pub fn day_is_unavailable(
        room_id: &str,
        date: NaiveDate,
        today: NaiveDate,
        bookings: &[Booking],
        blocked: &[BlockedDateRange],
    ) -> bool {
        if date < today {
            return true;
        }
        let occupied = bookings.iter().any(|b| {
            b.room_id == room_id
                && b.status.is_active()
                && b.check_in <= date
                && date < b.check_out
        });
        if occupied {
            return true;
        }
        blocked
            .iter()
            .any(|r| r.room_id == room_id && r.from <= date && date < r.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use crate::services::dates::parse_date;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn booking(
        room_id: &str,
        check_in: &str,
        check_out: &str,
        status: BookingStatus,
        origin: BookingOrigin,
    ) -> Booking {
        Booking {
            id: Some(ObjectId::new()),
            room_id: room_id.to_string(),
            guest_name: "Guest".to_string(),
            guest_email: "guest@example.com".to_string(),
            check_in: date(check_in),
            check_out: date(check_out),
            adults: 2,
            number_of_children: 0,
            status,
            origin,
            total_amount: 0.0,
            payment_intent_id: None,
            external_id: None,
            penalty_amount: None,
            refund_amount: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_checkout_day_is_free_for_new_checkin() {
        let existing = vec![booking(
            "r1",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Confirmed,
            BookingOrigin::Site,
        )];

        // Overlapping request conflicts
        let check = AvailabilityService::has_conflict(
            "r1",
            date("2025-06-04"),
            date("2025-06-10"),
            BookingOrigin::Site,
            &existing,
        );
        assert!(check.conflict);
        assert!(check.blocking_booking.is_some());

        // Back-to-back request does not
        let check = AvailabilityService::has_conflict(
            "r1",
            date("2025-06-05"),
            date("2025-06-10"),
            BookingOrigin::Site,
            &existing,
        );
        assert!(!check.conflict);
    }

    #[test]
    fn test_cancelled_bookings_never_block() {
        let existing = vec![booking(
            "r1",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Cancelled,
            BookingOrigin::Booking,
        )];
        assert!(AvailabilityService::check_room_availability(
            "r1",
            date("2025-06-02"),
            date("2025-06-04"),
            &existing
        ));
    }

    #[test]
    fn test_other_rooms_do_not_block() {
        let existing = vec![booking(
            "r2",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Confirmed,
            BookingOrigin::Booking,
        )];
        assert!(AvailabilityService::check_room_availability(
            "r1",
            date("2025-06-02"),
            date("2025-06-04"),
            &existing
        ));
    }

    #[test]
    fn test_priority_asymmetry() {
        // Existing site hold, incoming Booking.com reservation: no conflict
        let site_hold = vec![booking(
            "r1",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Pending,
            BookingOrigin::Site,
        )];
        let check = AvailabilityService::has_conflict(
            "r1",
            date("2025-06-02"),
            date("2025-06-06"),
            BookingOrigin::Booking,
            &site_hold,
        );
        assert!(!check.conflict);

        // Existing Booking.com reservation, incoming site request: conflict
        let ota_hold = vec![booking(
            "r1",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Confirmed,
            BookingOrigin::Booking,
        )];
        let check = AvailabilityService::has_conflict(
            "r1",
            date("2025-06-02"),
            date("2025-06-06"),
            BookingOrigin::Site,
            &ota_hold,
        );
        assert!(check.conflict);
    }

    #[test]
    fn test_equal_priority_blocks() {
        let existing = vec![booking(
            "r1",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Pending,
            BookingOrigin::Site,
        )];
        let check = AvailabilityService::has_conflict(
            "r1",
            date("2025-06-02"),
            date("2025-06-06"),
            BookingOrigin::Site,
            &existing,
        );
        assert!(check.conflict);
    }

    #[test]
    fn test_direct_is_blocked_by_everything() {
        for origin in [
            BookingOrigin::Booking,
            BookingOrigin::Airbnb,
            BookingOrigin::Expedia,
            BookingOrigin::Site,
            BookingOrigin::Direct,
        ] {
            let existing = vec![booking(
                "r1",
                "2025-06-01",
                "2025-06-05",
                BookingStatus::Confirmed,
                origin,
            )];
            let check = AvailabilityService::has_conflict(
                "r1",
                date("2025-06-02"),
                date("2025-06-06"),
                BookingOrigin::Direct,
                &existing,
            );
            assert!(check.conflict, "direct should be blocked by {}", origin);
        }
    }

    #[test]
    fn test_exclusion_for_date_change() {
        let existing = booking(
            "r1",
            "2025-06-01",
            "2025-06-05",
            BookingStatus::Confirmed,
            BookingOrigin::Site,
        );
        let own_id = existing.id.clone().unwrap();
        let bookings = vec![existing];

        // Extending the same booking over its own dates is fine
        let check = AvailabilityService::has_conflict_excluding(
            "r1",
            date("2025-06-01"),
            date("2025-06-07"),
            BookingOrigin::Site,
            &bookings,
            Some(&own_id),
        );
        assert!(!check.conflict);

        // Another booking over the same dates is not
        let other_id = ObjectId::new();
        let check = AvailabilityService::has_conflict_excluding(
            "r1",
            date("2025-06-01"),
            date("2025-06-07"),
            BookingOrigin::Site,
            &bookings,
            Some(&other_id),
        );
        assert!(check.conflict);
    }

    #[test]
    fn test_calendar_day_aggregation() {
        let today = date("2025-06-01");
        let bookings = vec![booking(
            "r1",
            "2025-06-10",
            "2025-06-12",
            BookingStatus::Paid,
            BookingOrigin::Site,
        )];
        let blocked = vec![BlockedDateRange {
            id: "blk-1".to_string(),
            room_id: "r1".to_string(),
            from: date("2025-06-20"),
            to: date("2025-06-22"),
            reason: "maintenance".to_string(),
            booking_id: None,
        }];

        // Past dates
        assert!(AvailabilityService::day_is_unavailable(
            "r1", date("2025-05-31"), today, &bookings, &blocked
        ));
        // Paid booking occupies its nights but not the checkout day
        assert!(AvailabilityService::day_is_unavailable(
            "r1", date("2025-06-10"), today, &bookings, &blocked
        ));
        assert!(AvailabilityService::day_is_unavailable(
            "r1", date("2025-06-11"), today, &bookings, &blocked
        ));
        assert!(!AvailabilityService::day_is_unavailable(
            "r1", date("2025-06-12"), today, &bookings, &blocked
        ));
        // Blocked range, half-open
        assert!(AvailabilityService::day_is_unavailable(
            "r1", date("2025-06-20"), today, &bookings, &blocked
        ));
        assert!(!AvailabilityService::day_is_unavailable(
            "r1", date("2025-06-22"), today, &bookings, &blocked
        ));
        // Free day
        assert!(!AvailabilityService::day_is_unavailable(
            "r1", date("2025-06-15"), today, &bookings, &blocked
        ));
    }
}
