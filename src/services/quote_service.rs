use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::BookingError;
use crate::models::pricing::{PriceOverride, Season, SpecialPeriod};
use crate::models::room::Room;
use crate::services::dates::{iter_nights, nights_between};
use crate::services::pricing_service::PricingService;

/// Guests included in the nightly price.
pub const BASE_OCCUPANCY: u32 = 2;
/// Hard occupancy ceiling per room; exceeding it rejects the quote outright.
pub const MAX_OCCUPANCY: u32 = 4;
/// Per-night surcharge for each adult beyond base occupancy, in euros.
pub const EXTRA_ADULT_FEE: f64 = 60.0;
/// Per-night surcharge for each charged child, in euros.
pub const EXTRA_CHILD_FEE: f64 = 48.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightPrice {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub nights: i64,
    pub per_night: Vec<NightPrice>,
    pub room_subtotal: f64,
    pub extra_guest_fee: f64,
    pub total: f64,
}

pub struct QuoteService;

impl QuoteService {
    /// Per-night surcharge for guests beyond base occupancy. Adults fill the
    /// two included slots first; only children beyond the slots adults left
    /// free are charged. The surcharge is flat per night and is never
    /// multiplied by seasonal factors.
    pub fn extra_guest_surcharge_per_night(adults: u32, children: u32) -> f64 {
        let extra_adults = adults.saturating_sub(BASE_OCCUPANCY);
        let free_child_slots = BASE_OCCUPANCY.saturating_sub(adults);
        let extra_children = children.saturating_sub(free_child_slots);
        f64::from(extra_adults) * EXTRA_ADULT_FEE + f64::from(extra_children) * EXTRA_CHILD_FEE
    }

    /// Price a stay: one price resolution per night, summed, plus the
    /// uniform extra-guest surcharge. Validation comes before any pricing;
    /// nothing is silently corrected.
    pub fn quote(
        room: &Room,
        check_in: NaiveDate,
        check_out: NaiveDate,
        adults: u32,
        children: u32,
        seasons: &[Season],
        special_periods: &[SpecialPeriod],
        overrides: &[PriceOverride],
    ) -> Result<Quote, BookingError> {
        // Guest counts come straight off the wire; the sum must not wrap
        let guests = adults.checked_add(children).unwrap_or(u32::MAX);
        if guests > MAX_OCCUPANCY {
            return Err(BookingError::CapacityExceeded {
                guests,
                max: MAX_OCCUPANCY,
            });
        }

        let nights = nights_between(check_in, check_out)?;

        let per_night: Vec<NightPrice> = iter_nights(check_in, check_out)
            .map(|date| NightPrice {
                date,
                price: PricingService::price_for_date(
                    room,
                    date,
                    seasons,
                    special_periods,
                    overrides,
                ),
            })
            .collect();

        let room_subtotal: f64 = per_night.iter().map(|n| n.price).sum();
        let surcharge = Self::extra_guest_surcharge_per_night(adults, children);
        let extra_guest_fee = nights as f64 * surcharge;

        Ok(Quote {
            nights,
            per_night,
            room_subtotal,
            extra_guest_fee,
            total: room_subtotal + extra_guest_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dates::parse_date;

    fn room() -> Room {
        Room {
            id: "camera-olivo".to_string(),
            name: "Camera Olivo".to_string(),
            price: 100.0,
            capacity: 4,
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_surcharge_worked_example() {
        // 3 adults, 1 child: one extra adult, no free child slot left
        assert_eq!(QuoteService::extra_guest_surcharge_per_night(3, 1), 108.0);
        // Two adults fit in base occupancy
        assert_eq!(QuoteService::extra_guest_surcharge_per_night(2, 0), 0.0);
        // One adult leaves one free slot: first child rides free
        assert_eq!(QuoteService::extra_guest_surcharge_per_night(1, 2), 48.0);
        assert_eq!(QuoteService::extra_guest_surcharge_per_night(1, 1), 0.0);
        // Four adults: two charged
        assert_eq!(QuoteService::extra_guest_surcharge_per_night(4, 0), 120.0);
        // Two adults, two children: both children charged
        assert_eq!(QuoteService::extra_guest_surcharge_per_night(2, 2), 96.0);
    }

    #[test]
    fn test_three_night_family_quote() {
        // 3 nights flat 100/night, 3 adults + 1 child -> 3 x (100 + 108) = 624
        let quote = QuoteService::quote(
            &room(),
            parse_date("2025-10-01").unwrap(),
            parse_date("2025-10-04").unwrap(),
            3,
            1,
            &[],
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.room_subtotal, 300.0);
        assert_eq!(quote.extra_guest_fee, 324.0);
        assert_eq!(quote.total, 624.0);
    }

    #[test]
    fn test_quote_is_additive_over_nightly_prices() {
        let seasons = vec![Season {
            id: "alta".to_string(),
            name: "alta".to_string(),
            season_type: "seasonal".to_string(),
            start_date: "06-01".parse().unwrap(),
            end_date: "09-15".parse().unwrap(),
            price_multiplier: 1.5,
            description: String::new(),
        }];

        // Stay straddles the season boundary: 09-14, 09-15 in season, 09-16 not
        let room = room();
        let quote = QuoteService::quote(
            &room,
            parse_date("2025-09-14").unwrap(),
            parse_date("2025-09-17").unwrap(),
            2,
            0,
            &seasons,
            &[],
            &[],
        )
        .unwrap();

        assert_eq!(quote.nights, 3);
        assert_eq!(quote.per_night.len(), 3);
        assert_eq!(quote.per_night[0].price, 150.0);
        assert_eq!(quote.per_night[1].price, 150.0);
        assert_eq!(quote.per_night[2].price, 100.0);
        assert_eq!(quote.room_subtotal, 400.0);
        assert_eq!(quote.total, 400.0);
    }

    #[test]
    fn test_surcharge_not_multiplied_by_season() {
        let seasons = vec![Season {
            id: "alta".to_string(),
            name: "alta".to_string(),
            season_type: "seasonal".to_string(),
            start_date: "06-01".parse().unwrap(),
            end_date: "09-15".parse().unwrap(),
            price_multiplier: 2.0,
            description: String::new(),
        }];

        let quote = QuoteService::quote(
            &room(),
            parse_date("2025-07-01").unwrap(),
            parse_date("2025-07-03").unwrap(),
            3,
            0,
            &seasons,
            &[],
            &[],
        )
        .unwrap();

        // Nightly price doubles, the 60/night adult fee does not
        assert_eq!(quote.room_subtotal, 400.0);
        assert_eq!(quote.extra_guest_fee, 120.0);
        assert_eq!(quote.total, 520.0);
    }

    #[test]
    fn test_invalid_date_range_rejected() {
        let check_in = parse_date("2025-10-04").unwrap();
        let check_out = parse_date("2025-10-01").unwrap();
        let err = QuoteService::quote(&room(), check_in, check_out, 2, 0, &[], &[], &[])
            .unwrap_err();
        assert!(matches!(err, BookingError::InvalidDateRange(_)));

        let same_day =
            QuoteService::quote(&room(), check_in, check_in, 2, 0, &[], &[], &[]).unwrap_err();
        assert!(matches!(same_day, BookingError::InvalidDateRange(_)));
    }

    #[test]
    fn test_capacity_ceiling_is_hard() {
        let err = QuoteService::quote(
            &room(),
            parse_date("2025-10-01").unwrap(),
            parse_date("2025-10-04").unwrap(),
            3,
            2,
            &[],
            &[],
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BookingError::CapacityExceeded { guests: 5, max: 4 }
        ));
    }

    #[test]
    fn test_huge_guest_counts_do_not_wrap_past_the_ceiling() {
        // u32::MAX adults + 5 children would wrap to 4 under plain addition
        let err = QuoteService::quote(
            &room(),
            parse_date("2025-10-01").unwrap(),
            parse_date("2025-10-04").unwrap(),
            u32::MAX,
            5,
            &[],
            &[],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::CapacityExceeded { max: 4, .. }));
    }
}
