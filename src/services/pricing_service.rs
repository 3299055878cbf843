use chrono::NaiveDate;

use crate::models::pricing::{PriceOverride, Season, SpecialPeriod};
use crate::models::room::Room;
use crate::services::dates::{month_day_in_span, MonthDay};

pub struct PricingService;

impl PricingService {
    /// Resolve the nightly price for a room on a given date.
    ///
    /// Strict precedence, first match wins, sources are never blended:
    /// 1. per-date override (final price, returned verbatim)
    /// 2. special period (base x multiplier, rounded)
    /// 3. recurring season (base x multiplier, rounded)
    /// 4. base price, unrounded
    pub fn price_for_date(
        room: &Room,
        date: NaiveDate,
        seasons: &[Season],
        special_periods: &[SpecialPeriod],
        overrides: &[PriceOverride],
    ) -> f64 {
        if let Some(ov) = Self::matching_override(&room.id, date, overrides) {
            return ov.price;
        }

        if let Some(period) = Self::matching_special_period(date, special_periods) {
            return (room.price * period.price_multiplier).round();
        }

        if let Some(season) = Self::matching_season(date, seasons) {
            return (room.price * season.price_multiplier).round();
        }

        room.price
    }

    fn matching_override<'a>(
        room_id: &str,
        date: NaiveDate,
        overrides: &'a [PriceOverride],
    ) -> Option<&'a PriceOverride> {
        overrides
            .iter()
            .find(|ov| ov.room_id == room_id && ov.date == date)
    }

    /// Inclusive on both ends. When several periods cover the same date
    /// (a configuration slip, not a runtime error) the pick is
    /// deterministic: highest multiplier wins, ties break on the smaller id.
    fn matching_special_period<'a>(
        date: NaiveDate,
        special_periods: &'a [SpecialPeriod],
    ) -> Option<&'a SpecialPeriod> {
        let mut best: Option<&SpecialPeriod> = None;
        for period in special_periods {
            if date < period.start_date || date > period.end_date {
                continue;
            }
            best = match best {
                None => Some(period),
                Some(current) => {
                    if period.price_multiplier > current.price_multiplier
                        || (period.price_multiplier == current.price_multiplier
                            && period.id < current.id)
                    {
                        Some(period)
                    } else {
                        Some(current)
                    }
                }
            };
        }
        best
    }

    fn matching_season<'a>(date: NaiveDate, seasons: &'a [Season]) -> Option<&'a Season> {
        let day = MonthDay::from_date(date);
        seasons
            .iter()
            .find(|s| month_day_in_span(day, s.start_date, s.end_date))
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

    fn season(id: &str, start: &str, end: &str, multiplier: f64) -> Season {
        Season {
            id: id.to_string(),
            name: id.to_string(),
            season_type: "seasonal".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            price_multiplier: multiplier,
            description: String::new(),
        }
    }

    fn period(id: &str, start: &str, end: &str, multiplier: f64) -> SpecialPeriod {
        SpecialPeriod {
            id: id.to_string(),
            name: id.to_string(),
            start_date: parse_date(start).unwrap(),
            end_date: parse_date(end).unwrap(),
            price_multiplier: multiplier,
            description: String::new(),
            priority: None,
        }
    }

    fn override_for(room_id: &str, date: &str, price: f64) -> PriceOverride {
        PriceOverride {
            id: format!("ov-{}", date),
            room_id: room_id.to_string(),
            date: parse_date(date).unwrap(),
            price,
            reason: String::new(),
        }
    }

    #[test]
    fn test_base_price_when_nothing_matches() {
        let price = PricingService::price_for_date(
            &room(),
            parse_date("2025-10-01").unwrap(),
            &[],
            &[],
            &[],
        );
        assert_eq!(price, 100.0);
    }

    #[test]
    fn test_full_precedence_scenario() {
        // alta season 1.5, Ferragosto 2.0, one explicit override
        let room = room();
        let seasons = vec![season("alta", "06-01", "09-15", 1.5)];
        let periods = vec![period("ferragosto", "2025-08-10", "2025-08-20", 2.0)];
        let overrides = vec![override_for("camera-olivo", "2025-08-15", 180.0)];

        // Season only
        assert_eq!(
            PricingService::price_for_date(
                &room,
                parse_date("2025-07-01").unwrap(),
                &seasons,
                &periods,
                &overrides
            ),
            150.0
        );
        // Special period wins over season
        assert_eq!(
            PricingService::price_for_date(
                &room,
                parse_date("2025-08-12").unwrap(),
                &seasons,
                &periods,
                &overrides
            ),
            200.0
        );
        // Override wins over special period
        assert_eq!(
            PricingService::price_for_date(
                &room,
                parse_date("2025-08-15").unwrap(),
                &seasons,
                &periods,
                &overrides
            ),
            180.0
        );
        // Outside everything: base
        assert_eq!(
            PricingService::price_for_date(
                &room,
                parse_date("2025-10-01").unwrap(),
                &seasons,
                &periods,
                &overrides
            ),
            100.0
        );
    }

    #[test]
    fn test_override_is_per_room() {
        let overrides = vec![override_for("another-room", "2025-08-15", 999.0)];
        let price = PricingService::price_for_date(
            &room(),
            parse_date("2025-08-15").unwrap(),
            &[],
            &[],
            &overrides,
        );
        assert_eq!(price, 100.0);
    }

    #[test]
    fn test_special_period_bounds_inclusive() {
        let periods = vec![period("natale", "2025-12-24", "2025-12-26", 2.0)];
        for (day, expected) in [
            ("2025-12-23", 100.0),
            ("2025-12-24", 200.0),
            ("2025-12-26", 200.0),
            ("2025-12-27", 100.0),
        ] {
            assert_eq!(
                PricingService::price_for_date(
                    &room(),
                    parse_date(day).unwrap(),
                    &[],
                    &periods,
                    &[]
                ),
                expected,
                "day {}",
                day
            );
        }
    }

    #[test]
    fn test_wraparound_season() {
        let seasons = vec![season("inverno", "12-20", "01-05", 1.2)];
        for (day, expected) in [
            ("2025-12-25", 120.0),
            ("2026-01-02", 120.0),
            ("2025-06-15", 100.0),
        ] {
            assert_eq!(
                PricingService::price_for_date(
                    &room(),
                    parse_date(day).unwrap(),
                    &seasons,
                    &[],
                    &[]
                ),
                expected,
                "day {}",
                day
            );
        }
    }

    #[test]
    fn test_multiplier_prices_are_rounded() {
        let mut room = room();
        room.price = 95.0;
        let seasons = vec![season("alta", "06-01", "09-15", 1.33)];
        // 95 * 1.33 = 126.35 -> 126
        let price = PricingService::price_for_date(
            &room,
            parse_date("2025-07-01").unwrap(),
            &seasons,
            &[],
            &[],
        );
        assert_eq!(price, 126.0);
    }

    #[test]
    fn test_overlapping_special_periods_highest_multiplier_wins() {
        let periods = vec![
            period("sagra", "2025-08-01", "2025-08-31", 1.4),
            period("ferragosto", "2025-08-10", "2025-08-20", 2.0),
        ];
        let price = PricingService::price_for_date(
            &room(),
            parse_date("2025-08-15").unwrap(),
            &[],
            &periods,
            &[],
        );
        assert_eq!(price, 200.0);
    }

    #[test]
    fn test_overlapping_special_periods_equal_multiplier_is_stable() {
        // Equal multipliers: smaller id wins, regardless of input order
        let forward = vec![
            period("a-evento", "2025-08-10", "2025-08-20", 2.0),
            period("b-evento", "2025-08-10", "2025-08-20", 2.0),
        ];
        let reversed: Vec<SpecialPeriod> = forward.iter().cloned().rev().collect();

        let date = parse_date("2025-08-15").unwrap();
        assert_eq!(
            PricingService::matching_special_period(date, &forward).unwrap().id,
            "a-evento"
        );
        assert_eq!(
            PricingService::matching_special_period(date, &reversed).unwrap().id,
            "a-evento"
        );
    }
}
