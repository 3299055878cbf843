use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::BookingError;

/// A month-day pair without a year, the key type for recurring seasons.
/// Ordering is chronological within a calendar year (`01-01` < `12-31`),
/// which matches lexicographic order on the `MM-DD` wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some(Self { month, day })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidDateRange(format!("invalid month-day: {}", s));
        let (month, day) = s.split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        MonthDay::new(month, day).ok_or_else(invalid)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: BookingError| de::Error::custom(e.to_string()))
    }
}

/// Recurring-season containment with year-wraparound: when `start > end`
/// the span crosses New Year and matches either tail of the year.
pub fn month_day_in_span(day: MonthDay, start: MonthDay, end: MonthDay) -> bool {
    if start <= end {
        start <= day && day <= end
    } else {
        day >= start || day <= end
    }
}

/// Parse a `YYYY-MM-DD` string into a timezone-naive calendar date.
/// All date strings cross this function at the I/O boundary; the core only
/// ever compares `NaiveDate` values, so no midnight/timezone drift applies.
pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDateRange(format!("unparseable date: {}", s)))
}

/// Whole-day night count. Rejects empty and inverted ranges.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, BookingError> {
    let nights = (check_out - check_in).num_days();
    if nights <= 0 {
        return Err(BookingError::InvalidDateRange(format!(
            "check-out {} must be after check-in {}",
            check_out, check_in
        )));
    }
    Ok(nights)
}

/// Every night of a stay: `check_in` inclusive, `check_out` exclusive.
pub fn iter_nights(
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(check_in), |d| d.succ_opt()).take_while(move |d| *d < check_out)
}

/// Half-open interval overlap: `[s1,e1)` and `[s2,e2)` overlap iff
/// `s1 < e2 && s2 < e1`. Checkout day is free for a new check-in.
pub fn ranges_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 < e2 && s2 < e1
}
