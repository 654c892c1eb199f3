//! Week-indexed calendar arithmetic.
//!
//! Every week in the system is identified by the date of its Sunday. The
//! [`WeekId`] newtype makes a mid-week identifier unrepresentable: all
//! constructors normalize to the Sunday on or before the given date.

use std::{fmt, str::FromStr};

use jiff::{
    civil::{Date, DateTime},
    tz::TimeZone,
    Span, Timestamp, Unit, Zoned,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlannerError, Result};

/// Canonical identifier of a calendar week: the date of the week's Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekId(Date);

impl WeekId {
    /// Returns the week containing `date`.
    pub fn containing(date: Date) -> Result<Self> {
        let days_since_sunday = i64::from(date.weekday().to_sunday_zero_offset());
        date.checked_sub(Span::new().days(days_since_sunday))
            .map(Self)
            .map_err(|e| PlannerError::invalid_date(date.to_string(), e))
    }

    /// Returns the week containing today's date in the system time zone.
    pub fn current() -> Result<Self> {
        Self::containing(Zoned::now().date())
    }

    /// The Sunday that starts this week.
    pub fn sunday(&self) -> Date {
        self.0
    }

    /// The Saturday that ends this week.
    pub fn saturday(&self) -> Date {
        self.0.saturating_add(Span::new().days(6))
    }

    /// Whether `date` falls within this week.
    pub fn contains(&self, date: Date) -> bool {
        date >= self.sunday() && date <= self.saturday()
    }

    /// Returns the week `weeks` calendar weeks after this one (before it when
    /// negative).
    pub fn offset_by(self, weeks: i32) -> Result<Self> {
        let span = Span::new()
            .try_weeks(i64::from(weeks))
            .map_err(|e| PlannerError::invalid_date(self.to_string(), e))?;
        self.0
            .checked_add(span)
            .map(Self)
            .map_err(|e| PlannerError::invalid_date(self.to_string(), e))
    }

    /// Number of whole calendar weeks from `self` to `other`.
    pub fn weeks_until(self, other: WeekId) -> Result<i32> {
        let span = self
            .0
            .until((Unit::Day, other.0))
            .map_err(|e| PlannerError::invalid_date(other.to_string(), e))?;
        // Both endpoints are Sundays, so the day count is a multiple of 7.
        Ok(span.get_days() / 7)
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WeekId {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::containing(parse_date(s)?)
    }
}

impl TryFrom<Date> for WeekId {
    type Error = PlannerError;

    fn try_from(date: Date) -> Result<Self> {
        Self::containing(date)
    }
}

impl Serialize for WeekId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a calendar date from `YYYY-MM-DD`, a civil datetime, or an RFC 3339
/// timestamp (whose UTC date is used).
pub fn parse_date(input: &str) -> Result<Date> {
    let trimmed = input.trim();
    if let Ok(date) = trimmed.parse::<Date>() {
        return Ok(date);
    }
    if let Ok(datetime) = trimmed.parse::<DateTime>() {
        return Ok(datetime.date());
    }
    trimmed
        .parse::<Timestamp>()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
        .map_err(|e| PlannerError::invalid_date(input, e))
}

/// Maps any date to the canonical identifier of the week containing it.
pub fn normalize_to_sunday(date: &str) -> Result<WeekId> {
    date.parse()
}

/// Signed number of calendar weeks between the week of `start_date` and the
/// week of `target_date`.
pub fn week_offset_of(start_date: &str, target_date: &str) -> Result<i32> {
    let start: WeekId = start_date.parse()?;
    let target: WeekId = target_date.parse()?;
    start.weeks_until(target)
}

/// The week `offset` weeks after the week of `start_date`.
pub fn date_from_offset(start_date: &str, offset: i32) -> Result<WeekId> {
    start_date.parse::<WeekId>()?.offset_by(offset)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_normalize_wednesday_to_preceding_sunday() {
        let week = normalize_to_sunday("2024-01-10").expect("valid date");
        assert_eq!(week.to_string(), "2024-01-07");
    }

    #[test]
    fn test_normalize_sunday_is_identity() {
        let week = normalize_to_sunday("2024-01-07").expect("valid date");
        assert_eq!(week.sunday(), date(2024, 1, 7));
    }

    #[test]
    fn test_normalize_saturday_stays_in_same_week() {
        let week = normalize_to_sunday("2024-01-13").expect("valid date");
        assert_eq!(week.to_string(), "2024-01-07");
        assert_eq!(week.saturday(), date(2024, 1, 13));
    }

    #[test]
    fn test_normalize_across_year_boundary() {
        // 2025-01-01 is a Wednesday.
        let week = normalize_to_sunday("2025-01-01").expect("valid date");
        assert_eq!(week.to_string(), "2024-12-29");
    }

    #[test]
    fn test_parse_datetime_and_timestamp_inputs() {
        assert_eq!(
            normalize_to_sunday("2024-01-10T15:30:00").unwrap().to_string(),
            "2024-01-07"
        );
        assert_eq!(
            normalize_to_sunday("2024-01-10T23:00:00Z").unwrap().to_string(),
            "2024-01-07"
        );
    }

    #[test]
    fn test_unparseable_date_is_invalid_date() {
        match normalize_to_sunday("next tuesday") {
            Err(PlannerError::InvalidDate { input, .. }) => assert_eq!(input, "next tuesday"),
            other => panic!("Expected InvalidDate, got {other:?}"),
        }
        assert!(matches!(
            normalize_to_sunday("2024-02-30"),
            Err(PlannerError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_week_offset_ignores_day_of_week_alignment() {
        // Saturday start, Sunday target one day later is the next calendar week.
        assert_eq!(week_offset_of("2024-01-13", "2024-01-14").unwrap(), 1);
        // Sunday start, Saturday target six days later is the same week.
        assert_eq!(week_offset_of("2024-01-07", "2024-01-13").unwrap(), 0);
    }

    #[test]
    fn test_week_offset_negative() {
        assert_eq!(week_offset_of("2024-01-10", "2023-12-27").unwrap(), -2);
    }

    #[test]
    fn test_date_from_offset_round_trip() {
        for n in [-10, -1, 0, 1, 10] {
            let week = date_from_offset("2024-01-07", n).expect("offset within range");
            let back = week_offset_of("2024-01-07", &week.to_string()).expect("valid week");
            assert_eq!(back, n, "round trip failed for offset {n}");
        }
    }

    #[test]
    fn test_date_from_offset_from_mid_week_start() {
        let week = date_from_offset("2024-01-10", 1).unwrap();
        assert_eq!(week.to_string(), "2024-01-14");
        let week = date_from_offset("2024-01-10", -1).unwrap();
        assert_eq!(week.to_string(), "2023-12-31");
    }

    #[test]
    fn test_offset_out_of_civil_range_is_error() {
        let week = normalize_to_sunday("9999-12-01").unwrap();
        assert!(matches!(
            week.offset_by(10),
            Err(PlannerError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let week = normalize_to_sunday("2024-01-07").unwrap();
        assert!(week.contains(date(2024, 1, 7)));
        assert!(week.contains(date(2024, 1, 13)));
        assert!(!week.contains(date(2024, 1, 14)));
        assert!(!week.contains(date(2024, 1, 6)));
    }

    #[test]
    fn test_serde_normalizes_on_deserialize() {
        let week: WeekId = serde_json::from_str("\"2024-01-10\"").unwrap();
        assert_eq!(serde_json::to_string(&week).unwrap(), "\"2024-01-07\"");
    }
}
