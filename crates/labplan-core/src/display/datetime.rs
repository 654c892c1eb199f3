//! Date and time display helpers.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

use crate::schedule::WeekId;

/// Formats a timestamp in the system time zone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Formats a week as its Sunday to Saturday range, e.g. `Jan 07 – Jan 13, 2024`.
pub struct WeekRange(pub WeekId);

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sunday, saturday) = (self.0.sunday(), self.0.saturday());
        if sunday.year() == saturday.year() {
            write!(
                f,
                "{} – {}",
                sunday.strftime("%b %d"),
                saturday.strftime("%b %d, %Y")
            )
        } else {
            write!(
                f,
                "{} – {}",
                sunday.strftime("%b %d, %Y"),
                saturday.strftime("%b %d, %Y")
            )
        }
    }
}

/// Formats a week offset relative to the experiment start, e.g. `week +3`.
pub struct WeekOffset(pub i32);

impl fmt::Display for WeekOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "week +{}", self.0)
        } else {
            write!(f, "week {}", self.0)
        }
    }
}
