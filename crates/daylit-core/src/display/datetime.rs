//! Date and time display utilities.
//!
//! Stored timestamps are UTC; these wrappers render them in the system time
//! zone.

use std::fmt;

use jiff::{Timestamp, civil::Time, tz::TimeZone};

use crate::models::clock::format_hhmm;

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
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

/// Formats a `[start, end)` wall-clock range as `HH:MM–HH:MM`.
pub struct TimeRange(pub Time, pub Time);

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", format_hhmm(self.0), format_hhmm(self.1))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;

    #[test]
    fn test_time_range() {
        let range = TimeRange(time(9, 5, 0, 0), time(10, 30, 0, 0));
        assert_eq!(range.to_string(), "09:05–10:30");
    }
}
