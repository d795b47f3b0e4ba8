//! Wall-clock helpers shared by the planner and the stores.
//!
//! Slot boundaries and task windows are minute-precision
//! [`Time`](jiff::civil::Time) values written as `HH:MM`. Storing them in that
//! form keeps lexicographic order equal to chronological order.

use jiff::civil::Time;

use crate::error::{PlannerError, Result};

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parse an `HH:MM` wall-clock string.
pub fn parse_hhmm(field: &str, value: &str) -> Result<Time> {
    Time::strptime("%H:%M", value.trim()).map_err(|e| {
        PlannerError::validation(field).with_reason(format!("expected HH:MM, got '{value}': {e}"))
    })
}

/// Format a time as `HH:MM`, dropping seconds.
pub fn format_hhmm(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Reject times carrying seconds or sub-second parts.
pub fn ensure_minute_aligned(field: &str, time: Time) -> Result<()> {
    if time.second() != 0 || time.subsec_nanosecond() != 0 {
        return Err(PlannerError::validation(field).with_reason(format!(
            "{time} is not on a whole minute"
        )));
    }
    Ok(())
}

/// Minutes elapsed since midnight.
pub fn minute_of_day(time: Time) -> u16 {
    time.hour() as u16 * 60 + time.minute() as u16
}

/// Inverse of [`minute_of_day`]. `None` past the end of the day.
pub fn time_from_minutes(minutes: u16) -> Option<Time> {
    if minutes >= MINUTES_PER_DAY {
        return None;
    }
    Time::new((minutes / 60) as i8, (minutes % 60) as i8, 0, 0).ok()
}
