//! Persisted user settings.

use jiff::civil::{Time, time};
use serde::{Deserialize, Serialize};

use super::clock::{ensure_minute_aligned, format_hhmm};
use crate::error::{PlannerError, Result};

pub const DEFAULT_DAY_START: Time = time(7, 0, 0, 0);
pub const DEFAULT_DAY_END: Time = time(22, 0, 0, 0);

/// The working window plans are generated within.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub day_start: Time,
    pub day_end: Time,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            day_start: DEFAULT_DAY_START,
            day_end: DEFAULT_DAY_END,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        ensure_minute_aligned("day_start", self.day_start)?;
        ensure_minute_aligned("day_end", self.day_end)?;
        if self.day_start >= self.day_end {
            return Err(PlannerError::validation("day_end").with_reason(format!(
                "day end {} must be after day start {}",
                format_hhmm(self.day_end),
                format_hhmm(self.day_start)
            )));
        }
        Ok(())
    }
}
