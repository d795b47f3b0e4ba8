//! Task model definition and related functionality.

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};

use super::{EnergyBand, Recurrence, TaskKind, clock::ensure_minute_aligned};
use crate::error::{PlannerError, Result};

/// Lowest allowed priority number (highest urgency).
pub const PRIORITY_HIGHEST: u8 = 1;
/// Highest allowed priority number (lowest urgency).
pub const PRIORITY_LOWEST: u8 = 5;

/// A unit of work the planner can place into a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Human readable name
    pub name: String,

    /// Whether the task is pinned to fixed times
    #[serde(default)]
    pub kind: TaskKind,

    /// Length of the task in minutes
    pub duration_min: u32,

    /// Earliest wall-clock start for flexible placement
    pub earliest_start: Option<Time>,

    /// Latest wall-clock end for flexible placement
    pub latest_end: Option<Time>,

    /// Exact start for appointments
    pub fixed_start: Option<Time>,

    /// Exact end for appointments
    pub fixed_end: Option<Time>,

    /// Which dates the task is due on
    #[serde(default)]
    pub recurrence: Recurrence,

    /// 1 (most urgent) to 5
    pub priority: u8,

    /// Advisory energy requirement
    #[serde(default)]
    pub energy_band: EnergyBand,

    /// Inactive tasks are never planned
    pub active: bool,

    /// Date the task was last completed; anchors n-days recurrence
    pub last_done: Option<Date>,

    /// Date the task was added to the catalog
    pub created_on: Date,
}

impl Task {
    /// Anchor date for interval-based recurrence.
    pub fn anchor_date(&self) -> Date {
        self.last_done.unwrap_or(self.created_on)
    }

    /// The pinned `(start, end)` interval when this task is an appointment
    /// with both times set. Appointments missing either time are planned as
    /// flexible tasks.
    pub fn fixed_interval(&self) -> Option<(Time, Time)> {
        match (self.kind, self.fixed_start, self.fixed_end) {
            (TaskKind::Appointment, Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Whether the task is active and its recurrence fires on `date`.
    pub fn is_due_on(&self, date: Date) -> bool {
        self.active && super::recurrence::is_due_on(self, date)
    }

    /// Every wall-clock bound must sit on a whole minute.
    pub fn ensure_whole_minutes(&self) -> Result<()> {
        for (field, value) in [
            ("earliest_start", self.earliest_start),
            ("latest_end", self.latest_end),
            ("fixed_start", self.fixed_start),
            ("fixed_end", self.fixed_end),
        ] {
            if let Some(time) = value {
                ensure_minute_aligned(field, time)?;
            }
        }
        Ok(())
    }

    /// Check the invariants required before a task is written to the
    /// catalog.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::validation("name").with_reason("must not be empty"));
        }
        if !(PRIORITY_HIGHEST..=PRIORITY_LOWEST).contains(&self.priority) {
            return Err(PlannerError::validation("priority").with_reason(format!(
                "must be between {PRIORITY_HIGHEST} and {PRIORITY_LOWEST}, got {}",
                self.priority
            )));
        }
        self.recurrence.validate()?;
        self.ensure_whole_minutes()?;

        match self.kind {
            TaskKind::Appointment => {
                let (Some(start), Some(end)) = (self.fixed_start, self.fixed_end) else {
                    return Err(PlannerError::validation("fixed_start")
                        .with_reason("appointments need both a fixed start and end"));
                };
                if start >= end {
                    return Err(PlannerError::validation("fixed_end")
                        .with_reason("fixed end must be after fixed start"));
                }
            }
            TaskKind::Flexible => {
                if self.duration_min == 0 {
                    return Err(PlannerError::validation("duration_min")
                        .with_reason("must be greater than zero"));
                }
                if self.fixed_start.is_some() || self.fixed_end.is_some() {
                    return Err(PlannerError::validation("kind")
                        .with_reason("fixed times require kind 'appointment'"));
                }
                if let (Some(earliest), Some(latest)) = (self.earliest_start, self.latest_end)
                    && earliest >= latest
                {
                    return Err(PlannerError::validation("latest_end")
                        .with_reason("latest end must be after earliest start"));
                }
            }
        }
        Ok(())
    }
}
