//! Parameter structures for planner operations.
//!
//! Plain structs with no framework derives. Interface layers (the CLI's clap
//! argument types) convert into these via `From`, keeping clap out of the
//! core crate.

use jiff::{
    Timestamp,
    civil::{Date, Time},
};

use crate::{
    models::{EnergyBand, FeedbackRating, NotificationKind, Recurrence, SlotKey, TaskKind},
    optimizer::DEFAULT_FEEDBACK_LIMIT,
};

/// Parameters for adding a task to the catalog.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub kind: TaskKind,
    pub duration_min: u32,
    pub earliest_start: Option<Time>,
    pub latest_end: Option<Time>,
    pub fixed_start: Option<Time>,
    pub fixed_end: Option<Time>,
    pub recurrence: Recurrence,
    pub priority: u8,
    pub energy_band: EnergyBand,
}

/// Parameters for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct ListTasks {
    pub include_inactive: bool,
}

/// Parameters for generating and saving a plan.
#[derive(Debug, Clone)]
pub struct GeneratePlan {
    pub date: Date,
    /// Allow a new revision when the latest one is already accepted
    pub new_revision: bool,
}

/// Parameters for showing a plan.
#[derive(Debug, Clone)]
pub struct ShowPlan {
    pub date: Date,
    /// Exact revision; the latest when unset
    pub revision: Option<u32>,
}

/// Which slot feedback is recorded against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackTarget {
    /// The active slot with this start and task
    Slot { start: Time, task_id: String },
    /// The latest-ending accepted or done slot without feedback that ended
    /// at or before the given time
    LastEndedBy(Time),
}

/// Parameters for recording slot feedback.
#[derive(Debug, Clone)]
pub struct RecordFeedback {
    pub date: Date,
    pub target: FeedbackTarget,
    pub rating: FeedbackRating,
    pub note: Option<String>,
}

/// Parameters for stamping a delivered notification.
#[derive(Debug, Clone)]
pub struct MarkNotified {
    pub key: SlotKey,
    pub kind: NotificationKind,
    pub at: Timestamp,
}

/// Partial settings update; unset fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateSettings {
    pub day_start: Option<Time>,
    pub day_end: Option<Time>,
}

/// Parameters for the suggestion engine.
#[derive(Debug, Clone)]
pub struct Optimize {
    /// Recent ratings considered per task
    pub feedback_limit: usize,
}

impl Default for Optimize {
    fn default() -> Self {
        Self {
            feedback_limit: DEFAULT_FEEDBACK_LIMIT,
        }
    }
}
