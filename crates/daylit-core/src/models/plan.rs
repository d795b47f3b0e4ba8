//! Day plan, slot and revision models.

use std::fmt;

use jiff::{
    Timestamp,
    civil::{Date, Time},
};
use serde::{Deserialize, Serialize};

use super::{FeedbackRating, SlotStatus, clock::format_hhmm};

/// Outcome feedback attached to a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feedback {
    pub rating: FeedbackRating,
    pub note: Option<String>,
}

/// A concrete time interval assigned to one task within one plan revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    /// Wall-clock start (inclusive)
    pub start: Time,

    /// Wall-clock end (exclusive)
    pub end: Time,

    /// Task occupying the slot
    pub task_id: String,

    #[serde(default)]
    pub status: SlotStatus,

    pub feedback: Option<Feedback>,

    /// When the start notification was last delivered
    pub last_notified_start: Option<Timestamp>,

    /// When the end notification was last delivered
    pub last_notified_end: Option<Timestamp>,

    /// Soft-delete stamp
    pub deleted_at: Option<Timestamp>,
}

impl Slot {
    /// A fresh planned slot.
    pub fn new(start: Time, end: Time, task_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            task_id: task_id.into(),
            status: SlotStatus::Planned,
            feedback: None,
            last_notified_start: None,
            last_notified_end: None,
            deleted_at: None,
        }
    }

    /// Half-open interval overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A versioned schedule for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    /// Calendar day the plan covers
    pub date: Date,

    /// Revision number; `0` asks the store to assign one
    #[serde(default)]
    pub revision: u32,

    /// Set once the plan is accepted; freezes slot content
    pub accepted_at: Option<Timestamp>,

    /// Soft-delete stamp
    pub deleted_at: Option<Timestamp>,

    /// Slots ordered by start time
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl DayPlan {
    /// An empty, unaccepted plan awaiting revision assignment.
    pub fn new(date: Date) -> Self {
        Self {
            date,
            revision: 0,
            accepted_at: None,
            deleted_at: None,
            slots: Vec::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// Slots that are not soft-deleted.
    pub fn active_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.is_deleted())
    }

    /// Find an active slot by its `(start, task_id)` identity.
    pub fn find_slot_mut(&mut self, start: Time, task_id: &str) -> Option<&mut Slot> {
        self.slots
            .iter_mut()
            .find(|s| !s.is_deleted() && s.start == start && s.task_id == task_id)
    }

    /// Key identifying `slot` within this plan.
    pub fn key_for(&self, slot: &Slot) -> SlotKey {
        SlotKey {
            date: self.date,
            revision: self.revision,
            start: slot.start,
            task_id: slot.task_id.clone(),
        }
    }
}

/// Full identity of a slot: `(date, revision, start, task_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub date: Date,
    pub revision: u32,
    pub start: Time,
    pub task_id: String,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slot {} '{}' in plan {} revision {}",
            format_hhmm(self.start),
            self.task_id,
            self.date,
            self.revision
        )
    }
}

/// Header row of a stored plan revision, without its slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevisionRecord {
    pub date: Date,
    pub revision: u32,
    pub accepted_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

impl RevisionRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }
}
