//! Status and classification enumerations for tasks and slots.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a task is placed into a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Placed anywhere within its bounds by the planner
    #[default]
    Flexible,

    /// Pinned to an exact start and end time
    Appointment,
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flexible" => Ok(TaskKind::Flexible),
            "appointment" | "fixed" => Ok(TaskKind::Appointment),
            _ => Err(format!("Invalid task kind: {s}")),
        }
    }
}

impl TaskKind {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Flexible => "flexible",
            TaskKind::Appointment => "appointment",
        }
    }
}

/// Advisory energy level a task demands. Not enforced by the planner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnergyBand {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for EnergyBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(EnergyBand::Low),
            "medium" => Ok(EnergyBand::Medium),
            "high" => Ok(EnergyBand::High),
            _ => Err(format!("Invalid energy band: {s}")),
        }
    }
}

impl EnergyBand {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyBand::Low => "low",
            EnergyBand::Medium => "medium",
            EnergyBand::High => "high",
        }
    }
}

/// Lifecycle of a single slot within a plan revision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Proposed by the planner
    #[default]
    Planned,

    /// Part of an accepted plan
    Accepted,

    /// Completed, usually with feedback attached
    Done,

    /// Deliberately not done
    Skipped,
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(SlotStatus::Planned),
            "accepted" => Ok(SlotStatus::Accepted),
            "done" => Ok(SlotStatus::Done),
            "skipped" => Ok(SlotStatus::Skipped),
            _ => Err(format!("Invalid slot status: {s}")),
        }
    }
}

impl SlotStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Planned => "planned",
            SlotStatus::Accepted => "accepted",
            SlotStatus::Done => "done",
            SlotStatus::Skipped => "skipped",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use daylit_core::models::SlotStatus;
    ///
    /// assert_eq!(SlotStatus::Done.with_icon(), "✓ Done");
    /// assert_eq!(SlotStatus::Planned.with_icon(), "○ Planned");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            SlotStatus::Planned => "○ Planned",
            SlotStatus::Accepted => "➤ Accepted",
            SlotStatus::Done => "✓ Done",
            SlotStatus::Skipped => "✗ Skipped",
        }
    }
}

/// Outcome rating attached to a slot after the fact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    OnTrack,
    TooMuch,
    Unnecessary,
}

impl FromStr for FeedbackRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "on_track" => Ok(FeedbackRating::OnTrack),
            "too_much" => Ok(FeedbackRating::TooMuch),
            "unnecessary" => Ok(FeedbackRating::Unnecessary),
            _ => Err(format!(
                "Invalid rating: {s} (use on_track, too_much, or unnecessary)"
            )),
        }
    }
}

impl FeedbackRating {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackRating::OnTrack => "on_track",
            FeedbackRating::TooMuch => "too_much",
            FeedbackRating::Unnecessary => "unnecessary",
        }
    }
}

/// Which edge of a slot a notification was delivered for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Start,
    End,
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(NotificationKind::Start),
            "end" => Ok(NotificationKind::End),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Start => "start",
            NotificationKind::End => "end",
        }
    }
}
