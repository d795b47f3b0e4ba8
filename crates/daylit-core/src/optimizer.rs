//! Feedback-driven task suggestions.
//!
//! [`analyze`] looks at a task's recent ratings and proposes edits using two
//! percentage thresholds: mostly `too_much` means the task is too big, and
//! frequent `unnecessary` means it recurs too often.

use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::{FeedbackRating, Recurrence, Task};

/// Default number of recent ratings considered per task.
pub const DEFAULT_FEEDBACK_LIMIT: usize = 10;

/// Floor for a reduced duration, in minutes.
const MIN_DURATION: u32 = 10;
/// Tasks this short are split rather than shortened.
const SPLIT_THRESHOLD: u32 = 30;

/// One rated slot from the plan history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub date: Date,
    pub rating: FeedbackRating,
    pub note: Option<String>,
}

/// A proposed edit to a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    /// Break the task into smaller pieces
    SplitTask { duration_min: u32 },
    /// Shorten the task
    ReduceDuration { from_min: u32, to_min: u32 },
    /// Schedule the task less often
    ReduceFrequency {
        from_interval_days: u32,
        to_interval_days: u32,
    },
    /// Deactivate the task
    RemoveTask,
}

impl Suggestion {
    /// Apply the edit to `task`. Returns `false` for suggestions that need a
    /// manual decision (splitting).
    pub fn apply(&self, task: &mut Task) -> bool {
        match self {
            Suggestion::SplitTask { .. } => false,
            Suggestion::ReduceDuration { to_min, .. } => {
                task.duration_min = *to_min;
                true
            }
            Suggestion::ReduceFrequency {
                to_interval_days, ..
            } => {
                task.recurrence = Recurrence::NDays {
                    interval_days: *to_interval_days,
                };
                true
            }
            Suggestion::RemoveTask => {
                task.active = false;
                true
            }
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::SplitTask { duration_min } => {
                write!(f, "split the {duration_min} min task into smaller parts")
            }
            Suggestion::ReduceDuration { from_min, to_min } => {
                write!(f, "reduce duration from {from_min} to {to_min} min")
            }
            Suggestion::ReduceFrequency {
                from_interval_days,
                to_interval_days,
            } => write!(
                f,
                "repeat every {to_interval_days} days instead of every {from_interval_days}"
            ),
            Suggestion::RemoveTask => write!(f, "remove the task"),
        }
    }
}

/// A suggestion together with the task it targets and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSuggestion {
    pub task_id: String,
    pub task_name: String,
    pub reason: String,
    pub suggestion: Suggestion,
}

fn percent(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

/// Suggestions for one task given its recent feedback.
pub fn analyze(task: &Task, history: &[FeedbackEntry]) -> Vec<TaskSuggestion> {
    if history.is_empty() {
        return Vec::new();
    }

    let total = history.len();
    let too_much = history
        .iter()
        .filter(|e| e.rating == FeedbackRating::TooMuch)
        .count();
    let unnecessary = history
        .iter()
        .filter(|e| e.rating == FeedbackRating::Unnecessary)
        .count();
    let too_much_pct = percent(too_much, total);
    let unnecessary_pct = percent(unnecessary, total);

    let wrap = |reason: String, suggestion: Suggestion| TaskSuggestion {
        task_id: task.id.clone(),
        task_name: task.name.clone(),
        reason,
        suggestion,
    };

    let mut out = Vec::new();

    if too_much_pct > 50.0 {
        let reduced = task.duration_min * 3 / 4;
        if reduced <= MIN_DURATION || task.duration_min <= SPLIT_THRESHOLD {
            out.push(wrap(
                format!("{too_much_pct:.0}% of recent feedback says the task is overwhelming"),
                Suggestion::SplitTask {
                    duration_min: task.duration_min,
                },
            ));
        } else {
            out.push(wrap(
                format!("{too_much_pct:.0}% of recent feedback says the task takes too long"),
                Suggestion::ReduceDuration {
                    from_min: task.duration_min,
                    to_min: reduced.max(MIN_DURATION),
                },
            ));
        }
    }

    if unnecessary >= 3 || unnecessary_pct > 40.0 {
        let reason = format!("{unnecessary_pct:.0}% of recent feedback says the task is unnecessary");
        let suggestion = match task.recurrence {
            Recurrence::NDays { interval_days } => Suggestion::ReduceFrequency {
                from_interval_days: interval_days,
                to_interval_days: interval_days + 2,
            },
            Recurrence::Daily => Suggestion::ReduceFrequency {
                from_interval_days: 1,
                to_interval_days: 2,
            },
            _ => Suggestion::RemoveTask,
        };
        out.push(wrap(reason, suggestion));
    }

    out
}
