//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use jiff::{Timestamp, civil::Date};

use super::datetime::LocalDateTime;
use crate::{
    models::{DayPlan, Settings, Slot, SlotKey, Task},
    schedule::Schedule,
};

/// Wrapper type for displaying the result of create operations.
///
/// # Examples
///
/// ```rust
/// use daylit_core::{display::CreateResult, models::DayPlan, schedule::Schedule};
/// use jiff::civil::date;
///
/// let mut plan = DayPlan::new(date(2024, 3, 1));
/// plan.revision = 3;
/// let result = CreateResult::new(Schedule { plan, unplaced: vec![] });
/// assert!(result.to_string().starts_with("Generated plan for 2024-03-01 (revision 3)"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created task with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Schedule> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = &self.resource.plan;
        writeln!(
            f,
            "Generated plan for {} (revision {})",
            plan.date, plan.revision
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, with an
/// optional list of changes.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }

    fn fmt_changes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for UpdateResult<DayPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Updated plan for {} (revision {})",
            self.resource.date, self.resource.revision
        )?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Slot> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated slot for task `{}`", self.resource.task_id)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Task> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated task with ID: {}", self.resource.id)?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Settings> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated settings")?;
        self.fmt_changes(f)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// A plan-level soft delete: the date and the epoch it was stamped with.
pub struct DeletedPlan {
    pub date: Date,
    pub epoch: Timestamp,
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<DeletedPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted plan for {} at {}. Run `daylit plan restore {}` to undo.",
            self.resource.date,
            LocalDateTime(&self.resource.epoch),
            self.resource.date
        )
    }
}

impl fmt::Display for DeleteResult<SlotKey> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deleted {}", self.resource)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    #[test]
    fn test_update_result_lists_changes() {
        let plan = DayPlan::new(date(2024, 3, 1));
        let out = UpdateResult::with_changes(plan, vec!["Accepted 2 slots".into()]).to_string();
        assert!(out.contains("Changes made:\n- Accepted 2 slots"));
    }

    #[test]
    fn test_delete_slot_result() {
        let key = SlotKey {
            date: date(2024, 3, 1),
            revision: 1,
            start: time(7, 30, 0, 0),
            task_id: "run".into(),
        };
        assert_eq!(
            DeleteResult::new(key).to_string(),
            "Deleted slot 07:30 'run' in plan 2024-03-01 revision 1\n"
        );
    }
}
