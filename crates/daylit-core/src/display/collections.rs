//! Collection wrapper types for displaying groups of domain objects.

use std::{collections::HashMap, fmt};

use crate::{
    models::{DayPlan, RevisionRecord, Task},
    optimizer::TaskSuggestion,
};

/// Newtype wrapper for displaying the task catalog.
///
/// # Examples
///
/// ```rust
/// use daylit_core::display::Tasks;
///
/// let empty = Tasks(vec![]);
/// assert_eq!(empty.to_string(), "No tasks found.\n");
/// ```
pub struct Tasks(pub Vec<Task>);

impl Tasks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Tasks {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in &self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

/// Revision history of one date.
pub struct Revisions(pub Vec<RevisionRecord>);

impl fmt::Display for Revisions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.0.first() else {
            return writeln!(f, "No revisions found.");
        };
        writeln!(f, "# History for {}", first.date)?;
        writeln!(f)?;
        for record in &self.0 {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

/// Suggestions produced by the feedback analysis.
pub struct Suggestions(pub Vec<TaskSuggestion>);

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Suggestions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No suggestions. Every task looks on track.");
        }
        writeln!(f, "# {} suggestion(s)", self.0.len())?;
        writeln!(f)?;
        for suggestion in &self.0 {
            write!(f, "{suggestion}")?;
        }
        Ok(())
    }
}

/// A plan shown with task names in place of raw ids.
pub struct PlanAgenda {
    pub plan: DayPlan,
    names: HashMap<String, String>,
}

impl PlanAgenda {
    pub fn new(plan: DayPlan, tasks: &[Task]) -> Self {
        let names = tasks
            .iter()
            .map(|t| (t.id.clone(), t.name.clone()))
            .collect();
        Self { plan, names }
    }
}

impl fmt::Display for PlanAgenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.plan.fmt_header(f)?;
        if self.plan.slots.is_empty() {
            return writeln!(f, "No slots in this plan.");
        }
        for slot in &self.plan.slots {
            slot.fmt_item(f, self.names.get(&slot.task_id).map(String::as_str))?;
        }
        Ok(())
    }
}
