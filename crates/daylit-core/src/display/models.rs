//! Display implementations for domain models.
//!
//! Every implementation emits markdown, rendered by the CLI.

use std::fmt;

use super::datetime::{LocalDateTime, TimeRange};
use crate::{
    models::{
        DayPlan, EnergyBand, FeedbackRating, NotificationKind, RevisionRecord, Settings, Slot,
        SlotStatus, Task, TaskKind, clock::format_hhmm,
    },
    optimizer::TaskSuggestion,
    schedule::{Schedule, UnplacedTask},
};

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(TaskKind, EnergyBand, SlotStatus, FeedbackRating, NotificationKind);

impl Slot {
    /// One list item. `label` replaces the raw task id when known.
    pub(crate) fn fmt_item(&self, f: &mut fmt::Formatter<'_>, label: Option<&str>) -> fmt::Result {
        write!(
            f,
            "- **{}** {}",
            TimeRange(self.start, self.end),
            label.unwrap_or(&self.task_id)
        )?;
        if label.is_some() {
            write!(f, " `{}`", self.task_id)?;
        }
        write!(f, " ({})", self.status.with_icon())?;
        if let Some(feedback) = &self.feedback {
            write!(f, " · feedback: {}", feedback.rating)?;
            if let Some(note) = &feedback.note {
                write!(f, " \"{note}\"")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_item(f, None)
    }
}

impl DayPlan {
    pub(crate) fn fmt_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# Plan for {} ({}, revision {})",
            self.date,
            self.date.strftime("%A"),
            self.revision
        )?;
        writeln!(f)?;
        match &self.accepted_at {
            Some(at) => writeln!(f, "- Status: accepted {}", LocalDateTime(at))?,
            None => writeln!(f, "- Status: draft")?,
        }
        writeln!(f)
    }
}

impl fmt::Display for DayPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_header(f)?;
        if self.slots.is_empty() {
            return writeln!(f, "No slots in this plan.");
        }
        for slot in &self.slots {
            write!(f, "{slot}")?;
        }
        Ok(())
    }
}

impl fmt::Display for UnplacedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {} `{}`: {}", self.task_name, self.task_id, self.reason)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plan)?;
        if !self.unplaced.is_empty() {
            writeln!(f, "\n## Not placed")?;
            writeln!(f)?;
            for task in &self.unplaced {
                write!(f, "{task}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inactive = if self.active { "" } else { " (inactive)" };
        writeln!(f, "## {}{inactive}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- ID: `{}`", self.id)?;
        match self.fixed_interval() {
            Some((start, end)) => writeln!(f, "- When: {}", TimeRange(start, end))?,
            None => {
                writeln!(f, "- Duration: {} min", self.duration_min)?;
                if self.earliest_start.is_some() || self.latest_end.is_some() {
                    writeln!(
                        f,
                        "- Window: {} to {}",
                        self.earliest_start.map_or("day start".into(), format_hhmm),
                        self.latest_end.map_or("day end".into(), format_hhmm)
                    )?;
                }
            }
        }
        writeln!(f, "- Repeats: {}", self.recurrence)?;
        writeln!(f, "- Priority: {}", self.priority)?;
        writeln!(f, "- Energy: {}", self.energy_band)?;
        if let Some(last) = self.last_done {
            writeln!(f, "- Last done: {last}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for RevisionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- Revision {}", self.revision)?;
        match &self.accepted_at {
            Some(at) => write!(f, ": accepted {}", LocalDateTime(at))?,
            None => write!(f, ": draft")?,
        }
        if let Some(at) = &self.deleted_at {
            write!(f, " (deleted {})", LocalDateTime(at))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Settings")?;
        writeln!(f)?;
        writeln!(f, "- Day start: {}", format_hhmm(self.day_start))?;
        writeln!(f, "- Day end: {}", format_hhmm(self.day_end))
    }
}

impl fmt::Display for TaskSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} `{}`", self.task_name, self.task_id)?;
        writeln!(f)?;
        writeln!(f, "- Suggestion: {}", self.suggestion)?;
        writeln!(f, "- Reason: {}", self.reason)?;
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;
    use crate::models::{Feedback, Recurrence};

    #[test]
    fn test_plan_display_lists_slots_with_icons() {
        let mut plan = DayPlan::new(date(2024, 3, 1));
        plan.revision = 2;
        let mut slot = Slot::new(time(9, 0, 0, 0), time(9, 30, 0, 0), "stretch");
        slot.status = SlotStatus::Done;
        slot.feedback = Some(Feedback {
            rating: FeedbackRating::OnTrack,
            note: Some("felt good".into()),
        });
        plan.slots.push(slot);

        let out = plan.to_string();
        assert!(out.contains("# Plan for 2024-03-01 (Friday, revision 2)"));
        assert!(out.contains("- Status: draft"));
        assert!(out.contains("**09:00–09:30** stretch (✓ Done)"));
        assert!(out.contains("feedback: on_track \"felt good\""));
    }

    #[test]
    fn test_empty_plan_display() {
        let plan = DayPlan::new(date(2024, 3, 1));
        assert!(plan.to_string().contains("No slots in this plan."));
    }

    #[test]
    fn test_task_display_shows_window_and_recurrence() {
        let task = Task {
            id: "abc".into(),
            name: "Walk".into(),
            kind: TaskKind::Flexible,
            duration_min: 30,
            earliest_start: Some(time(12, 0, 0, 0)),
            latest_end: None,
            fixed_start: None,
            fixed_end: None,
            recurrence: Recurrence::NDays { interval_days: 2 },
            priority: 2,
            energy_band: EnergyBand::Low,
            active: false,
            last_done: None,
            created_on: date(2024, 1, 1),
        };
        let out = task.to_string();
        assert!(out.contains("## Walk (inactive)"));
        assert!(out.contains("- Window: 12:00 to day end"));
        assert!(out.contains("- Repeats: every 2 days"));
    }
}
