//! Greedy single-pass slot placement.
//!
//! [`generate_plan`] filters the catalog down to tasks due on the date, pins
//! appointments at their exact times, then walks flexible tasks by priority,
//! most overdue first within a priority, then by id, and drops each into the
//! earliest free gap of its window. Nothing already placed is ever moved.
//!
//! Flexible tasks that do not fit are reported in [`Schedule::unplaced`]
//! alongside the partial plan.

use std::fmt;

use jiff::civil::{Date, Time};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlannerError, Result},
    models::{
        DayPlan, Recurrence, Settings, Slot, Task,
        clock::{ensure_minute_aligned, format_hhmm, minute_of_day, time_from_minutes},
    },
};


/// Read access to the task catalog used for planning.
pub trait TaskCatalog {
    /// Every active task, in any order.
    fn active_tasks(&mut self) -> Result<Vec<Task>>;
}

impl TaskCatalog for Vec<Task> {
    fn active_tasks(&mut self) -> Result<Vec<Task>> {
        Ok(self.iter().filter(|t| t.active).cloned().collect())
    }
}

/// Why a flexible task could not be placed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// The window exists but every gap in it is too short
    NoFreeInterval,
    /// The task's bounds do not intersect the working day
    EmptyWindow,
    /// The task has no duration to place
    ZeroDuration,
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnplacedReason::NoFreeInterval => "no free interval long enough",
            UnplacedReason::EmptyWindow => "window lies outside the working day",
            UnplacedReason::ZeroDuration => "duration is zero",
        };
        f.write_str(text)
    }
}

/// A due flexible task left out of the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnplacedTask {
    pub task_id: String,
    pub task_name: String,
    pub reason: UnplacedReason,
}

/// Planner output: the placed plan plus anything that did not fit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub plan: DayPlan,
    pub unplaced: Vec<UnplacedTask>,
}

/// An occupied `[start, end)` range in minutes since midnight.
#[derive(Debug, Clone, Copy)]
struct Interval {
    start: u16,
    end: u16,
}

/// Place every task due on `date` into `[day_start, day_end]`.
pub fn generate_plan(
    date: Date,
    tasks: &[Task],
    day_start: Time,
    day_end: Time,
) -> Result<Schedule> {
    if day_start >= day_end {
        return Err(PlannerError::validation("day_start").with_reason(format!(
            "day start {} must be before day end {}",
            format_hhmm(day_start),
            format_hhmm(day_end)
        )));
    }
    ensure_minute_aligned("day_start", day_start)?;
    ensure_minute_aligned("day_end", day_end)?;

    let mut fixed: Vec<(&Task, Time, Time)> = Vec::new();
    let mut flexible: Vec<&Task> = Vec::new();
    for task in tasks.iter().filter(|t| t.is_due_on(date)) {
        task.ensure_whole_minutes()?;
        match task.fixed_interval() {
            Some((start, end)) => fixed.push((task, start, end)),
            None => flexible.push(task),
        }
    }

    fixed.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));
    flexible.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| lateness(b, date).total_cmp(&lateness(a, date)))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut plan = DayPlan::new(date);
    let mut occupied: Vec<Interval> = Vec::with_capacity(fixed.len() + flexible.len());

    for (idx, &(task, start, end)) in fixed.iter().enumerate() {
        if start >= end {
            return Err(PlannerError::validation("fixed_end").with_reason(format!(
                "task '{}' ends at {} which is not after its start {}",
                task.id,
                format_hhmm(end),
                format_hhmm(start)
            )));
        }
        if let Some(&(prev, _, prev_end)) = idx.checked_sub(1).map(|i| &fixed[i])
            && start < prev_end
        {
            return Err(PlannerError::FixedTaskConflict {
                first: prev.id.clone(),
                second: task.id.clone(),
            });
        }
        debug!(
            "Pinned '{}' at {}-{}",
            task.id,
            format_hhmm(start),
            format_hhmm(end)
        );
        occupied.push(Interval {
            start: minute_of_day(start),
            end: minute_of_day(end),
        });
        plan.slots.push(Slot::new(start, end, task.id.clone()));
    }

    let mut unplaced = Vec::new();
    let day = Interval {
        start: minute_of_day(day_start),
        end: minute_of_day(day_end),
    };

    for task in flexible {
        match place_flexible(task, day, &occupied) {
            Ok(slot) => {
                let start = time_from_minutes(slot.start);
                let end = time_from_minutes(slot.end);
                let (Some(start), Some(end)) = (start, end) else {
                    // windows end at or before 23:59
                    unplaced.push(unplaced_task(task, UnplacedReason::NoFreeInterval));
                    continue;
                };
                debug!(
                    "Placed '{}' (priority {}) at {}-{}",
                    task.id,
                    task.priority,
                    format_hhmm(start),
                    format_hhmm(end)
                );
                let at = occupied.partition_point(|iv| iv.start <= slot.start);
                occupied.insert(at, slot);
                plan.slots.push(Slot::new(start, end, task.id.clone()));
            }
            Err(reason) => {
                warn!("Could not place task '{}' on {date}: {reason}", task.id);
                unplaced.push(unplaced_task(task, reason));
            }
        }
    }

    plan.slots
        .sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.task_id.cmp(&b.task_id)));

    Ok(Schedule { plan, unplaced })
}

/// Plan `date` from a catalog using the configured working window.
pub fn plan_from_catalog<C: TaskCatalog + ?Sized>(
    catalog: &mut C,
    date: Date,
    settings: &Settings,
) -> Result<Schedule> {
    let tasks = catalog.active_tasks()?;
    generate_plan(date, &tasks, settings.day_start, settings.day_end)
}

/// Days since the task was last done, in units of its interval. Tasks never
/// done count as exactly on time.
fn lateness(task: &Task, date: Date) -> f64 {
    let Some(last_done) = task.last_done else {
        return 1.0;
    };
    let days = match last_done.until(date) {
        Ok(span) => span.get_days(),
        Err(e) => {
            warn!("cannot measure days from {last_done} to {date}: {e}");
            0
        }
    };
    let interval = match task.recurrence {
        Recurrence::NDays { interval_days } if interval_days > 0 => interval_days,
        _ => 1,
    };
    f64::from(days) / f64::from(interval)
}

fn unplaced_task(task: &Task, reason: UnplacedReason) -> UnplacedTask {
    UnplacedTask {
        task_id: task.id.clone(),
        task_name: task.name.clone(),
        reason,
    }
}

/// Earliest gap of `task.duration_min` inside the task's window that does
/// not overlap `occupied` (sorted by start).
fn place_flexible(
    task: &Task,
    day: Interval,
    occupied: &[Interval],
) -> std::result::Result<Interval, UnplacedReason> {
    if task.duration_min == 0 {
        return Err(UnplacedReason::ZeroDuration);
    }

    let window_start = task
        .earliest_start
        .map_or(day.start, |t| minute_of_day(t).max(day.start));
    let window_end = task
        .latest_end
        .map_or(day.end, |t| minute_of_day(t).min(day.end));
    if window_start >= window_end {
        return Err(UnplacedReason::EmptyWindow);
    }

    let duration = u16::try_from(task.duration_min).map_err(|_| UnplacedReason::NoFreeInterval)?;
    let mut cursor = window_start;
    for busy in occupied {
        if busy.end <= cursor {
            continue;
        }
        if busy.start >= cursor.saturating_add(duration) {
            break;
        }
        cursor = busy.end;
        if cursor >= window_end {
            break;
        }
    }

    match cursor.checked_add(duration) {
        Some(end) if end <= window_end => Ok(Interval { start: cursor, end }),
        _ => Err(UnplacedReason::NoFreeInterval),
    }
}
