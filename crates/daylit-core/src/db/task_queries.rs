//! Task catalog queries.

use jiff::civil::Date;
use log::debug;
use rusqlite::{OptionalExtension, Row, params};

use super::utils::{conversion_error, optional_time_column, parse_optional_text, parse_text};
use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Recurrence, Task, clock::format_hhmm},
    schedule::TaskCatalog,
};

const TASK_COLUMNS: &str = "id, name, kind, duration_min, earliest_start, latest_end, fixed_start, \
     fixed_end, recurrence, priority, energy_band, active, last_done, created_on";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (id, name, kind, duration_min, earliest_start, latest_end, \
     fixed_start, fixed_end, recurrence, priority, energy_band, active, last_done, created_on) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";
const CHECK_TASK_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";
const UPDATE_LAST_DONE_SQL: &str =
    "UPDATE tasks SET last_done = ?2 WHERE id = ?1 AND (last_done IS NULL OR last_done < ?2)";
const SET_ACTIVE_SQL: &str = "UPDATE tasks SET active = ?2 WHERE id = ?1";
const UPDATE_TASK_SQL: &str = "UPDATE tasks SET name = ?2, kind = ?3, duration_min = ?4, earliest_start = ?5, \
     latest_end = ?6, fixed_start = ?7, fixed_end = ?8, recurrence = ?9, priority = ?10, energy_band = ?11, \
     active = ?12, last_done = ?13 WHERE id = ?1";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let recurrence_json: String = row.get(8)?;
    let recurrence: Recurrence = serde_json::from_str(&recurrence_json)
        .map_err(|e| conversion_error(8, format!("Invalid recurrence '{recurrence_json}': {e}")))?;

    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: parse_text(row, 2)?,
        duration_min: row.get(3)?,
        earliest_start: optional_time_column(row, 4)?,
        latest_end: optional_time_column(row, 5)?,
        fixed_start: optional_time_column(row, 6)?,
        fixed_end: optional_time_column(row, 7)?,
        recurrence,
        priority: row.get(9)?,
        energy_band: parse_text(row, 10)?,
        active: row.get(11)?,
        last_done: parse_optional_text(row, 12)?,
        created_on: parse_text(row, 13)?,
    })
}

impl super::Database {
    /// Validates and stores a new task.
    pub fn add_task(&mut self, task: &Task) -> Result<()> {
        task.validate()?;
        let recurrence = serde_json::to_string(&task.recurrence)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_TASK_EXISTS_SQL, params![task.id], |row| row.get(0))
            .db_context("Failed to check task existence")?;
        if exists {
            return Err(PlannerError::validation("id")
                .with_reason(format!("task '{}' already exists", task.id)));
        }

        tx.execute(
            INSERT_TASK_SQL,
            params![
                task.id,
                task.name,
                task.kind.as_str(),
                task.duration_min,
                task.earliest_start.map(format_hhmm),
                task.latest_end.map(format_hhmm),
                task.fixed_start.map(format_hhmm),
                task.fixed_end.map(format_hhmm),
                recurrence,
                task.priority,
                task.energy_band.as_str(),
                task.active,
                task.last_done.map(|d| d.to_string()),
                task.created_on.to_string(),
            ],
        )
        .db_context("Failed to insert task")?;

        tx.commit().db_context("Failed to commit transaction")?;
        log::debug!("Added task '{}' ({})", task.id, task.name);
        Ok(())
    }

    /// Validates and overwrites an existing task. `created_on` is kept.
    pub fn update_task(&mut self, task: &Task) -> Result<()> {
        task.validate()?;
        let recurrence = serde_json::to_string(&task.recurrence)?;

        let changed = self
            .connection
            .execute(
                UPDATE_TASK_SQL,
                params![
                    task.id,
                    task.name,
                    task.kind.as_str(),
                    task.duration_min,
                    task.earliest_start.map(format_hhmm),
                    task.latest_end.map(format_hhmm),
                    task.fixed_start.map(format_hhmm),
                    task.fixed_end.map(format_hhmm),
                    recurrence,
                    task.priority,
                    task.energy_band.as_str(),
                    task.active,
                    task.last_done.map(|d| d.to_string()),
                ],
            )
            .db_context("Failed to update task")?;
        if changed == 0 {
            return Err(PlannerError::not_found(format!("Task '{}'", task.id)));
        }
        Ok(())
    }

    /// Retrieves a task by its ID.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        self.connection
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                task_from_row,
            )
            .optional()
            .db_context("Failed to query task")
    }

    /// Lists tasks ordered by priority then id. Inactive tasks are included
    /// only when `include_inactive` is set.
    pub fn list_tasks(&self, include_inactive: bool) -> Result<Vec<Task>> {
        let filter = if include_inactive {
            ""
        } else {
            " WHERE active = 1"
        };
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks{filter} ORDER BY priority, id");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare task query")?;
        let rows = stmt
            .query_map([], task_from_row)
            .db_context("Failed to query tasks")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read tasks")
    }

    /// Records a completion, moving the task's n-days anchor forward to
    /// `date`. Completions older than the current anchor leave it alone.
    pub fn mark_task_done(&mut self, id: &str, date: Date) -> Result<()> {
        let changed = self
            .connection
            .execute(UPDATE_LAST_DONE_SQL, params![id, date.to_string()])
            .db_context("Failed to update task completion")?;
        if changed > 0 {
            return Ok(());
        }

        let exists: bool = self
            .connection
            .query_row(CHECK_TASK_EXISTS_SQL, params![id], |row| row.get(0))
            .db_context("Failed to check task existence")?;
        if !exists {
            return Err(PlannerError::not_found(format!("Task '{id}'")));
        }
        debug!("Kept later completion for task '{id}' over {date}");
        Ok(())
    }

    /// Activates or deactivates a task.
    pub fn set_task_active(&mut self, id: &str, active: bool) -> Result<()> {
        let changed = self
            .connection
            .execute(SET_ACTIVE_SQL, params![id, active])
            .db_context("Failed to update task")?;
        if changed == 0 {
            return Err(PlannerError::not_found(format!("Task '{id}'")));
        }
        Ok(())
    }
}

impl TaskCatalog for super::Database {
    fn active_tasks(&mut self) -> Result<Vec<Task>> {
        self.list_tasks(false)
    }
}
