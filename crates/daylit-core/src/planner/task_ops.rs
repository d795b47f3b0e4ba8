//! Task catalog and settings operations for the Planner.

use jiff::Zoned;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::{Settings, Task},
    params::{ListTasks, NewTask, UpdateSettings},
};

impl Planner {
    /// Adds a task with a fresh id, created today.
    pub async fn add_task(&self, params: &NewTask) -> Result<Task> {
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            name: params.name.trim().to_string(),
            kind: params.kind,
            duration_min: params.duration_min,
            earliest_start: params.earliest_start,
            latest_end: params.latest_end,
            fixed_start: params.fixed_start,
            fixed_end: params.fixed_end,
            recurrence: params.recurrence.clone(),
            priority: params.priority,
            energy_band: params.energy_band,
            active: true,
            last_done: None,
            created_on: Zoned::now().date(),
        };

        self.with_db(move |db| {
            db.add_task(&task)?;
            Ok(task)
        })
        .await
    }

    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let id = id.to_string();
        self.with_db(move |db| db.get_task(&id)).await
    }

    pub async fn list_tasks(&self, params: &ListTasks) -> Result<Vec<Task>> {
        let include_inactive = params.include_inactive;
        self.with_db(move |db| db.list_tasks(include_inactive)).await
    }

    /// Activates or deactivates a task and returns it.
    pub async fn set_task_active(&self, id: &str, active: bool) -> Result<Task> {
        let id = id.to_string();
        self.with_db(move |db| {
            db.set_task_active(&id, active)?;
            db.get_task(&id)?
                .ok_or_else(|| PlannerError::not_found(format!("Task '{id}'")))
        })
        .await
    }

    pub async fn get_settings(&self) -> Result<Settings> {
        self.with_db(|db| db.get_settings()).await
    }

    /// Applies a partial settings update and returns the stored result.
    pub async fn update_settings(&self, params: &UpdateSettings) -> Result<Settings> {
        let update = params.clone();
        self.with_db(move |db| {
            let mut settings = db.get_settings()?;
            if let Some(start) = update.day_start {
                settings.day_start = start;
            }
            if let Some(end) = update.day_end {
                settings.day_end = end;
            }
            db.save_settings(&settings)?;
            Ok(settings)
        })
        .await
    }
}
