//! Command handlers: run each subcommand against the planner and render the
//! result.

use std::fmt::Display;

use anyhow::{Context, Result};
use daylit_core::{
    Planner, PlannerError,
    display::{
        CreateResult, DeleteResult, OperationStatus, Revisions, Suggestions, Tasks, TimeRange,
        UpdateResult,
    },
    models::{SlotKey, SlotStatus},
    params::{
        GeneratePlan, ListTasks, MarkNotified, NewTask, Optimize, RecordFeedback, ShowPlan,
    },
};
use jiff::Zoned;
use log::debug;

use crate::{
    args::{
        DropSlotArgs, FeedbackArgs, OptimizeArgs, PlanCommands, SettingsCommands, TaskCommands,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    fn render(&self, content: impl Display) -> Result<()> {
        self.renderer
            .render(&content.to_string())
            .context("Failed to write output")
    }

    pub async fn handle_task_command(&self, command: TaskCommands) -> Result<()> {
        match command {
            TaskCommands::Add(args) => {
                let params = NewTask::try_from(args)?;
                let task = self
                    .planner
                    .add_task(&params)
                    .await
                    .context("Failed to add task")?;
                self.render(CreateResult::new(task))
            }
            TaskCommands::List(args) => {
                let tasks = self
                    .planner
                    .list_tasks(&ListTasks {
                        include_inactive: args.all,
                    })
                    .await
                    .context("Failed to list tasks")?;
                self.render(Tasks(tasks))
            }
            TaskCommands::Enable { id } => self.set_active(&id, true).await,
            TaskCommands::Disable { id } => self.set_active(&id, false).await,
        }
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<()> {
        let task = self
            .planner
            .set_task_active(id, active)
            .await
            .with_context(|| format!("Failed to update task {id}"))?;
        let change = if active { "Enabled" } else { "Disabled" };
        self.render(UpdateResult::with_changes(task, vec![change.to_string()]))
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate(args) => {
                let schedule = self
                    .planner
                    .generate_plan(&GeneratePlan {
                        date: args.date,
                        new_revision: args.new_revision,
                    })
                    .await
                    .context("Failed to generate plan")?;
                self.render(CreateResult::new(schedule))
            }
            PlanCommands::Accept(args) => {
                let plan = self
                    .planner
                    .accept_plan(args.date)
                    .await
                    .context("Failed to accept plan")?;
                let accepted = plan
                    .slots
                    .iter()
                    .filter(|s| s.status == SlotStatus::Accepted)
                    .count();
                let changes = vec![format!("Accepted {accepted} slot(s)")];
                self.render(UpdateResult::with_changes(plan, changes))
            }
            PlanCommands::Show(args) => {
                let agenda = self
                    .planner
                    .show_agenda(&ShowPlan {
                        date: args.date,
                        revision: args.revision,
                    })
                    .await
                    .context("Failed to load plan")?;
                self.render(agenda)
            }
            PlanCommands::History(args) => {
                let revisions = self
                    .planner
                    .list_revisions(args.date)
                    .await
                    .context("Failed to load plan history")?;
                self.render(Revisions(revisions))
            }
            PlanCommands::Delete { date } => {
                let deleted = self
                    .planner
                    .delete_plan(date)
                    .await
                    .context("Failed to delete plan")?;
                self.render(DeleteResult::new(deleted))
            }
            PlanCommands::Restore { date } => {
                let restored = self
                    .planner
                    .restore_plan(date)
                    .await
                    .context("Failed to restore plan")?;
                let revisions = restored
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                self.render(OperationStatus::success(format!(
                    "Restored plan for {date} (revision {revisions})"
                )))
            }
            PlanCommands::DropSlot(args) => self.drop_slot(args).await,
            PlanCommands::Notified(args) => {
                let params = MarkNotified::from(args);
                self.planner
                    .mark_notified(&params)
                    .await
                    .context("Failed to record notification")?;
                self.render(OperationStatus::success(format!(
                    "Recorded {} notification for {}",
                    params.kind, params.key
                )))
            }
        }
    }

    async fn drop_slot(&self, args: DropSlotArgs) -> Result<()> {
        let revision = match args.revision {
            Some(revision) => revision,
            None => {
                self.planner
                    .show_plan(&ShowPlan {
                        date: args.date,
                        revision: None,
                    })
                    .await
                    .context("Failed to load plan")?
                    .revision
            }
        };
        let key = SlotKey {
            date: args.date,
            revision,
            start: args.start,
            task_id: args.task_id,
        };
        self.planner
            .delete_slot(key.clone())
            .await
            .context("Failed to drop slot")?;
        self.render(DeleteResult::new(key))
    }

    pub async fn feedback(&self, args: FeedbackArgs) -> Result<()> {
        let params = RecordFeedback::from(args);
        debug!("Recording feedback: {params:?}");
        let slot = self
            .planner
            .record_feedback(&params)
            .await
            .context("Failed to record feedback")?;
        let changes = vec![format!("Rated {}", params.rating)];
        self.render(UpdateResult::with_changes(slot, changes))
    }

    pub async fn handle_settings_command(&self, command: SettingsCommands) -> Result<()> {
        match command {
            SettingsCommands::Show => {
                let settings = self
                    .planner
                    .get_settings()
                    .await
                    .context("Failed to load settings")?;
                self.render(settings)
            }
            SettingsCommands::Set(args) => {
                let settings = self
                    .planner
                    .update_settings(&args.into())
                    .await
                    .context("Failed to update settings")?;
                self.render(UpdateResult::new(settings))
            }
        }
    }

    pub async fn optimize(&self, args: OptimizeArgs) -> Result<()> {
        let suggestions = self
            .planner
            .suggest(&Optimize::from(&args))
            .await
            .context("Failed to analyze feedback")?;

        if !args.apply || suggestions.is_empty() {
            return self.render(Suggestions(suggestions));
        }

        let mut report = Suggestions(suggestions.clone()).to_string();
        report.push('\n');
        for suggestion in &suggestions {
            let status = match self
                .planner
                .apply_suggestion(suggestion)
                .await
                .with_context(|| format!("Failed to apply suggestion to {}", suggestion.task_id))?
            {
                Some(_) => OperationStatus::success(format!(
                    "{}: {}",
                    suggestion.task_name, suggestion.suggestion
                )),
                None => OperationStatus::notice(format!(
                    "{}: {} needs a manual decision",
                    suggestion.task_name, suggestion.suggestion
                )),
            };
            report.push_str(&format!("{status}\n"));
        }
        self.render(report)
    }

    /// The slot of today's latest plan covering the current time.
    pub async fn now(&self) -> Result<()> {
        let now = Zoned::now();
        let plan = match self
            .planner
            .show_plan(&ShowPlan {
                date: now.date(),
                revision: None,
            })
            .await
        {
            Ok(plan) => plan,
            Err(PlannerError::NotFound { .. }) => {
                return self.render(OperationStatus::notice(format!(
                    "No plan for {}. Run `daylit plan generate` to create one.",
                    now.date()
                )));
            }
            Err(e) => return Err(e).context("Failed to load plan"),
        };

        let time = now.time();
        let current = plan.slots.iter().find(|s| s.start <= time && time < s.end);
        let Some(slot) = current else {
            let next = plan.slots.iter().find(|s| s.start > time);
            let message = match next {
                Some(slot) => format!(
                    "Free time. Next up at {}: `{}`",
                    TimeRange(slot.start, slot.end),
                    slot.task_id
                ),
                None => "Free time. Nothing else is planned today.".to_string(),
            };
            return self.render(OperationStatus::notice(message));
        };

        let name = self
            .planner
            .get_task(&slot.task_id)
            .await
            .context("Failed to load task")?
            .map_or_else(|| slot.task_id.clone(), |task| task.name);
        self.render(format!(
            "# Now\n\n- **{}** {name} ({})\n",
            TimeRange(slot.start, slot.end),
            slot.status.with_icon()
        ))
    }

    /// Default command: today's plan, or a hint when there is none.
    pub async fn show_today(&self) -> Result<()> {
        let date = Zoned::now().date();
        match self
            .planner
            .show_agenda(&ShowPlan {
                date,
                revision: None,
            })
            .await
        {
            Ok(agenda) => self.render(agenda),
            Err(PlannerError::NotFound { .. }) => self.render(OperationStatus::notice(format!(
                "No plan for {date}. Run `daylit plan generate` to create one."
            ))),
            Err(e) => Err(e).context("Failed to load plan"),
        }
    }
}
