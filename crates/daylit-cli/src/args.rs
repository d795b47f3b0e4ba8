//! Command-line argument definitions.
//!
//! Argument structs carry clap attributes only; each converts into the
//! matching core parameter type from `daylit_core::params`, so the core
//! crate never depends on clap.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use daylit_core::{
    models::{
        EnergyBand, FeedbackRating, NotificationKind, Recurrence, SlotKey, TaskKind, Weekday,
        clock::parse_hhmm,
    },
    params::{FeedbackTarget, MarkNotified, NewTask, Optimize, RecordFeedback, UpdateSettings},
};
use jiff::{
    Timestamp, ToSpan, Zoned,
    civil::{Date, Time},
};

/// Plan your day from a catalog of recurring and fixed-time tasks
///
/// Tasks carry a recurrence rule, a duration or a fixed time, and a
/// priority. `daylit plan generate` packs the tasks due on a date into the
/// working window; plans are kept as revisions that can be accepted,
/// annotated with feedback, deleted and restored.
#[derive(Parser)]
#[command(version, about, name = "daylit")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/daylit/daylit.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the task catalog
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Generate, accept and inspect day plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Rate a slot of an accepted plan
    #[command(alias = "fb")]
    Feedback(FeedbackArgs),
    /// Show or change the working window
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Suggest task changes from recent feedback
    Optimize(OptimizeArgs),
    /// Show what today's plan has scheduled right now
    Now,
}

/// Accepts `YYYY-MM-DD`, `today`, `tomorrow` or `yesterday`.
pub fn parse_date(value: &str) -> Result<Date, String> {
    let today = Zoned::now().date();
    let shifted = |days: i64| {
        today
            .checked_add(days.days())
            .map_err(|e| format!("cannot compute date: {e}"))
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => shifted(1),
        "yesterday" => shifted(-1),
        other => other
            .parse()
            .map_err(|_| format!("expected YYYY-MM-DD or 'today', got '{value}'")),
    }
}

/// Accepts `HH:MM`.
pub fn parse_time(value: &str) -> Result<Time, String> {
    parse_hhmm("time", value).map_err(|e| e.to_string())
}

// ============================================================================
// Task commands
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Placed by the planner within its window
    Flexible,
    /// Pinned to its fixed start and end
    Appointment,
}

impl From<KindArg> for TaskKind {
    fn from(val: KindArg) -> Self {
        match val {
            KindArg::Flexible => TaskKind::Flexible,
            KindArg::Appointment => TaskKind::Appointment,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum EnergyArg {
    Low,
    Medium,
    High,
}

impl From<EnergyArg> for EnergyBand {
    fn from(val: EnergyArg) -> Self {
        match val {
            EnergyArg::Low => EnergyBand::Low,
            EnergyArg::Medium => EnergyBand::Medium,
            EnergyArg::High => EnergyBand::High,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RecurrenceArg {
    /// Never planned automatically
    AdHoc,
    Daily,
    /// Monday to Friday
    Weekdays,
    /// On the days given with --weekdays
    Weekly,
    /// Every --interval days from the last completion
    NDays,
    /// On day --day of every month
    MonthlyDate,
    /// On the --occurrence'th --weekday of every month
    MonthlyDay,
    /// On --month/--day every year
    Yearly,
}

/// Add a task to the catalog
#[derive(ClapArgs)]
pub struct AddTaskArgs {
    /// Name of the task
    pub name: String,
    /// Duration in minutes (flexible tasks)
    #[arg(short, long, default_value_t = 0)]
    pub duration: u32,
    /// Task kind; implied as appointment when both fixed times are given
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,
    /// Fixed start time for appointments (HH:MM)
    #[arg(short = 'S', long, value_parser = parse_time)]
    pub fixed_start: Option<Time>,
    /// Fixed end time for appointments (HH:MM)
    #[arg(short = 'E', long, value_parser = parse_time)]
    pub fixed_end: Option<Time>,
    /// Earliest start time (HH:MM)
    #[arg(short = 's', long, value_parser = parse_time)]
    pub earliest: Option<Time>,
    /// Latest end time (HH:MM)
    #[arg(short = 'e', long, value_parser = parse_time)]
    pub latest: Option<Time>,
    /// How often the task recurs
    #[arg(short, long, value_enum, default_value_t = RecurrenceArg::AdHoc)]
    pub recurrence: RecurrenceArg,
    /// Comma-separated weekdays for weekly recurrence (mon,thu)
    #[arg(short, long, value_delimiter = ',')]
    pub weekdays: Vec<Weekday>,
    /// Interval in days for n-days recurrence
    #[arg(short, long)]
    pub interval: Option<u32>,
    /// Day of month for monthly-date and yearly recurrence
    #[arg(long)]
    pub day: Option<u8>,
    /// Month for yearly recurrence
    #[arg(long)]
    pub month: Option<u8>,
    /// Occurrence within the month for monthly-day recurrence; negative
    /// counts from the end (-1 is the last)
    #[arg(long, allow_negative_numbers = true)]
    pub occurrence: Option<i8>,
    /// Weekday for monthly-day recurrence
    #[arg(long)]
    pub weekday: Option<Weekday>,
    /// Priority from 1 (highest) to 5 (lowest)
    #[arg(short, long, default_value_t = 3)]
    pub priority: u8,
    /// Energy the task needs
    #[arg(long, value_enum, default_value_t = EnergyArg::Medium)]
    pub energy: EnergyArg,
}

impl AddTaskArgs {
    fn recurrence(&self) -> anyhow::Result<Recurrence> {
        let rule = match self.recurrence {
            RecurrenceArg::AdHoc => Recurrence::AdHoc,
            RecurrenceArg::Daily => Recurrence::Daily,
            RecurrenceArg::Weekdays => Recurrence::Weekdays,
            RecurrenceArg::Weekly => {
                if self.weekdays.is_empty() {
                    bail!("weekly recurrence needs --weekdays");
                }
                Recurrence::Weekly {
                    weekdays: self.weekdays.clone(),
                }
            }
            RecurrenceArg::NDays => Recurrence::NDays {
                interval_days: self.interval.context("n-days recurrence needs --interval")?,
            },
            RecurrenceArg::MonthlyDate => Recurrence::MonthlyDate {
                day: self.day.context("monthly-date recurrence needs --day")?,
            },
            RecurrenceArg::MonthlyDay => Recurrence::MonthlyDay {
                occurrence: self
                    .occurrence
                    .context("monthly-day recurrence needs --occurrence")?,
                weekday: self
                    .weekday
                    .context("monthly-day recurrence needs --weekday")?,
            },
            RecurrenceArg::Yearly => Recurrence::Yearly {
                month: self.month.context("yearly recurrence needs --month")?,
                day: self.day.context("yearly recurrence needs --day")?,
            },
        };
        Ok(rule)
    }
}

impl TryFrom<AddTaskArgs> for NewTask {
    type Error = anyhow::Error;

    fn try_from(val: AddTaskArgs) -> anyhow::Result<Self> {
        let recurrence = val.recurrence()?;
        let kind = match val.kind {
            Some(kind) => kind.into(),
            None if val.fixed_start.is_some() && val.fixed_end.is_some() => TaskKind::Appointment,
            None => TaskKind::Flexible,
        };
        Ok(NewTask {
            name: val.name,
            kind,
            duration_min: val.duration,
            earliest_start: val.earliest,
            latest_end: val.latest,
            fixed_start: val.fixed_start,
            fixed_end: val.fixed_end,
            recurrence,
            priority: val.priority,
            energy_band: val.energy.into(),
        })
    }
}

#[derive(ClapArgs)]
pub struct ListTasksArgs {
    /// Include deactivated tasks
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the catalog
    #[command(alias = "a")]
    Add(AddTaskArgs),
    /// List tasks
    #[command(aliases = ["l", "ls"])]
    List(ListTasksArgs),
    /// Make a task eligible for planning again
    Enable {
        /// Task ID
        id: String,
    },
    /// Keep a task in the catalog but stop planning it
    Disable {
        /// Task ID
        id: String,
    },
}

// ============================================================================
// Plan commands
// ============================================================================

#[derive(ClapArgs)]
pub struct DateArg {
    /// Plan date: YYYY-MM-DD, today, tomorrow or yesterday
    #[arg(value_parser = parse_date, default_value = "today")]
    pub date: Date,
}

#[derive(ClapArgs)]
pub struct GeneratePlanArgs {
    /// Plan date: YYYY-MM-DD, today, tomorrow or yesterday
    #[arg(value_parser = parse_date, default_value = "today")]
    pub date: Date,
    /// Plan again even when the latest revision is accepted
    #[arg(long)]
    pub new_revision: bool,
}

#[derive(ClapArgs)]
pub struct ShowPlanArgs {
    /// Plan date: YYYY-MM-DD, today, tomorrow or yesterday
    #[arg(value_parser = parse_date, default_value = "today")]
    pub date: Date,
    /// Show this revision instead of the latest
    #[arg(short, long)]
    pub revision: Option<u32>,
}

#[derive(ClapArgs)]
pub struct DropSlotArgs {
    /// Plan date
    #[arg(value_parser = parse_date)]
    pub date: Date,
    /// Slot start time (HH:MM)
    #[arg(value_parser = parse_time)]
    pub start: Time,
    /// Task ID of the slot
    pub task_id: String,
    /// Revision holding the slot; the latest when omitted
    #[arg(short, long)]
    pub revision: Option<u32>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum NotificationArg {
    Start,
    End,
}

impl From<NotificationArg> for NotificationKind {
    fn from(val: NotificationArg) -> Self {
        match val {
            NotificationArg::Start => NotificationKind::Start,
            NotificationArg::End => NotificationKind::End,
        }
    }
}

#[derive(ClapArgs)]
pub struct NotifiedArgs {
    /// Plan date
    #[arg(value_parser = parse_date)]
    pub date: Date,
    /// Plan revision
    pub revision: u32,
    /// Slot start time (HH:MM)
    #[arg(value_parser = parse_time)]
    pub start: Time,
    /// Task ID of the slot
    pub task_id: String,
    /// Which notification was delivered
    #[arg(short, long, value_enum)]
    pub kind: NotificationArg,
}

impl From<NotifiedArgs> for MarkNotified {
    fn from(val: NotifiedArgs) -> Self {
        Self {
            key: SlotKey {
                date: val.date,
                revision: val.revision,
                start: val.start,
                task_id: val.task_id,
            },
            kind: val.kind.into(),
            at: Timestamp::now(),
        }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate and save a plan
    #[command(alias = "g")]
    Generate(GeneratePlanArgs),
    /// Accept the latest revision
    #[command(alias = "a")]
    Accept(DateArg),
    /// Show a plan
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// List every revision of a date, deleted ones included
    #[command(alias = "h")]
    History(DateArg),
    /// Soft-delete every revision of a date
    #[command(aliases = ["d", "rm"])]
    Delete {
        /// Plan date
        #[arg(value_parser = parse_date)]
        date: Date,
    },
    /// Undo the most recent delete of a date
    #[command(alias = "r")]
    Restore {
        /// Plan date
        #[arg(value_parser = parse_date)]
        date: Date,
    },
    /// Remove one slot from an unaccepted revision
    DropSlot(DropSlotArgs),
    /// Record a delivered slot notification
    Notified(NotifiedArgs),
}

// ============================================================================
// Feedback, settings and optimize
// ============================================================================

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RatingArg {
    /// The slot went as planned
    OnTrack,
    /// The slot was too long or too hard
    TooMuch,
    /// The task did not need doing
    Unnecessary,
}

impl From<RatingArg> for FeedbackRating {
    fn from(val: RatingArg) -> Self {
        match val {
            RatingArg::OnTrack => FeedbackRating::OnTrack,
            RatingArg::TooMuch => FeedbackRating::TooMuch,
            RatingArg::Unnecessary => FeedbackRating::Unnecessary,
        }
    }
}

/// Rate a slot. Without --start and --task the most recent finished slot
/// without feedback is rated.
#[derive(ClapArgs)]
pub struct FeedbackArgs {
    /// How the slot went
    #[arg(value_enum)]
    pub rating: RatingArg,
    /// Plan date
    #[arg(long, value_parser = parse_date, default_value = "today")]
    pub date: Date,
    /// Start time of the slot to rate (HH:MM)
    #[arg(long, value_parser = parse_time, requires = "task")]
    pub start: Option<Time>,
    /// Task ID of the slot to rate
    #[arg(long, requires = "start")]
    pub task: Option<String>,
    /// Free-form note
    #[arg(short, long)]
    pub note: Option<String>,
}

impl From<FeedbackArgs> for RecordFeedback {
    fn from(val: FeedbackArgs) -> Self {
        let target = match (val.start, val.task) {
            (Some(start), Some(task_id)) => FeedbackTarget::Slot { start, task_id },
            _ => FeedbackTarget::LastEndedBy(Zoned::now().time()),
        };
        RecordFeedback {
            date: val.date,
            target,
            rating: val.rating.into(),
            note: val.note,
        }
    }
}

#[derive(ClapArgs)]
pub struct SetSettingsArgs {
    /// Start of the working window (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub day_start: Option<Time>,
    /// End of the working window (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub day_end: Option<Time>,
}

impl From<SetSettingsArgs> for UpdateSettings {
    fn from(val: SetSettingsArgs) -> Self {
        UpdateSettings {
            day_start: val.day_start,
            day_end: val.day_end,
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the current settings
    Show,
    /// Change the working window
    Set(SetSettingsArgs),
}

#[derive(ClapArgs)]
pub struct OptimizeArgs {
    /// Recent ratings considered per task
    #[arg(short, long, default_value_t = daylit_core::optimizer::DEFAULT_FEEDBACK_LIMIT)]
    pub limit: usize,
    /// Apply every suggestion that does not need a manual decision
    #[arg(long)]
    pub apply: bool,
}

impl From<&OptimizeArgs> for Optimize {
    fn from(val: &OptimizeArgs) -> Self {
        Self {
            feedback_limit: val.limit,
        }
    }
}
