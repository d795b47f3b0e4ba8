//! Core library for the daylit day planner.
//!
//! The crate covers three concerns:
//!
//! - **Recurrence** ([`models::recurrence`]): deciding whether a task is due
//!   on a calendar date
//! - **Slot planning** ([`schedule`]): placing fixed appointments verbatim and
//!   packing flexible tasks greedily into the remaining free time
//! - **Plan storage** ([`store`], [`db`]): revisioned, soft-deletable day
//!   plans behind the [`PlanStore`] trait, with SQLite and in-memory backends
//!
//! [`Planner`] ties these together behind an async API; [`display`] formats
//! results as markdown for the CLI's terminal renderer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use daylit_core::{
//!     PlannerBuilder,
//!     models::{EnergyBand, Recurrence, TaskKind},
//!     params::{GeneratePlan, NewTask},
//! };
//! use jiff::civil::date;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("daylit.db"))
//!     .build()
//!     .await?;
//!
//! planner
//!     .add_task(&NewTask {
//!         name: "Morning run".to_string(),
//!         kind: TaskKind::Flexible,
//!         duration_min: 30,
//!         earliest_start: None,
//!         latest_end: None,
//!         fixed_start: None,
//!         fixed_end: None,
//!         recurrence: Recurrence::Weekdays,
//!         priority: 2,
//!         energy_band: EnergyBand::High,
//!     })
//!     .await?;
//!
//! let schedule = planner
//!     .generate_plan(&GeneratePlan { date: date(2024, 3, 1), new_revision: false })
//!     .await?;
//! println!("{schedule}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod optimizer;
pub mod params;
pub mod planner;
pub mod schedule;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use display::{CreateResult, DeleteResult, OperationStatus, UpdateResult};
pub use error::{PlannerError, Result};
pub use models::{DayPlan, RevisionRecord, Settings, Slot, SlotKey, Task};
pub use planner::{Planner, PlannerBuilder};
pub use schedule::{Schedule, generate_plan};
pub use store::{MemoryStore, PlanStore, PlanTransaction};
