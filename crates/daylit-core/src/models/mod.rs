//! Data models for tasks, day plans and slots.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping formatting out of the data types.
//!
//! # Examples
//!
//! ```rust
//! use daylit_core::models::{DayPlan, Slot};
//! use jiff::civil::{date, time};
//!
//! let mut plan = DayPlan::new(date(2024, 3, 1));
//! plan.slots.push(Slot::new(time(9, 0, 0, 0), time(9, 30, 0, 0), "stretch"));
//! assert_eq!(plan.revision, 0); // assigned by the store on save
//! assert!(!plan.is_accepted());
//! ```

pub mod clock;
pub mod plan;
pub mod recurrence;
pub mod settings;
pub mod status;
pub mod task;

pub use plan::{DayPlan, Feedback, RevisionRecord, Slot, SlotKey};
pub use recurrence::{Recurrence, Weekday, is_due_on};
pub use settings::Settings;
pub use status::{EnergyBand, FeedbackRating, NotificationKind, SlotStatus, TaskKind};
pub use task::Task;
