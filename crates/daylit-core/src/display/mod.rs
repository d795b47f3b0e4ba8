//! Display formatting and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds newtype wrappers for collections and operation results so
//! the same data can be framed differently per context. All output is
//! markdown, rendered by the CLI.
//!
//! - [`collections`]: `Tasks`, `Revisions`, `Suggestions`, `PlanAgenda`
//! - [`results`]: `CreateResult`, `UpdateResult`, `DeleteResult`
//! - [`status`]: one-line `OperationStatus` messages
//! - [`datetime`]: local-time and time-range formatting
//!
//! ```rust
//! use daylit_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Restored plan for 2024-03-03");
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{PlanAgenda, Revisions, Suggestions, Tasks};
pub use datetime::{LocalDateTime, TimeRange};
pub use results::{CreateResult, DeleteResult, DeletedPlan, UpdateResult};
pub use status::OperationStatus;
