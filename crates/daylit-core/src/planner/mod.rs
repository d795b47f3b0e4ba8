//! High-level async API over the SQLite store.
//!
//! [`Planner`] is the entry point for applications. Every call opens its own
//! connection and runs on tokio's blocking pool, so callers stay async while
//! SQLite work remains synchronous.
//!
//! ## Submodules
//!
//! - [`builder`]: creates a [`Planner`], resolving the database location
//! - [`plan_ops`]: plan storage passthroughs (show, history, delete, restore)
//! - [`task_ops`]: task catalog and settings
//! - [`workflow`]: generate, accept, feedback and suggestion workflows
//!
//! # Example
//!
//! ```rust,no_run
//! use daylit_core::{PlannerBuilder, params::GeneratePlan};
//! use jiff::civil::date;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("/tmp/daylit.db"))
//!     .build()
//!     .await?;
//!
//! let generated = planner
//!     .generate_plan(&GeneratePlan { date: date(2024, 3, 1), new_revision: false })
//!     .await?;
//! println!("{generated}");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::Database,
    error::{PlannerError, Result},
};

pub mod builder;
pub mod plan_ops;
pub mod task_ops;
pub mod workflow;


pub use builder::PlannerBuilder;

/// Main planner interface.
pub struct Planner {
    pub(crate) db_path: PathBuf,
}

impl Planner {
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Location of the backing database file.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `f` against a fresh connection on the blocking pool.
    pub(crate) async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
