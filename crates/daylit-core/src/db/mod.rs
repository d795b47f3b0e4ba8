//! SQLite persistence for tasks, settings and day plans.
//!
//! [`Database`] implements [`crate::store::PlanStore`]; the SQLite dialect of
//! the plan transaction lives in [`plan_queries`]. The task catalog and
//! settings are plain queries on the same connection.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod feedback_queries;
pub mod migrations;
pub mod plan_queries;
pub mod settings_queries;
pub mod task_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and brings the
    /// schema up to date.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
