//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, PlannerError, Result};

const SCHEMA_SQL: &str = include_str!("../../assets/schema.sql");

/// Columns added after the first schema release, as `(table, column, type)`.
/// Fresh databases get them from the schema itself.
const ADDED_COLUMNS: &[(&str, &str, &str)] = &[
    ("slots", "last_notified_start", "TEXT"),
    ("slots", "last_notified_end", "TEXT"),
];

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        self.connection
            .execute_batch(SCHEMA_SQL)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .db_context("Failed to inspect table columns")
    }

    /// Apply additive migrations for databases created by older versions.
    fn apply_migrations(&self) -> Result<()> {
        for &(table, column, sql_type) in ADDED_COLUMNS {
            if self.has_column(table, column)? {
                continue;
            }
            log::info!("Migrating database: adding {table}.{column}");
            self.connection
                .execute(
                    &format!("ALTER TABLE {table} ADD COLUMN {column} {sql_type}"),
                    [],
                )
                .map_err(|e| {
                    PlannerError::database_error(
                        &format!("Failed to add {column} column to {table} table"),
                        e,
                    )
                })?;
        }

        Ok(())
    }
}
