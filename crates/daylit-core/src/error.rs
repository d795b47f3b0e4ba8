//! Error types for the daylit library.

use std::path::PathBuf;

use jiff::civil::Date;
use thiserror::Error;

/// Comprehensive error type for all planning and storage operations.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// No such plan, revision, slot or task (soft-deleted records count as
    /// absent)
    #[error("{what} not found")]
    NotFound { what: String },
    /// Attempt to overwrite an accepted revision or write into a deleted one
    #[error("Conflict on plan {date} revision {revision}: {reason}")]
    Conflict {
        date: Date,
        revision: u32,
        reason: String,
    },
    /// Every plan revision for the date is already soft-deleted
    #[error("Plan for {date} is already deleted")]
    AlreadyDeleted { date: Date },
    /// Restore requested but nothing is deleted for the date
    #[error("Plan for {date} is not deleted")]
    NotDeleted { date: Date },
    /// Malformed input
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// Two fixed-time tasks claim overlapping intervals
    #[error("Fixed tasks '{first}' and '{second}' overlap")]
    FixedTaskConflict { first: String, second: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Creates a not-found error for the described record.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Creates a conflict error for a plan revision.
    pub fn conflict(date: Date, revision: u32, reason: impl Into<String>) -> Self {
        Self::Conflict {
            date,
            revision,
            reason: reason.into(),
        }
    }

    /// Creates a new database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Whether this error belongs to the user-facing store taxonomy rather
    /// than an infrastructure failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::AlreadyDeleted { .. }
                | Self::NotDeleted { .. }
                | Self::Validation { .. }
                | Self::FixedTaskConflict { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database_error(message, e))
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_validation_builder() {
        let err = PlannerError::validation("duration_min").with_reason("must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'duration_min': must be positive"
        );
        assert!(err.is_user_error());
    }

    #[test]
    fn test_conflict_message_names_revision() {
        let err = PlannerError::conflict(date(2024, 3, 1), 2, "revision is accepted");
        assert_eq!(
            err.to_string(),
            "Conflict on plan 2024-03-01 revision 2: revision is accepted"
        );
    }

    #[test]
    fn test_infrastructure_errors_are_not_user_errors() {
        let err = PlannerError::XdgDirectory("no home".into());
        assert!(!err.is_user_error());
    }
}
