//! Status and confirmation message types for operation feedback.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Success,
    Notice,
    Failure,
}

/// A one-line operation outcome.
#[derive(Debug, Clone)]
pub struct OperationStatus {
    pub message: String,
    level: Level,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Success,
        }
    }

    /// Informational outcome where nothing needed doing.
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Notice,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Level::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.level != Level::Failure
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            Level::Success => "Success:",
            Level::Notice => "Note:",
            Level::Failure => "Error:",
        };
        writeln!(f, "{label} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_display() {
        let restored = OperationStatus::success("Restored plan for 2024-03-03");
        assert_eq!(restored.to_string(), "Success: Restored plan for 2024-03-03\n");

        let nothing = OperationStatus::notice("No suggestions");
        assert!(nothing.to_string().starts_with("Note:"));
        assert!(nothing.is_success());

        assert!(!OperationStatus::failure("boom").is_success());
    }
}
