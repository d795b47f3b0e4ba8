//! Feedback history used by the suggestion engine.

use rusqlite::params;

use super::utils::parse_text;
use crate::{
    error::{DatabaseResultExt, Result},
    optimizer::FeedbackEntry,
};

// Only the latest live revision of each date counts, so feedback copied
// forward by a re-save is not double counted.
const SELECT_FEEDBACK_SQL: &str = "SELECT s.plan_date, s.feedback_rating, s.feedback_note \
     FROM slots s JOIN plans p ON p.date = s.plan_date AND p.revision = s.plan_revision \
     WHERE s.task_id = ?1 AND s.feedback_rating IS NOT NULL \
       AND s.deleted_at IS NULL AND p.deleted_at IS NULL \
       AND p.revision = (SELECT MAX(p2.revision) FROM plans p2 WHERE p2.date = p.date AND p2.deleted_at IS NULL) \
     ORDER BY s.plan_date DESC, s.start_time DESC \
     LIMIT ?2";

impl super::Database {
    /// Rated slots for a task, newest date first.
    pub fn feedback_history(&self, task_id: &str, limit: usize) -> Result<Vec<FeedbackEntry>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_FEEDBACK_SQL)
            .db_context("Failed to prepare feedback query")?;
        let rows = stmt
            .query_map(params![task_id, limit as i64], |row| {
                Ok(FeedbackEntry {
                    date: parse_text(row, 0)?,
                    rating: parse_text(row, 1)?,
                    note: row.get(2)?,
                })
            })
            .db_context("Failed to query feedback history")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read feedback history")
    }
}
