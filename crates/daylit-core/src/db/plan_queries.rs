//! SQLite dialect of the plan store.

use jiff::{Timestamp, civil::Date};
use rusqlite::{Row, Transaction, TransactionBehavior, params};

use super::utils::{parse_optional_text, parse_text, time_column};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{
        Feedback, FeedbackRating, NotificationKind, RevisionRecord, Slot, SlotKey,
        clock::format_hhmm,
    },
    store::{PlanStore, PlanTransaction},
};

const SELECT_REVISIONS_SQL: &str =
    "SELECT date, revision, accepted_at, deleted_at FROM plans WHERE date = ?1 ORDER BY revision";
const UPSERT_REVISION_SQL: &str = "INSERT INTO plans (date, revision, accepted_at, deleted_at) VALUES (?1, ?2, ?3, ?4) \
     ON CONFLICT(date, revision) DO UPDATE SET accepted_at = excluded.accepted_at, deleted_at = excluded.deleted_at";
const MARK_REVISION_DELETED_SQL: &str =
    "UPDATE plans SET deleted_at = ?3 WHERE date = ?1 AND revision = ?2 AND deleted_at IS NULL";
const RESTORE_REVISION_SQL: &str =
    "UPDATE plans SET deleted_at = NULL WHERE date = ?1 AND revision = ?2 AND deleted_at = ?3";

const SLOT_COLUMNS: &str = "start_time, end_time, task_id, status, feedback_rating, feedback_note, \
     last_notified_start, last_notified_end, deleted_at";
const INSERT_SLOT_SQL: &str = "INSERT INTO slots (plan_date, plan_revision, start_time, end_time, task_id, status, \
     feedback_rating, feedback_note, last_notified_start, last_notified_end, deleted_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const CLEAR_ACTIVE_SLOTS_SQL: &str =
    "DELETE FROM slots WHERE plan_date = ?1 AND plan_revision = ?2 AND deleted_at IS NULL";
const MARK_SLOTS_DELETED_SQL: &str = "UPDATE slots SET deleted_at = ?3 \
     WHERE plan_date = ?1 AND plan_revision = ?2 AND deleted_at IS NULL";
const RESTORE_SLOTS_SQL: &str = "UPDATE slots SET deleted_at = NULL \
     WHERE plan_date = ?1 AND plan_revision = ?2 AND deleted_at = ?3";
const DELETE_SLOT_SQL: &str = "UPDATE slots SET deleted_at = ?5 \
     WHERE plan_date = ?1 AND plan_revision = ?2 AND start_time = ?3 AND task_id = ?4 AND deleted_at IS NULL";
const NOTIFY_START_SQL: &str = "UPDATE slots SET last_notified_start = ?5 \
     WHERE plan_date = ?1 AND plan_revision = ?2 AND start_time = ?3 AND task_id = ?4 AND deleted_at IS NULL";
const NOTIFY_END_SQL: &str = "UPDATE slots SET last_notified_end = ?5 \
     WHERE plan_date = ?1 AND plan_revision = ?2 AND start_time = ?3 AND task_id = ?4 AND deleted_at IS NULL";

/// A plan transaction on the SQLite connection.
pub struct SqliteTx<'a> {
    tx: Transaction<'a>,
}

impl PlanStore for super::Database {
    type Tx<'a> = SqliteTx<'a>;

    /// Opens an `IMMEDIATE` transaction, taking the write lock before any
    /// revision is read.
    fn begin(&mut self) -> Result<SqliteTx<'_>> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        Ok(SqliteTx { tx })
    }
}

/// Maps a row selected with [`SLOT_COLUMNS`].
pub(crate) fn slot_from_row(row: &Row<'_>) -> rusqlite::Result<Slot> {
    let rating: Option<FeedbackRating> = parse_optional_text(row, 4)?;
    let note: Option<String> = row.get(5)?;
    Ok(Slot {
        start: time_column(row, 0)?,
        end: time_column(row, 1)?,
        task_id: row.get(2)?,
        status: parse_text(row, 3)?,
        feedback: rating.map(|rating| Feedback { rating, note }),
        last_notified_start: parse_optional_text(row, 6)?,
        last_notified_end: parse_optional_text(row, 7)?,
        deleted_at: parse_optional_text(row, 8)?,
    })
}

fn revision_from_row(row: &Row<'_>) -> rusqlite::Result<RevisionRecord> {
    Ok(RevisionRecord {
        date: parse_text(row, 0)?,
        revision: row.get(1)?,
        accepted_at: parse_optional_text(row, 2)?,
        deleted_at: parse_optional_text(row, 3)?,
    })
}

fn stamp(ts: Option<Timestamp>) -> Option<String> {
    ts.map(|t| t.to_string())
}

impl PlanTransaction for SqliteTx<'_> {
    fn revisions(&mut self, date: Date) -> Result<Vec<RevisionRecord>> {
        let mut stmt = self
            .tx
            .prepare(SELECT_REVISIONS_SQL)
            .db_context("Failed to prepare revisions query")?;
        let rows = stmt
            .query_map(params![date.to_string()], revision_from_row)
            .db_context("Failed to query plan revisions")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read plan revisions")
    }

    fn slots(&mut self, date: Date, revision: u32, include_deleted: bool) -> Result<Vec<Slot>> {
        let filter = if include_deleted {
            ""
        } else {
            " AND deleted_at IS NULL"
        };
        let sql = format!(
            "SELECT {SLOT_COLUMNS} FROM slots WHERE plan_date = ?1 AND plan_revision = ?2{filter} \
             ORDER BY start_time, task_id"
        );
        let mut stmt = self
            .tx
            .prepare(&sql)
            .db_context("Failed to prepare slots query")?;
        let rows = stmt
            .query_map(params![date.to_string(), revision], slot_from_row)
            .db_context("Failed to query slots")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read slots")
    }

    fn put_revision(&mut self, record: &RevisionRecord) -> Result<()> {
        self.tx
            .execute(
                UPSERT_REVISION_SQL,
                params![
                    record.date.to_string(),
                    record.revision,
                    stamp(record.accepted_at),
                    stamp(record.deleted_at),
                ],
            )
            .db_context("Failed to write plan revision")?;
        Ok(())
    }

    fn clear_active_slots(&mut self, date: Date, revision: u32) -> Result<()> {
        self.tx
            .execute(CLEAR_ACTIVE_SLOTS_SQL, params![date.to_string(), revision])
            .db_context("Failed to clear slots")?;
        Ok(())
    }

    fn insert_slot(&mut self, date: Date, revision: u32, slot: &Slot) -> Result<()> {
        self.tx
            .execute(
                INSERT_SLOT_SQL,
                params![
                    date.to_string(),
                    revision,
                    format_hhmm(slot.start),
                    format_hhmm(slot.end),
                    slot.task_id,
                    slot.status.as_str(),
                    slot.feedback.as_ref().map(|f| f.rating.as_str()),
                    slot.feedback.as_ref().and_then(|f| f.note.as_deref()),
                    stamp(slot.last_notified_start),
                    stamp(slot.last_notified_end),
                    stamp(slot.deleted_at),
                ],
            )
            .db_context("Failed to insert slot")?;
        Ok(())
    }

    fn mark_revision_deleted(
        &mut self,
        date: Date,
        revision: u32,
        epoch: Timestamp,
    ) -> Result<()> {
        let (date, epoch) = (date.to_string(), epoch.to_string());
        let args = params![date, revision, epoch];
        self.tx
            .execute(MARK_REVISION_DELETED_SQL, args)
            .db_context("Failed to delete plan revision")?;
        self.tx
            .execute(MARK_SLOTS_DELETED_SQL, args)
            .db_context("Failed to delete plan slots")?;
        Ok(())
    }

    fn restore_revision(&mut self, date: Date, revision: u32, epoch: Timestamp) -> Result<()> {
        let (date, epoch) = (date.to_string(), epoch.to_string());
        let args = params![date, revision, epoch];
        self.tx
            .execute(RESTORE_REVISION_SQL, args)
            .db_context("Failed to restore plan revision")?;
        self.tx
            .execute(RESTORE_SLOTS_SQL, args)
            .db_context("Failed to restore plan slots")?;
        Ok(())
    }

    fn delete_slot(&mut self, key: &SlotKey, epoch: Timestamp) -> Result<bool> {
        let changed = self
            .tx
            .execute(
                DELETE_SLOT_SQL,
                params![
                    key.date.to_string(),
                    key.revision,
                    format_hhmm(key.start),
                    key.task_id,
                    epoch.to_string(),
                ],
            )
            .db_context("Failed to delete slot")?;
        Ok(changed > 0)
    }

    fn set_slot_notified(
        &mut self,
        key: &SlotKey,
        kind: NotificationKind,
        at: Timestamp,
    ) -> Result<bool> {
        let sql = match kind {
            NotificationKind::Start => NOTIFY_START_SQL,
            NotificationKind::End => NOTIFY_END_SQL,
        };
        let changed = self
            .tx
            .execute(
                sql,
                params![
                    key.date.to_string(),
                    key.revision,
                    format_hhmm(key.start),
                    key.task_id,
                    at.to_string(),
                ],
            )
            .db_context("Failed to update slot notification timestamp")?;
        Ok(changed > 0)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit().db_context("Failed to commit transaction")
    }
}
