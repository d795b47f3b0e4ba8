//! Revision, accept-gate and deletion-epoch rules shared by every backend.

use std::collections::HashSet;

use jiff::{SignedDuration, Timestamp, civil::Date};
use log::{debug, info};

use super::PlanTransaction;
use crate::{
    error::{PlannerError, Result},
    models::{
        DayPlan, NotificationKind, RevisionRecord, Slot, SlotKey,
        clock::{ensure_minute_aligned, format_hhmm},
    },
};

/// Revision to write when a new one must be minted. Deleted revisions count,
/// so a `(date, revision)` key is never reused.
fn next_revision(records: &[RevisionRecord]) -> u32 {
    records.iter().map(|r| r.revision).max().unwrap_or(0) + 1
}

fn latest_active(records: &[RevisionRecord]) -> Option<&RevisionRecord> {
    records
        .iter()
        .filter(|r| !r.is_deleted())
        .max_by_key(|r| r.revision)
}

fn validate_slots(plan: &DayPlan) -> Result<()> {
    for slot in &plan.slots {
        ensure_minute_aligned("slots.start", slot.start)?;
        ensure_minute_aligned("slots.end", slot.end)?;
    }

    let mut active: Vec<&Slot> = plan.active_slots().collect();
    let mut seen = HashSet::new();
    for slot in &active {
        if slot.start >= slot.end {
            return Err(PlannerError::validation("slots").with_reason(format!(
                "slot for '{}' starts at {} but ends at {}",
                slot.task_id,
                format_hhmm(slot.start),
                format_hhmm(slot.end)
            )));
        }
        if !seen.insert((slot.start, slot.task_id.as_str())) {
            return Err(PlannerError::validation("slots").with_reason(format!(
                "duplicate slot for '{}' at {}",
                slot.task_id,
                format_hhmm(slot.start)
            )));
        }
    }

    active.sort_by_key(|s| s.start);
    for pair in active.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(PlannerError::validation("slots").with_reason(format!(
                "slot for '{}' at {} overlaps slot for '{}' at {}",
                pair[0].task_id,
                format_hhmm(pair[0].start),
                pair[1].task_id,
                format_hhmm(pair[1].start)
            )));
        }
    }
    Ok(())
}

pub(crate) fn save_plan<T: PlanTransaction>(tx: &mut T, plan: &DayPlan) -> Result<u32> {
    if plan.deleted_at.is_some() {
        return Err(PlannerError::validation("deleted_at")
            .with_reason("plans are deleted through delete_plan, not saved with a deletion stamp"));
    }
    validate_slots(plan)?;

    let records = tx.revisions(plan.date)?;
    let revision = if plan.revision == 0 {
        match latest_active(&records) {
            Some(latest) if !latest.is_accepted() => {
                debug!(
                    "Overwriting unaccepted revision {} for {}",
                    latest.revision, plan.date
                );
                latest.revision
            }
            _ => {
                let next = next_revision(&records);
                debug!("Minting revision {next} for {}", plan.date);
                next
            }
        }
    } else {
        if let Some(existing) = records.iter().find(|r| r.revision == plan.revision) {
            if existing.is_deleted() {
                return Err(PlannerError::conflict(
                    plan.date,
                    plan.revision,
                    "revision is deleted",
                ));
            }
            if existing.is_accepted() && existing.accepted_at != plan.accepted_at {
                return Err(PlannerError::conflict(
                    plan.date,
                    plan.revision,
                    "revision is accepted and cannot be overwritten",
                ));
            }
        }
        plan.revision
    };

    tx.put_revision(&RevisionRecord {
        date: plan.date,
        revision,
        accepted_at: plan.accepted_at,
        deleted_at: None,
    })?;
    tx.clear_active_slots(plan.date, revision)?;
    for slot in plan.active_slots() {
        tx.insert_slot(plan.date, revision, slot)?;
    }
    Ok(revision)
}

fn load_plan<T: PlanTransaction>(tx: &mut T, record: &RevisionRecord) -> Result<DayPlan> {
    Ok(DayPlan {
        date: record.date,
        revision: record.revision,
        accepted_at: record.accepted_at,
        deleted_at: None,
        slots: tx.slots(record.date, record.revision, false)?,
    })
}

pub(crate) fn latest_revision<T: PlanTransaction>(tx: &mut T, date: Date) -> Result<DayPlan> {
    let records = tx.revisions(date)?;
    let latest =
        latest_active(&records).ok_or_else(|| PlannerError::not_found(format!("Plan for {date}")))?;
    load_plan(tx, latest)
}

pub(crate) fn exact_revision<T: PlanTransaction>(
    tx: &mut T,
    date: Date,
    revision: u32,
) -> Result<DayPlan> {
    let records = tx.revisions(date)?;
    let record = records
        .iter()
        .find(|r| r.revision == revision && !r.is_deleted())
        .ok_or_else(|| {
            PlannerError::not_found(format!("Plan for {date} revision {revision}"))
        })?;
    load_plan(tx, record)
}

/// A deletion stamp strictly later than every stamp already stored for
/// `date`, so separate deletions never share an epoch.
fn fresh_epoch<T: PlanTransaction>(
    tx: &mut T,
    date: Date,
    records: &[RevisionRecord],
) -> Result<Timestamp> {
    let mut latest = records.iter().filter_map(|r| r.deleted_at).max();
    for record in records {
        let slot_max = tx
            .slots(date, record.revision, true)?
            .into_iter()
            .filter_map(|s| s.deleted_at)
            .max();
        latest = latest.max(slot_max);
    }

    let now = Timestamp::now();
    match latest {
        Some(prev) if prev >= now => prev
            .checked_add(SignedDuration::from_nanos(1))
            .map_err(|e| PlannerError::Configuration {
                message: format!("Cannot advance deletion timestamp past {prev}: {e}"),
            }),
        _ => Ok(now),
    }
}

pub(crate) fn delete_plan<T: PlanTransaction>(tx: &mut T, date: Date) -> Result<Timestamp> {
    let records = tx.revisions(date)?;
    if records.is_empty() {
        return Err(PlannerError::not_found(format!("Plan for {date}")));
    }
    let active: Vec<u32> = records
        .iter()
        .filter(|r| !r.is_deleted())
        .map(|r| r.revision)
        .collect();
    if active.is_empty() {
        return Err(PlannerError::AlreadyDeleted { date });
    }

    let epoch = fresh_epoch(tx, date, &records)?;
    for revision in &active {
        tx.mark_revision_deleted(date, *revision, epoch)?;
    }
    info!(
        "Deleted plan for {date} ({} revision(s)) at {epoch}",
        active.len()
    );
    Ok(epoch)
}

pub(crate) fn restore_plan<T: PlanTransaction>(tx: &mut T, date: Date) -> Result<Vec<u32>> {
    let records = tx.revisions(date)?;
    if records.is_empty() {
        return Err(PlannerError::not_found(format!("Plan for {date}")));
    }
    let Some(epoch) = records.iter().filter_map(|r| r.deleted_at).max() else {
        return Err(PlannerError::NotDeleted { date });
    };

    let restored: Vec<u32> = records
        .iter()
        .filter(|r| r.deleted_at == Some(epoch))
        .map(|r| r.revision)
        .collect();
    for revision in &restored {
        tx.restore_revision(date, *revision, epoch)?;
    }
    info!("Restored plan for {date} revision(s) {restored:?} deleted at {epoch}");
    Ok(restored)
}

pub(crate) fn mark_notified<T: PlanTransaction>(
    tx: &mut T,
    key: &SlotKey,
    kind: NotificationKind,
    at: Timestamp,
) -> Result<()> {
    ensure_minute_aligned("start", key.start)?;
    if !tx.set_slot_notified(key, kind, at)? {
        debug!("No active {key} to mark {} notified", kind.as_str());
    }
    Ok(())
}

pub(crate) fn delete_slot<T: PlanTransaction>(tx: &mut T, key: &SlotKey) -> Result<Timestamp> {
    ensure_minute_aligned("start", key.start)?;
    let records = tx.revisions(key.date)?;
    let record = records
        .iter()
        .find(|r| r.revision == key.revision && !r.is_deleted())
        .ok_or_else(|| {
            PlannerError::not_found(format!("Plan for {} revision {}", key.date, key.revision))
        })?;
    if record.is_accepted() {
        return Err(PlannerError::conflict(
            key.date,
            key.revision,
            "slots of an accepted revision cannot be removed",
        ));
    }

    let epoch = fresh_epoch(tx, key.date, &records)?;
    if !tx.delete_slot(key, epoch)? {
        return Err(PlannerError::not_found(key.to_string()));
    }
    info!("Deleted {key}");
    Ok(epoch)
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    fn record(revision: u32, accepted: bool, deleted: bool) -> RevisionRecord {
        RevisionRecord {
            date: date(2024, 3, 1),
            revision,
            accepted_at: accepted.then_some(Timestamp::UNIX_EPOCH),
            deleted_at: deleted.then_some(Timestamp::UNIX_EPOCH),
        }
    }

    #[test]
    fn test_next_revision_counts_deleted_rows() {
        assert_eq!(next_revision(&[]), 1);
        assert_eq!(
            next_revision(&[record(1, false, false), record(2, false, true)]),
            3
        );
    }

    #[test]
    fn test_latest_active_skips_deleted() {
        let records = [record(1, true, false), record(2, false, true)];
        assert_eq!(latest_active(&records).map(|r| r.revision), Some(1));
    }

    #[test]
    fn test_validate_slots_rejects_overlap_and_duplicates() {
        let mut plan = DayPlan::new(date(2024, 3, 1));
        plan.slots
            .push(Slot::new(time(9, 0, 0, 0), time(10, 0, 0, 0), "a"));
        plan.slots
            .push(Slot::new(time(9, 30, 0, 0), time(10, 30, 0, 0), "b"));
        assert!(validate_slots(&plan).is_err());

        plan.slots[1] = Slot::new(time(9, 0, 0, 0), time(9, 0, 0, 0), "b");
        assert!(validate_slots(&plan).is_err());

        plan.slots[1] = Slot::new(time(10, 0, 0, 0), time(10, 30, 0, 0), "b");
        assert!(validate_slots(&plan).is_ok());
    }

    #[test]
    fn test_validate_slots_ignores_deleted() {
        let mut plan = DayPlan::new(date(2024, 3, 1));
        let mut old = Slot::new(time(9, 0, 0, 0), time(10, 0, 0, 0), "a");
        old.deleted_at = Some(Timestamp::UNIX_EPOCH);
        plan.slots.push(old);
        plan.slots
            .push(Slot::new(time(9, 0, 0, 0), time(10, 0, 0, 0), "a"));
        assert!(validate_slots(&plan).is_ok());
    }
}
