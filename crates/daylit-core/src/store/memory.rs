//! In-process plan store.
//!
//! A transaction works on a private copy of the state and swaps it in on
//! commit, so a dropped transaction leaves the store untouched.

use std::collections::BTreeMap;

use jiff::{Timestamp, civil::Date};

use super::{PlanStore, PlanTransaction};
use crate::{
    error::{PlannerError, Result},
    models::{NotificationKind, RevisionRecord, Slot, SlotKey},
};

#[derive(Debug, Clone)]
struct StoredSlot {
    date: Date,
    revision: u32,
    slot: Slot,
}

impl StoredSlot {
    fn matches(&self, key: &SlotKey) -> bool {
        self.date == key.date
            && self.revision == key.revision
            && self.slot.start == key.start
            && self.slot.task_id == key.task_id
            && !self.slot.is_deleted()
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    revisions: BTreeMap<(Date, u32), RevisionRecord>,
    slots: Vec<StoredSlot>,
}

/// Plan store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: MemoryState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transaction over a [`MemoryStore`].
pub struct MemoryTx<'a> {
    target: &'a mut MemoryState,
    work: MemoryState,
}

impl PlanStore for MemoryStore {
    type Tx<'a> = MemoryTx<'a>;

    fn begin(&mut self) -> Result<MemoryTx<'_>> {
        let work = self.state.clone();
        Ok(MemoryTx {
            target: &mut self.state,
            work,
        })
    }
}

impl PlanTransaction for MemoryTx<'_> {
    fn revisions(&mut self, date: Date) -> Result<Vec<RevisionRecord>> {
        Ok(self
            .work
            .revisions
            .range((date, 0)..=(date, u32::MAX))
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn slots(&mut self, date: Date, revision: u32, include_deleted: bool) -> Result<Vec<Slot>> {
        let mut slots: Vec<Slot> = self
            .work
            .slots
            .iter()
            .filter(|s| s.date == date && s.revision == revision)
            .filter(|s| include_deleted || !s.slot.is_deleted())
            .map(|s| s.slot.clone())
            .collect();
        slots.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.task_id.cmp(&b.task_id)));
        Ok(slots)
    }

    fn put_revision(&mut self, record: &RevisionRecord) -> Result<()> {
        self.work
            .revisions
            .insert((record.date, record.revision), record.clone());
        Ok(())
    }

    fn clear_active_slots(&mut self, date: Date, revision: u32) -> Result<()> {
        self.work
            .slots
            .retain(|s| !(s.date == date && s.revision == revision && !s.slot.is_deleted()));
        Ok(())
    }

    fn insert_slot(&mut self, date: Date, revision: u32, slot: &Slot) -> Result<()> {
        if !self.work.revisions.contains_key(&(date, revision)) {
            return Err(PlannerError::not_found(format!(
                "Plan for {date} revision {revision}"
            )));
        }
        let key = SlotKey {
            date,
            revision,
            start: slot.start,
            task_id: slot.task_id.clone(),
        };
        if !slot.is_deleted() && self.work.slots.iter().any(|s| s.matches(&key)) {
            return Err(PlannerError::validation("slots")
                .with_reason(format!("{key} already exists")));
        }
        self.work.slots.push(StoredSlot {
            date,
            revision,
            slot: slot.clone(),
        });
        Ok(())
    }

    fn mark_revision_deleted(
        &mut self,
        date: Date,
        revision: u32,
        epoch: Timestamp,
    ) -> Result<()> {
        if let Some(record) = self.work.revisions.get_mut(&(date, revision))
            && record.deleted_at.is_none()
        {
            record.deleted_at = Some(epoch);
        }
        for stored in &mut self.work.slots {
            if stored.date == date && stored.revision == revision && !stored.slot.is_deleted() {
                stored.slot.deleted_at = Some(epoch);
            }
        }
        Ok(())
    }

    fn restore_revision(&mut self, date: Date, revision: u32, epoch: Timestamp) -> Result<()> {
        if let Some(record) = self.work.revisions.get_mut(&(date, revision))
            && record.deleted_at == Some(epoch)
        {
            record.deleted_at = None;
        }
        for stored in &mut self.work.slots {
            if stored.date == date
                && stored.revision == revision
                && stored.slot.deleted_at == Some(epoch)
            {
                stored.slot.deleted_at = None;
            }
        }
        Ok(())
    }

    fn delete_slot(&mut self, key: &SlotKey, epoch: Timestamp) -> Result<bool> {
        match self.work.slots.iter_mut().find(|s| s.matches(key)) {
            Some(stored) => {
                stored.slot.deleted_at = Some(epoch);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_slot_notified(
        &mut self,
        key: &SlotKey,
        kind: NotificationKind,
        at: Timestamp,
    ) -> Result<bool> {
        match self.work.slots.iter_mut().find(|s| s.matches(key)) {
            Some(stored) => {
                match kind {
                    NotificationKind::Start => stored.slot.last_notified_start = Some(at),
                    NotificationKind::End => stored.slot.last_notified_end = Some(at),
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn commit(self) -> Result<()> {
        let MemoryTx { target, work } = self;
        *target = work;
        Ok(())
    }
}
