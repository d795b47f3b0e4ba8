//! Revisioned, soft-deletable plan storage.
//!
//! Storage is split in two layers:
//!
//! - [`PlanTransaction`] is the per-backend dialect: a handful of primitive
//!   reads and writes scoped to one atomic unit of work.
//! - [`PlanStore`] opens transactions and provides every plan operation on
//!   top of them. The revision, accept-gate and deletion-epoch rules live in
//!   [`revisions`] and are shared by all backends.
//!
//! Two backends ship with the crate: the SQLite [`crate::Database`] and the
//! in-process [`MemoryStore`].
//!
//! # Example
//!
//! ```rust
//! use daylit_core::models::{DayPlan, Slot};
//! use daylit_core::store::{MemoryStore, PlanStore};
//! use jiff::civil::{date, time};
//!
//! # fn main() -> daylit_core::Result<()> {
//! let mut store = MemoryStore::new();
//! let mut plan = DayPlan::new(date(2024, 3, 1));
//! plan.slots.push(Slot::new(time(9, 0, 0, 0), time(10, 0, 0, 0), "write"));
//!
//! assert_eq!(store.save_plan(&plan)?, 1);
//! // Saving an unaccepted plan again overwrites revision 1
//! assert_eq!(store.save_plan(&plan)?, 1);
//! assert_eq!(store.get_plan(date(2024, 3, 1))?.slots.len(), 1);
//! # Ok(())
//! # }
//! ```

use jiff::{Timestamp, civil::Date};

use crate::{
    error::Result,
    models::{DayPlan, NotificationKind, RevisionRecord, Slot, SlotKey},
};

pub mod memory;
pub mod revisions;

pub use memory::MemoryStore;

/// Primitive operations a backend provides inside one transaction.
///
/// Dropping a transaction without calling [`PlanTransaction::commit`]
/// discards every write made through it.
pub trait PlanTransaction {
    /// Every revision row for `date`, deleted or not, ordered by revision.
    fn revisions(&mut self, date: Date) -> Result<Vec<RevisionRecord>>;

    /// Slots of one revision ordered by start time. Soft-deleted slots are
    /// included only when `include_deleted` is set.
    fn slots(&mut self, date: Date, revision: u32, include_deleted: bool) -> Result<Vec<Slot>>;

    /// Insert or update the revision row, keyed by `(date, revision)`.
    fn put_revision(&mut self, record: &RevisionRecord) -> Result<()>;

    /// Physically remove the non-deleted slots of a revision.
    fn clear_active_slots(&mut self, date: Date, revision: u32) -> Result<()>;

    /// Insert one slot under a revision.
    fn insert_slot(&mut self, date: Date, revision: u32, slot: &Slot) -> Result<()>;

    /// Stamp the revision row and its non-deleted slots with `epoch`.
    fn mark_revision_deleted(&mut self, date: Date, revision: u32, epoch: Timestamp)
    -> Result<()>;

    /// Clear the deletion stamp on the revision row and on its slots, but
    /// only where the stamp equals `epoch` exactly.
    fn restore_revision(&mut self, date: Date, revision: u32, epoch: Timestamp) -> Result<()>;

    /// Stamp one non-deleted slot with `epoch`. Returns whether a slot matched.
    fn delete_slot(&mut self, key: &SlotKey, epoch: Timestamp) -> Result<bool>;

    /// Record a delivered notification on one non-deleted slot. Returns
    /// whether a slot matched.
    fn set_slot_notified(
        &mut self,
        key: &SlotKey,
        kind: NotificationKind,
        at: Timestamp,
    ) -> Result<bool>;

    /// Make every write in this transaction durable.
    fn commit(self) -> Result<()>
    where
        Self: Sized;
}

/// A transactional, revisioned store of day plans.
pub trait PlanStore {
    type Tx<'a>: PlanTransaction
    where
        Self: 'a;

    /// Open a transaction. Backends that support it take the write lock up
    /// front so revision lookup and minting cannot interleave.
    fn begin(&mut self) -> Result<Self::Tx<'_>>;

    /// Persist `plan` and return the revision written.
    ///
    /// With `plan.revision == 0` the revision is chosen automatically: the
    /// latest unaccepted revision is overwritten in place, otherwise a new
    /// revision is minted. An explicit revision that is already accepted
    /// may only be re-saved with the identical `accepted_at`.
    fn save_plan(&mut self, plan: &DayPlan) -> Result<u32> {
        let mut tx = self.begin()?;
        let revision = revisions::save_plan(&mut tx, plan)?;
        tx.commit()?;
        Ok(revision)
    }

    /// The latest non-deleted revision for `date`.
    fn get_plan(&mut self, date: Date) -> Result<DayPlan> {
        self.get_latest_plan_revision(date)
    }

    fn get_latest_plan_revision(&mut self, date: Date) -> Result<DayPlan> {
        let mut tx = self.begin()?;
        let plan = revisions::latest_revision(&mut tx, date)?;
        tx.commit()?;
        Ok(plan)
    }

    /// One exact revision. Deleted revisions are reported as not found.
    fn get_plan_revision(&mut self, date: Date, revision: u32) -> Result<DayPlan> {
        let mut tx = self.begin()?;
        let plan = revisions::exact_revision(&mut tx, date, revision)?;
        tx.commit()?;
        Ok(plan)
    }

    /// Soft-delete every active revision for `date` under one shared epoch.
    /// Returns the epoch used.
    fn delete_plan(&mut self, date: Date) -> Result<Timestamp> {
        let mut tx = self.begin()?;
        let epoch = revisions::delete_plan(&mut tx, date)?;
        tx.commit()?;
        Ok(epoch)
    }

    /// Undo the most recent [`PlanStore::delete_plan`] for `date`. Returns
    /// the revisions restored.
    fn restore_plan(&mut self, date: Date) -> Result<Vec<u32>> {
        let mut tx = self.begin()?;
        let restored = revisions::restore_plan(&mut tx, date)?;
        tx.commit()?;
        Ok(restored)
    }

    /// Stamp a delivered notification. Missing or deleted slots are ignored.
    fn update_slot_notification_timestamp(
        &mut self,
        key: &SlotKey,
        kind: NotificationKind,
        at: Timestamp,
    ) -> Result<()> {
        let mut tx = self.begin()?;
        revisions::mark_notified(&mut tx, key, kind, at)?;
        tx.commit()
    }

    /// Soft-delete a single slot of an unaccepted revision.
    fn delete_slot(&mut self, key: &SlotKey) -> Result<Timestamp> {
        let mut tx = self.begin()?;
        let epoch = revisions::delete_slot(&mut tx, key)?;
        tx.commit()?;
        Ok(epoch)
    }

    /// Every revision row stored for `date`, including deleted ones.
    fn list_revisions(&mut self, date: Date) -> Result<Vec<RevisionRecord>> {
        let mut tx = self.begin()?;
        let records = tx.revisions(date)?;
        tx.commit()?;
        Ok(records)
    }
}
