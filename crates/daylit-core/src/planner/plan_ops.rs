//! Plan storage operations for the Planner.

use jiff::{Timestamp, civil::Date};

use super::Planner;
use crate::{
    display::{DeletedPlan, PlanAgenda},
    error::Result,
    models::{DayPlan, RevisionRecord, SlotKey},
    params::{MarkNotified, ShowPlan},
    store::PlanStore,
};

impl Planner {
    /// Persists a plan through the revision rules and returns the revision
    /// written.
    pub async fn save_plan(&self, plan: DayPlan) -> Result<u32> {
        self.with_db(move |db| db.save_plan(&plan)).await
    }

    /// The latest revision, or an exact one when requested.
    pub async fn show_plan(&self, params: &ShowPlan) -> Result<DayPlan> {
        let ShowPlan { date, revision } = *params;
        self.with_db(move |db| match revision {
            Some(revision) => db.get_plan_revision(date, revision),
            None => db.get_plan(date),
        })
        .await
    }

    /// Like [`Planner::show_plan`] but with task names resolved.
    pub async fn show_agenda(&self, params: &ShowPlan) -> Result<PlanAgenda> {
        let ShowPlan { date, revision } = *params;
        self.with_db(move |db| {
            let plan = match revision {
                Some(revision) => db.get_plan_revision(date, revision)?,
                None => db.get_plan(date)?,
            };
            let tasks = db.list_tasks(true)?;
            Ok(PlanAgenda::new(plan, &tasks))
        })
        .await
    }

    /// Every revision stored for a date, deleted ones included.
    pub async fn list_revisions(&self, date: Date) -> Result<Vec<RevisionRecord>> {
        self.with_db(move |db| db.list_revisions(date)).await
    }

    /// Soft-deletes every active revision for the date.
    pub async fn delete_plan(&self, date: Date) -> Result<DeletedPlan> {
        let epoch = self.with_db(move |db| db.delete_plan(date)).await?;
        Ok(DeletedPlan { date, epoch })
    }

    /// Restores the revisions removed by the most recent delete.
    pub async fn restore_plan(&self, date: Date) -> Result<Vec<u32>> {
        self.with_db(move |db| db.restore_plan(date)).await
    }

    /// Soft-deletes one slot of an unaccepted revision.
    pub async fn delete_slot(&self, key: SlotKey) -> Result<Timestamp> {
        self.with_db(move |db| db.delete_slot(&key)).await
    }

    /// Records a delivered notification; missing slots are ignored.
    pub async fn mark_notified(&self, params: &MarkNotified) -> Result<()> {
        let MarkNotified { key, kind, at } = params.clone();
        self.with_db(move |db| db.update_slot_notification_timestamp(&key, kind, at))
            .await
    }
}
