//! Multi-step workflows: generating, accepting and annotating plans, and
//! turning feedback into suggestions.
//!
//! Each workflow that reads a revision and writes it back does both inside
//! one store transaction, so it always acts on the latest revision.

use jiff::{Timestamp, civil::Date};
use log::{debug, info, warn};

use super::Planner;
use crate::{
    db::Database,
    error::{PlannerError, Result},
    models::{DayPlan, Feedback, FeedbackRating, Slot, SlotStatus, Task},
    optimizer::{self, TaskSuggestion},
    params::{FeedbackTarget, GeneratePlan, Optimize, RecordFeedback},
    schedule::{self, Schedule},
    store::{PlanStore, PlanTransaction, revisions},
};

fn propose(db: &mut Database, date: Date) -> Result<Schedule> {
    let settings = db.get_settings()?;
    schedule::plan_from_catalog(db, date, &settings)
}

fn locate_slot<'a>(plan: &'a mut DayPlan, target: &FeedbackTarget) -> Result<&'a mut Slot> {
    let date = plan.date;
    match target {
        FeedbackTarget::Slot { start, task_id } => {
            plan.find_slot_mut(*start, task_id).ok_or_else(|| {
                PlannerError::not_found(format!(
                    "Slot for '{task_id}' at {} on {date}",
                    crate::models::clock::format_hhmm(*start)
                ))
            })
        }
        FeedbackTarget::LastEndedBy(cutoff) => plan
            .slots
            .iter_mut()
            .filter(|s| !s.is_deleted() && s.feedback.is_none())
            .filter(|s| matches!(s.status, SlotStatus::Accepted | SlotStatus::Done))
            .filter(|s| s.end <= *cutoff)
            .max_by_key(|s| s.end)
            .ok_or_else(|| PlannerError::not_found(format!("Finished slot awaiting feedback on {date}"))),
    }
}

impl Planner {
    /// Runs the slot planner for `date` against the active catalog without
    /// saving anything.
    pub async fn propose_plan(&self, date: Date) -> Result<Schedule> {
        self.with_db(move |db| propose(db, date)).await
    }

    /// Generates a plan and saves it as an unaccepted revision.
    ///
    /// When the latest revision is already accepted the call fails with
    /// `Conflict` unless `new_revision` is set, in which case a new
    /// revision is minted and the accepted one is left untouched.
    pub async fn generate_plan(&self, params: &GeneratePlan) -> Result<Schedule> {
        let GeneratePlan { date, new_revision } = *params;
        self.with_db(move |db| {
            let mut schedule = propose(db, date)?;

            let mut tx = db.begin()?;
            let latest = tx
                .revisions(date)?
                .into_iter()
                .filter(|r| !r.is_deleted())
                .max_by_key(|r| r.revision);
            if let Some(latest) = latest
                && latest.is_accepted()
                && !new_revision
            {
                return Err(PlannerError::conflict(
                    date,
                    latest.revision,
                    "the latest revision is accepted; pass new_revision to plan again",
                ));
            }

            let revision = revisions::save_plan(&mut tx, &schedule.plan)?;
            tx.commit()?;

            schedule.plan.revision = revision;
            info!(
                "Generated plan for {date} revision {revision} ({} slots, {} unplaced)",
                schedule.plan.slots.len(),
                schedule.unplaced.len()
            );
            Ok(schedule)
        })
        .await
    }

    /// Accepts the latest revision: planned slots become accepted and the
    /// revision is stamped with the current time.
    pub async fn accept_plan(&self, date: Date) -> Result<DayPlan> {
        self.with_db(move |db| {
            let mut tx = db.begin()?;
            let mut plan = revisions::latest_revision(&mut tx, date)?;
            if plan.is_accepted() {
                return Err(PlannerError::conflict(
                    date,
                    plan.revision,
                    "revision is already accepted",
                ));
            }

            for slot in &mut plan.slots {
                if slot.status == SlotStatus::Planned {
                    slot.status = SlotStatus::Accepted;
                }
            }
            plan.accepted_at = Some(Timestamp::now());
            revisions::save_plan(&mut tx, &plan)?;
            tx.commit()?;

            info!("Accepted plan for {date} revision {}", plan.revision);
            Ok(plan)
        })
        .await
    }

    /// Attaches feedback to a slot of the latest revision and marks it done.
    ///
    /// `on_track` and `too_much` also count as a completion, moving the
    /// task's n-days anchor to the plan date.
    pub async fn record_feedback(&self, params: &RecordFeedback) -> Result<Slot> {
        let params = params.clone();
        self.with_db(move |db| {
            let mut tx = db.begin()?;
            let mut plan = revisions::latest_revision(&mut tx, params.date)?;
            if !plan.is_accepted() {
                return Err(PlannerError::validation("date").with_reason(format!(
                    "plan for {} revision {} is not accepted yet",
                    plan.date, plan.revision
                )));
            }

            let slot = locate_slot(&mut plan, &params.target)?;
            slot.feedback = Some(Feedback {
                rating: params.rating,
                note: params.note.clone(),
            });
            slot.status = SlotStatus::Done;
            let updated = slot.clone();

            revisions::save_plan(&mut tx, &plan)?;
            tx.commit()?;
            debug!(
                "Recorded {} feedback for '{}' on {} revision {}",
                params.rating.as_str(),
                updated.task_id,
                plan.date,
                plan.revision
            );

            if matches!(params.rating, FeedbackRating::OnTrack | FeedbackRating::TooMuch) {
                match db.mark_task_done(&updated.task_id, params.date) {
                    Ok(()) => {}
                    Err(PlannerError::NotFound { .. }) => {
                        warn!("Slot task '{}' is no longer in the catalog", updated.task_id);
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(updated)
        })
        .await
    }

    /// Suggestions for every active task from its recent feedback.
    pub async fn suggest(&self, params: &Optimize) -> Result<Vec<TaskSuggestion>> {
        let limit = params.feedback_limit;
        if limit == 0 {
            return Err(PlannerError::validation("feedback_limit").with_reason("must be positive"));
        }
        self.with_db(move |db| {
            let mut out = Vec::new();
            for task in db.list_tasks(false)? {
                let history = db.feedback_history(&task.id, limit)?;
                out.extend(optimizer::analyze(&task, &history));
            }
            Ok(out)
        })
        .await
    }

    /// Applies a suggestion to its task. Returns `None` for suggestions that
    /// need a manual decision.
    pub async fn apply_suggestion(&self, suggestion: &TaskSuggestion) -> Result<Option<Task>> {
        let suggestion = suggestion.clone();
        self.with_db(move |db| {
            let mut task = db.get_task(&suggestion.task_id)?.ok_or_else(|| {
                PlannerError::not_found(format!("Task '{}'", suggestion.task_id))
            })?;
            if !suggestion.suggestion.apply(&mut task) {
                return Ok(None);
            }
            db.update_task(&task)?;
            info!("Applied suggestion to '{}': {}", task.id, suggestion.suggestion);
            Ok(Some(task))
        })
        .await
    }
}
