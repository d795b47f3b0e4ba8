//! Behaviour every `PlanStore` backend must share. Each scenario is written
//! once against the trait and run for SQLite and the in-memory store.

mod common;

use common::{plan_with, slot};
use daylit_core::{
    PlanStore, PlannerError,
    models::{DayPlan, NotificationKind, Slot, SlotKey, SlotStatus},
};
use jiff::{
    Timestamp,
    civil::{Date, date, time},
};

const DAY: Date = date(2024, 3, 1);

fn accepted(mut plan: DayPlan) -> DayPlan {
    plan.accepted_at = Some(Timestamp::now());
    for s in &mut plan.slots {
        s.status = SlotStatus::Accepted;
    }
    plan
}

fn key(date: Date, revision: u32, start: (i8, i8), task_id: &str) -> SlotKey {
    SlotKey {
        date,
        revision,
        start: time(start.0, start.1, 0, 0),
        task_id: task_id.to_string(),
    }
}

fn save_is_idempotent_for_unaccepted_plans<S: PlanStore>(store: &mut S) {
    let first = plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]);
    let second = plan_with(
        DAY,
        vec![slot((9, 0), (10, 0), "gym"), slot((10, 0), (10, 30), "read")],
    );

    assert_eq!(store.save_plan(&first).unwrap(), 1);
    assert_eq!(store.save_plan(&second).unwrap(), 1);

    assert_eq!(store.list_revisions(DAY).unwrap().len(), 1);
    let stored = store.get_plan(DAY).unwrap();
    assert_eq!(stored.revision, 1);
    assert_eq!(stored.slots.len(), 2);
    assert_eq!(stored.slots[1].task_id, "read");
}

fn accept_then_regenerate_mints_new_revision<S: PlanStore>(store: &mut S) {
    let original = accepted(plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]));
    assert_eq!(store.save_plan(&original).unwrap(), 1);

    let regenerated = plan_with(DAY, vec![slot((11, 0), (12, 0), "gym")]);
    assert_eq!(store.save_plan(&regenerated).unwrap(), 2);

    let first = store.get_plan_revision(DAY, 1).unwrap();
    assert_eq!(first.accepted_at, original.accepted_at);
    assert_eq!(first.slots.len(), 1);
    assert_eq!(first.slots[0].start, time(9, 0, 0, 0));
    assert_eq!(first.slots[0].status, SlotStatus::Accepted);

    let latest = store.get_latest_plan_revision(DAY).unwrap();
    assert_eq!(latest.revision, 2);
    assert_eq!(latest.slots[0].start, time(11, 0, 0, 0));
}

fn accepted_revision_only_resaves_with_same_stamp<S: PlanStore>(store: &mut S) {
    let original = accepted(plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]));
    store.save_plan(&original).unwrap();

    let mut resave = store.get_plan(DAY).unwrap();
    resave.slots[0].status = SlotStatus::Done;
    assert_eq!(store.save_plan(&resave).unwrap(), 1);
    assert_eq!(store.get_plan(DAY).unwrap().slots[0].status, SlotStatus::Done);

    let mut forged = resave.clone();
    forged.accepted_at = Some(Timestamp::UNIX_EPOCH);
    let err = store.save_plan(&forged).unwrap_err();
    assert!(matches!(err, PlannerError::Conflict { revision: 1, .. }));

    let mut unaccepted = resave;
    unaccepted.accepted_at = None;
    let err = store.save_plan(&unaccepted).unwrap_err();
    assert!(matches!(err, PlannerError::Conflict { .. }));
}

fn save_rejects_deletion_stamp_and_deleted_revision<S: PlanStore>(store: &mut S) {
    let mut stamped = plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]);
    stamped.deleted_at = Some(Timestamp::now());
    let err = store.save_plan(&stamped).unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));

    store
        .save_plan(&plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]))
        .unwrap();
    store.delete_plan(DAY).unwrap();

    let mut into_deleted = plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]);
    into_deleted.revision = 1;
    let err = store.save_plan(&into_deleted).unwrap_err();
    assert!(matches!(err, PlannerError::Conflict { .. }));

    let err = store.get_plan_revision(DAY, 1).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));

    // Deleted revisions still count when minting
    let fresh = plan_with(DAY, vec![slot((8, 0), (9, 0), "gym")]);
    assert_eq!(store.save_plan(&fresh).unwrap(), 2);
}

fn save_rejects_overlapping_slots<S: PlanStore>(store: &mut S) {
    let overlapping = plan_with(
        DAY,
        vec![slot((9, 0), (10, 0), "gym"), slot((9, 30), (10, 30), "read")],
    );
    let err = store.save_plan(&overlapping).unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));
    assert!(store.list_revisions(DAY).unwrap().is_empty());
}

fn slot_times_must_be_whole_minutes<S: PlanStore>(store: &mut S) {
    let seconds = plan_with(
        DAY,
        vec![Slot::new(time(9, 0, 30, 0), time(9, 0, 45, 0), "gym")],
    );
    let err = store.save_plan(&seconds).unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));
    assert!(store.list_revisions(DAY).unwrap().is_empty());

    store
        .save_plan(&plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]))
        .unwrap();
    let mut off_minute = key(DAY, 1, (9, 0), "gym");
    off_minute.start = time(9, 0, 30, 0);
    let err = store.delete_slot(&off_minute).unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));
    let err = store
        .update_slot_notification_timestamp(&off_minute, NotificationKind::Start, Timestamp::now())
        .unwrap_err();
    assert!(matches!(err, PlannerError::Validation { .. }));

    let stored = store.get_plan(DAY).unwrap();
    assert_eq!(stored.slots.len(), 1);
    assert_eq!(stored.slots[0].start, time(9, 0, 0, 0));
    assert_eq!(stored.slots[0].last_notified_start, None);
}

fn delete_then_restore_round_trips<S: PlanStore>(store: &mut S) {
    let day = date(2024, 3, 3);
    store
        .save_plan(&plan_with(day, vec![slot((9, 0), (10, 0), "gym")]))
        .unwrap();

    store.delete_plan(day).unwrap();
    let err = store.get_plan(day).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));

    assert_eq!(store.restore_plan(day).unwrap(), vec![1]);
    let restored = store.get_plan(day).unwrap();
    assert_eq!(restored.revision, 1);
    assert_eq!(restored.slots.len(), 1);
    assert_eq!(restored.slots[0].task_id, "gym");
    assert_eq!(restored.slots[0].start, time(9, 0, 0, 0));
}

fn restore_keeps_earlier_slot_deletions<S: PlanStore>(store: &mut S) {
    store
        .save_plan(&plan_with(
            DAY,
            vec![slot((9, 0), (10, 0), "gym"), slot((10, 0), (11, 0), "read")],
        ))
        .unwrap();

    let slot_epoch = store.delete_slot(&key(DAY, 1, (10, 0), "read")).unwrap();
    let plan_epoch = store.delete_plan(DAY).unwrap();
    assert!(plan_epoch > slot_epoch);

    store.restore_plan(DAY).unwrap();
    let restored = store.get_plan(DAY).unwrap();
    assert_eq!(restored.slots.len(), 1);
    assert_eq!(restored.slots[0].task_id, "gym");
}

fn restore_only_undoes_most_recent_delete<S: PlanStore>(store: &mut S) {
    store
        .save_plan(&accepted(plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")])))
        .unwrap();
    store.delete_plan(DAY).unwrap();

    store
        .save_plan(&plan_with(DAY, vec![slot((11, 0), (12, 0), "gym")]))
        .unwrap();
    store.delete_plan(DAY).unwrap();

    assert_eq!(store.restore_plan(DAY).unwrap(), vec![2]);
    assert_eq!(store.get_plan(DAY).unwrap().revision, 2);
    let err = store.get_plan_revision(DAY, 1).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
}

fn delete_and_restore_guards<S: PlanStore>(store: &mut S) {
    let err = store.delete_plan(DAY).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
    let err = store.restore_plan(DAY).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));

    store
        .save_plan(&plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]))
        .unwrap();
    let err = store.restore_plan(DAY).unwrap_err();
    assert!(matches!(err, PlannerError::NotDeleted { .. }));

    store.delete_plan(DAY).unwrap();
    let err = store.delete_plan(DAY).unwrap_err();
    assert!(matches!(err, PlannerError::AlreadyDeleted { .. }));
}

fn notification_stamp_targets_one_slot<S: PlanStore>(store: &mut S) {
    store
        .save_plan(&plan_with(
            DAY,
            vec![slot((9, 0), (10, 0), "gym"), slot((10, 0), (11, 0), "read")],
        ))
        .unwrap();

    let at = Timestamp::now();
    store
        .update_slot_notification_timestamp(&key(DAY, 1, (9, 0), "gym"), NotificationKind::Start, at)
        .unwrap();

    let plan = store.get_plan(DAY).unwrap();
    assert_eq!(plan.slots[0].last_notified_start, Some(at));
    assert_eq!(plan.slots[0].last_notified_end, None);
    assert_eq!(plan.slots[1].last_notified_start, None);

    // Missing slots are a silent no-op
    store
        .update_slot_notification_timestamp(&key(DAY, 1, (12, 0), "nap"), NotificationKind::End, at)
        .unwrap();
    store
        .update_slot_notification_timestamp(&key(DAY, 7, (9, 0), "gym"), NotificationKind::End, at)
        .unwrap();
}

fn delete_slot_guards<S: PlanStore>(store: &mut S) {
    store
        .save_plan(&accepted(plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")])))
        .unwrap();
    let err = store.delete_slot(&key(DAY, 1, (9, 0), "gym")).unwrap_err();
    assert!(matches!(err, PlannerError::Conflict { .. }));

    store
        .save_plan(&plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]))
        .unwrap();
    let err = store.delete_slot(&key(DAY, 2, (9, 30), "gym")).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
    let err = store.delete_slot(&key(DAY, 5, (9, 0), "gym")).unwrap_err();
    assert!(matches!(err, PlannerError::NotFound { .. }));
}

fn dates_are_isolated<S: PlanStore>(store: &mut S) {
    let other = date(2024, 3, 2);
    store
        .save_plan(&plan_with(DAY, vec![slot((9, 0), (10, 0), "gym")]))
        .unwrap();
    store
        .save_plan(&plan_with(other, vec![slot((8, 0), (9, 0), "read")]))
        .unwrap();

    store.delete_plan(DAY).unwrap();
    let kept = store.get_plan(other).unwrap();
    assert_eq!(kept.revision, 1);
    assert_eq!(kept.slots[0].task_id, "read");
}

macro_rules! store_contract {
    ($backend:ident, $make:expr, [$($scenario:ident),* $(,)?]) => {
        mod $backend {
            $(
                #[test]
                fn $scenario() {
                    let (_guard, mut store) = $make;
                    super::$scenario(&mut store);
                }
            )*
        }
    };
}

macro_rules! all_backends {
    ($($scenario:ident),* $(,)?) => {
        store_contract!(sqlite, crate::common::create_test_db(), [$($scenario),*]);
        store_contract!(memory, ((), daylit_core::MemoryStore::new()), [$($scenario),*]);
    };
}

all_backends!(
    save_is_idempotent_for_unaccepted_plans,
    accept_then_regenerate_mints_new_revision,
    accepted_revision_only_resaves_with_same_stamp,
    save_rejects_deletion_stamp_and_deleted_revision,
    save_rejects_overlapping_slots,
    slot_times_must_be_whole_minutes,
    delete_then_restore_round_trips,
    restore_keeps_earlier_slot_deletions,
    restore_only_undoes_most_recent_delete,
    delete_and_restore_guards,
    notification_stamp_targets_one_slot,
    delete_slot_guards,
    dates_are_isolated,
);
