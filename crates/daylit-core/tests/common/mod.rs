#![allow(dead_code)]

use daylit_core::{
    Database, Planner, PlannerBuilder,
    models::{DayPlan, EnergyBand, Recurrence, Slot, TaskKind},
    params::NewTask,
};
use jiff::civil::{Date, time};
use tempfile::{NamedTempFile, TempDir};

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Helper function to create a temporary database for testing
pub fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Slot from `HH:MM`-style hour/minute pairs.
pub fn slot(start: (i8, i8), end: (i8, i8), task_id: &str) -> Slot {
    Slot::new(
        time(start.0, start.1, 0, 0),
        time(end.0, end.1, 0, 0),
        task_id,
    )
}

pub fn plan_with(date: Date, slots: Vec<Slot>) -> DayPlan {
    DayPlan {
        slots,
        ..DayPlan::new(date)
    }
}

pub fn flexible(name: &str, duration_min: u32, recurrence: Recurrence) -> NewTask {
    NewTask {
        name: name.to_string(),
        kind: TaskKind::Flexible,
        duration_min,
        earliest_start: None,
        latest_end: None,
        fixed_start: None,
        fixed_end: None,
        recurrence,
        priority: 3,
        energy_band: EnergyBand::Medium,
    }
}
