use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DAY: &str = "2024-03-01";

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// `daylit --no-color --database-file <db>`
fn daylit_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("daylit").expect("Failed to find daylit binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

fn add_daily_task(db_path: &Path, name: &str, duration: &str) -> String {
    let output = daylit_cmd(db_path)
        .args([
            "task",
            "add",
            name,
            "--duration",
            duration,
            "--recurrence",
            "daily",
        ])
        .output()
        .expect("Failed to run daylit");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Created task with ID: "))
        .expect("task id in output")
        .trim()
        .to_string()
}

#[test]
fn test_cli_add_and_list_tasks() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    daylit_cmd(&db_path)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));

    add_daily_task(&db_path, "Morning run", "30");

    daylit_cmd(&db_path)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning run"))
        .stdout(predicate::str::contains("daily"));
}

#[test]
fn test_cli_rejects_invalid_task() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    daylit_cmd(&db_path)
        .args(["task", "add", "Nothing", "--recurrence", "daily"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration_min"));

    daylit_cmd(&db_path)
        .args(["task", "add", "Gym", "--duration", "60", "--recurrence", "weekly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--weekdays"));

    daylit_cmd(&db_path)
        .args(["task", "add", "Late", "--duration", "30", "--earliest", "25:00"])
        .assert()
        .failure();
}

#[test]
fn test_cli_generate_accept_and_show() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_daily_task(&db_path, "Read", "45");

    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated plan for 2024-03-01 (revision 1)"))
        .stdout(predicate::str::contains("07:00–07:45"));

    daylit_cmd(&db_path)
        .args(["plan", "accept", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("Accepted 1 slot(s)"));

    daylit_cmd(&db_path)
        .args(["plan", "show", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("Read"))
        .stdout(predicate::str::contains("Accepted"));

    // An accepted plan needs an explicit new revision
    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("accepted"));

    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY, "--new-revision"])
        .assert()
        .success()
        .stdout(predicate::str::contains("revision 2"));

    daylit_cmd(&db_path)
        .args(["plan", "history", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("# History for 2024-03-01"));
}

#[test]
fn test_cli_delete_and_restore_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    add_daily_task(&db_path, "Stretch", "15");

    daylit_cmd(&db_path)
        .args(["plan", "generate", "2024-03-03"])
        .assert()
        .success();

    daylit_cmd(&db_path)
        .args(["plan", "delete", "2024-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("daylit plan restore 2024-03-03"));

    daylit_cmd(&db_path)
        .args(["plan", "show", "2024-03-03"])
        .assert()
        .failure();

    daylit_cmd(&db_path)
        .args(["plan", "delete", "2024-03-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already deleted"));

    daylit_cmd(&db_path)
        .args(["plan", "restore", "2024-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored plan for 2024-03-03"));

    daylit_cmd(&db_path)
        .args(["plan", "show", "2024-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stretch"));
}

#[test]
fn test_cli_drop_slot() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = add_daily_task(&db_path, "Read", "30");

    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY])
        .assert()
        .success();

    daylit_cmd(&db_path)
        .args(["plan", "drop-slot", DAY, "07:00", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted slot 07:00"));

    daylit_cmd(&db_path)
        .args(["plan", "show", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("No slots in this plan."));
}

#[test]
fn test_cli_feedback_and_optimize() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = add_daily_task(&db_path, "Deep work", "120");

    for day in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        daylit_cmd(&db_path)
            .args(["plan", "generate", day])
            .assert()
            .success();
        daylit_cmd(&db_path)
            .args(["plan", "accept", day])
            .assert()
            .success();
        daylit_cmd(&db_path)
            .args([
                "feedback",
                "too-much",
                "--date",
                day,
                "--start",
                "07:00",
                "--task",
                &id,
                "--note",
                "ran long",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Rated too_much"));
    }

    daylit_cmd(&db_path)
        .args(["optimize"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deep work"))
        .stdout(predicate::str::contains("120"));

    daylit_cmd(&db_path)
        .args(["optimize", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success:"));

    daylit_cmd(&db_path)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90 min"));
}

#[test]
fn test_cli_feedback_requires_accepted_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = add_daily_task(&db_path, "Read", "30");

    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY])
        .assert()
        .success();

    daylit_cmd(&db_path)
        .args([
            "feedback", "on-track", "--date", DAY, "--start", "07:00", "--task", &id,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not accepted"));
}

#[test]
fn test_cli_settings() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    daylit_cmd(&db_path)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("07:00"))
        .stdout(predicate::str::contains("22:00"));

    daylit_cmd(&db_path)
        .args(["settings", "set", "--day-start", "09:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:30"));

    add_daily_task(&db_path, "Read", "30");
    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:30–10:00"));

    daylit_cmd(&db_path)
        .args(["settings", "set", "--day-end", "08:00"])
        .assert()
        .failure();
}

#[test]
fn test_cli_task_disable_skips_planning() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let id = add_daily_task(&db_path, "Read", "30");

    daylit_cmd(&db_path)
        .args(["task", "disable", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Disabled"));

    daylit_cmd(&db_path)
        .args(["plan", "generate", DAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("No slots in this plan."));

    daylit_cmd(&db_path)
        .args(["task", "enable", "missing-id"])
        .assert()
        .failure();
}

#[test]
fn test_cli_default_command_without_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    daylit_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan for"));
}
