use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn lp_cmd() -> Command {
    let mut cmd = Command::cargo_bin("lp").expect("Failed to find lp binary");
    cmd.arg("--no-color");
    cmd
}

/// Runs a command that must succeed and returns its stdout
fn run_ok(db_arg: &str, args: &[&str]) -> String {
    let output = lp_cmd()
        .args(["--database-file", db_arg])
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("Invalid UTF-8")
}

/// Extracts the ID from "Created ... with ID: N" output
fn extract_id_from_output(output: &str) -> String {
    if let Some(start) = output.find("ID: ") {
        let id_str = &output[start + 4..];
        let end = id_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(id_str.len());
        return id_str[..end].to_string();
    }
    panic!("Could not extract ID from output: {output}");
}

fn create_experiment(db_arg: &str, title: &str) -> String {
    let output = run_ok(
        db_arg,
        &["experiment", "create", title, "--start", "2024-01-10"],
    );
    extract_id_from_output(&output)
}

fn add_task(db_arg: &str, experiment_id: &str, title: &str, week: &str) -> String {
    let output = run_ok(
        db_arg,
        &["task", "add", experiment_id, title, "--week", week],
    );
    extract_id_from_output(&output)
}

#[test]
fn test_cli_create_experiment() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    lp_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "experiment",
            "create",
            "Mass spec run",
            "--start",
            "2024-01-10",
            "--end",
            "2024-02-14",
            "--description",
            "Phosphoproteomics of treated cells",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created experiment with ID: 1"))
        .stdout(predicate::str::contains("# 1. Mass spec run"))
        .stdout(predicate::str::contains("week of 2024-01-07"))
        .stdout(predicate::str::contains("week of 2024-02-11"))
        .stdout(predicate::str::contains("Phosphoproteomics of treated cells"));
}

#[test]
fn test_cli_create_experiment_rejects_bad_dates() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "create", "Bad", "--start", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create experiment"));

    lp_cmd()
        .args([
            "--database-file",
            db_arg,
            "experiment",
            "create",
            "Backwards",
            "--start",
            "2024-03-01",
            "--end",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("end_date"));
}

#[test]
fn test_cli_list_empty() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    lp_cmd()
        .args(["--database-file", db_path.to_str().unwrap(), "experiment", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Active Experiments"))
        .stdout(predicate::str::contains("No experiments found."));
}

#[test]
fn test_cli_default_command_lists_active_experiments() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    create_experiment(db_arg, "Default listing");

    lp_cmd()
        .args(["--database-file", db_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Active Experiments"))
        .stdout(predicate::str::contains("Default listing"));
}

#[test]
fn test_cli_archive_and_unarchive() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let id = create_experiment(db_arg, "Archive Title");

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "archive", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived experiment"));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive Title").not());

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "list", "--archived"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Archived Experiments"))
        .stdout(predicate::str::contains("Archive Title"));

    lp_cmd()
        .args(["--database-file", db_arg, "e", "u", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unarchived experiment"));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive Title"));
}

#[test]
fn test_cli_delete_requires_confirmation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let id = create_experiment(db_arg, "Delete me");
    add_task(db_arg, &id, "Only task", "2024-01-10");

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirm"));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "delete", &id, "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Deleted experiment 'Delete me' (ID: 1) with 1 task(s)",
        ));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_task_lifecycle() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let experiment_id = create_experiment(db_arg, "Lifecycle");

    let output = run_ok(
        db_arg,
        &[
            "task",
            "add",
            &experiment_id,
            "Prepare buffers",
            "--week",
            "2024-01-17",
            "--importance",
            "4",
            "--description",
            "Tris, NaCl, EDTA",
        ],
    );
    assert!(output.contains("Created task with ID: 1"));
    assert!(output.contains("### 1. Prepare buffers (○ Open)"));
    assert!(output.contains("Jan 14 – Jan 20, 2024"));
    assert!(output.contains("- Importance: 4"));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "update", "1", "--done", "--title", "Prepare fresh buffers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task with ID: 1"))
        .stdout(predicate::str::contains("- Updated title"))
        .stdout(predicate::str::contains("- Marked as done"))
        .stdout(predicate::str::contains("Prepare fresh buffers (✓ Done)"));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "update", "1", "--done", "--undone"])
        .assert()
        .failure();

    lp_cmd()
        .args(["--database-file", db_arg, "task", "update", "1", "--importance", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("importance"));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "update", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No fields to update"));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Deleted task 'Prepare fresh buffers' (ID: 1)",
        ));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task with ID 1 not found"));
}

#[test]
fn test_cli_dependencies_and_blocked() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let experiment_id = create_experiment(db_arg, "Dependencies");
    let transfect = add_task(db_arg, &experiment_id, "Transfect", "2024-01-10");
    let select = add_task(db_arg, &experiment_id, "Select clones", "2024-01-17");

    lp_cmd()
        .args(["--database-file", db_arg, "task", "depend", &select, &transfect])
        .assert()
        .success()
        .stdout(predicate::str::contains("Now waits for task"))
        .stdout(predicate::str::contains("- Depends on: 1"));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "depend", &transfect, &select])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "blocked", &experiment_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Blocked Tasks"))
        .stdout(predicate::str::contains("Select clones"))
        .stdout(predicate::str::contains("Transfect").not());

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "show", &experiment_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- 2. Select clones (⧗ Blocked, importance 3, after 1)"));

    lp_cmd()
        .args(["--database-file", db_arg, "task", "undepend", &select, &transfect])
        .assert()
        .success()
        .stdout(predicate::str::contains("No longer waits for task"));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "blocked", &experiment_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn test_cli_import_shift_and_week() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let experiment_id = create_experiment(db_arg, "Cell culture");

    let plan_path = temp_dir.path().join("plan.json");
    fs::write(
        &plan_path,
        r#"[
            {"title": "Thaw cells", "week_offset": 0, "importance": 5},
            {"title": "Passage", "week_offset": 1,
             "recurrence": {"interval_weeks": 1, "duration_weeks": 3}}
        ]"#,
    )
    .expect("Failed to write plan file");

    lp_cmd()
        .args([
            "--database-file",
            db_arg,
            "experiment",
            "import",
            &experiment_id,
            plan_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 plan entries"))
        .stdout(predicate::str::contains("- Tasks created: 4"));

    lp_cmd()
        .args([
            "--database-file",
            db_arg,
            "experiment",
            "week",
            &experiment_id,
            "--date",
            "2024-01-24",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jan 21 – Jan 27, 2024 (week +2)"))
        .stdout(predicate::str::contains("Passage (2)"));

    lp_cmd()
        .args(["--database-file", db_arg, "experiment", "shift", &experiment_id, "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved incomplete tasks by -1 week(s)"));

    lp_cmd()
        .args([
            "--database-file",
            db_arg,
            "experiment",
            "week",
            &experiment_id,
            "--date",
            "2024-01-24",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Passage (3)"));
}

#[test]
fn test_cli_import_errors() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    let experiment_id = create_experiment(db_arg, "Broken import");

    lp_cmd()
        .args([
            "--database-file",
            db_arg,
            "experiment",
            "import",
            &experiment_id,
            "/nonexistent/plan.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read plan file"));

    let plan_path = temp_dir.path().join("plan.json");
    fs::write(&plan_path, r#"[{"title": "No offset"}]"#).expect("Failed to write plan file");

    lp_cmd()
        .args([
            "--database-file",
            db_arg,
            "experiment",
            "import",
            &experiment_id,
            plan_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tasks[0].week_offset"));
}

#[test]
fn test_cli_help_output() {
    lp_cmd()
        .args(["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("experiment"))
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_cli_experiment_help() {
    lp_cmd()
        .args(["experiment", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage experiments"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("shift"))
        .stdout(predicate::str::contains("week"))
        .stdout(predicate::str::contains("blocked"));
}

#[test]
fn test_cli_version_output() {
    lp_cmd()
        .args(["--version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("lp "));
}
