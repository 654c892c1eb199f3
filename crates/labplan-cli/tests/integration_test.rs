//! Integration tests comparing CLI output with the core Display
//! implementations that the MCP server returns as tool text.

use std::process::Command;

use labplan_core::{
    display::CreateResult,
    params::{AddTask, CreateExperiment, Dependency, Id, ImportPlan, WeekQuery},
    Planner, PlannerBuilder,
};
use tempfile::TempDir;

/// Helper function to create a test planner with temporary database
async fn create_test_planner() -> (Planner, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test.db");

    let planner = PlannerBuilder::new()
        .with_database_path(db_path)
        .build()
        .await
        .expect("Failed to create planner");

    (planner, temp_dir)
}

/// Run a CLI command and capture its output
fn run_cli_command(db_path: &str, args: &[&str]) -> String {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lp"));
    cmd.arg("--no-color").arg("--database-file").arg(db_path);

    for arg in args {
        cmd.arg(arg);
    }

    let output = cmd.output().expect("Failed to run CLI command");
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

async fn seed_experiment(planner: &Planner) -> u64 {
    let experiment = planner
        .create_experiment(&CreateExperiment {
            title: "Consistency".to_string(),
            description: Some("Shared between CLI and library".to_string()),
            start_date: "2024-01-07".to_string(),
            end_date: Some("2024-02-25".to_string()),
        })
        .await
        .expect("Failed to create experiment");

    planner
        .import_plan(&ImportPlan {
            experiment_id: experiment.id,
            plan_json: r#"[{"title": "Design primers", "week_offset": 0},
                           {"title": "Run qPCR", "week_offset": 2,
                            "recurrence": {"interval_weeks": 2, "duration_weeks": 4}}]"#
                .to_string(),
            replace: false,
        })
        .await
        .expect("Failed to import plan");

    planner
        .add_dependency(&Dependency {
            task_id: 2,
            dependency_id: 1,
        })
        .await
        .expect("Failed to add dependency");

    experiment.id
}

#[tokio::test]
async fn test_create_display_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");
    let db_str = db_path.to_str().unwrap();

    let cli_output = run_cli_command(
        db_str,
        &["experiment", "create", "From CLI", "--start", "2024-01-10"],
    );

    let experiment = planner
        .create_experiment(&CreateExperiment {
            title: "From library".to_string(),
            start_date: "2024-01-10".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create experiment");
    let direct_output = CreateResult::new(experiment).to_string();

    assert!(cli_output.contains("Created experiment with ID: 1"));
    assert!(direct_output.contains("Created experiment with ID: 2"));
    assert!(cli_output.contains("- Start: week of 2024-01-07"));
    assert!(direct_output.contains("- Start: week of 2024-01-07"));
}

#[tokio::test]
async fn test_show_experiment_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");
    let experiment_id = seed_experiment(&planner).await;

    let experiment = planner
        .get_experiment(&Id { id: experiment_id })
        .await
        .unwrap()
        .expect("Experiment should exist");

    let cli_output = run_cli_command(
        db_path.to_str().unwrap(),
        &["experiment", "show", &experiment_id.to_string()],
    );

    assert_eq!(cli_output, experiment.to_string());
    assert!(cli_output.contains("## Plan"));
    assert!(cli_output.contains("Run qPCR (1)"));
    assert!(cli_output.contains("Run qPCR (2)"));
}

#[tokio::test]
async fn test_week_board_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");
    let experiment_id = seed_experiment(&planner).await;

    let board = planner
        .week_board(&WeekQuery {
            experiment_id,
            date: Some("2024-01-23".to_string()),
        })
        .await
        .expect("Failed to build week board");

    let cli_output = run_cli_command(
        db_path.to_str().unwrap(),
        &[
            "experiment",
            "week",
            &experiment_id.to_string(),
            "--date",
            "2024-01-23",
        ],
    );

    assert_eq!(cli_output, board.to_string());
    assert!(cli_output.contains("(week +2)"));
    assert!(cli_output.contains("Run qPCR (1) (⧗ Blocked"));
}

#[tokio::test]
async fn test_task_display_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");
    let experiment_id = seed_experiment(&planner).await;

    let task = planner
        .add_task(&AddTask {
            experiment_id,
            title: "Order plates".to_string(),
            week: Some("2024-01-09".to_string()),
            importance: Some(2),
            ..Default::default()
        })
        .await
        .expect("Failed to add task");

    let cli_output = run_cli_command(
        db_path.to_str().unwrap(),
        &["task", "show", &task.id.to_string()],
    );

    assert_eq!(cli_output, task.to_string());
}

#[tokio::test]
async fn test_list_consistency() {
    let (planner, temp_dir) = create_test_planner().await;
    let db_path = temp_dir.path().join("test.db");
    seed_experiment(&planner).await;

    let summaries = planner
        .list_experiments_summary(&labplan_core::params::ListExperiments { archived: false })
        .await
        .expect("Failed to list experiments");

    let cli_output = run_cli_command(db_path.to_str().unwrap(), &["experiment", "list"]);

    assert_eq!(cli_output, format!("# Active Experiments\n\n{summaries}"));
    assert!(cli_output.contains("(0/3)"));
    assert!(cli_output.contains("- **Blocked**: 1 task(s)"));
}
