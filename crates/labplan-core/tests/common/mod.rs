use labplan_core::{params::CreateExperiment, Planner, PlannerBuilder};
use tempfile::TempDir;

/// Helper function to create a test planner
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(&db_path)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// Creates an experiment starting in the week of 2024-01-07.
#[allow(dead_code)]
pub async fn create_experiment(planner: &Planner, title: &str) -> u64 {
    planner
        .create_experiment(&CreateExperiment {
            title: title.to_string(),
            start_date: "2024-01-07".to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create experiment")
        .id
}
