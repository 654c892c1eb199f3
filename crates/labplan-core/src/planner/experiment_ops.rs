//! Experiment operations for the Planner.

use log::debug;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::{Experiment, ExperimentFilter},
    params::{self, CreateExperiment, Id},
    schedule::WeekId,
};

impl Planner {
    /// Creates a new experiment. Both dates are normalized to the Sunday of
    /// their week; the end week may not precede the start week.
    pub async fn create_experiment(&self, params: &CreateExperiment) -> Result<Experiment> {
        let title = params::required_title(&params.title)?;
        let description = params
            .description
            .clone()
            .filter(|d| !d.trim().is_empty());
        let start_date: WeekId = params.start_date.parse()?;
        let end_date = params
            .end_date
            .as_deref()
            .map(str::parse::<WeekId>)
            .transpose()?;

        if let Some(end) = end_date.filter(|end| *end < start_date) {
            return Err(PlannerError::invalid_input("end_date").with_reason(format!(
                "End week {end} is before start week {start_date}"
            )));
        }

        debug!("Creating experiment '{title}' starting {start_date}");
        self.with_database(move |db| {
            db.create_experiment(&title, description.as_deref(), start_date, end_date)
        })
        .await
    }

    /// Retrieves an experiment with its plan and tasks.
    pub async fn get_experiment(&self, params: &Id) -> Result<Option<Experiment>> {
        let id = params.id;
        self.with_database(move |db| db.get_experiment(id)).await
    }

    /// Lists experiments with optional filtering.
    pub async fn list_experiments(&self, filter: Option<ExperimentFilter>) -> Result<Vec<Experiment>> {
        self.with_database(move |db| db.list_experiments(filter.as_ref()))
            .await
    }

    /// Archives an experiment, hiding it from the default listing.
    pub async fn archive_experiment(&self, params: &Id) -> Result<Option<Experiment>> {
        let id = params.id;
        debug!("Archiving experiment {id}");
        self.with_database(move |db| db.archive_experiment(id)).await
    }

    /// Restores an archived experiment.
    pub async fn unarchive_experiment(&self, params: &Id) -> Result<Option<Experiment>> {
        let id = params.id;
        debug!("Unarchiving experiment {id}");
        self.with_database(move |db| db.unarchive_experiment(id))
            .await
    }

    /// Permanently deletes an experiment with its plan and tasks.
    pub async fn delete_experiment_by_id(&self, params: &Id) -> Result<()> {
        let id = params.id;
        debug!("Deleting experiment {id}");
        self.with_database(move |db| db.delete_experiment(id)).await
    }
}
