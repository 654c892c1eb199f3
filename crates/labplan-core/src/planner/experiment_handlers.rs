//! Experiment handler operations that return formatted wrapper types.

use super::Planner;
use crate::{
    display::ExperimentSummaries,
    error::{PlannerError, Result},
    models::{Experiment, ExperimentFilter, ExperimentSummary},
    params::{DeleteExperiment, Id, ListExperiments},
};

impl Planner {
    /// Lists active or archived experiments as summaries with task counts.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use labplan_core::{params::ListExperiments, PlannerBuilder};
    /// # async {
    /// let planner = PlannerBuilder::new().build().await?;
    /// let summaries = planner
    ///     .list_experiments_summary(&ListExperiments { archived: false })
    ///     .await?;
    /// # Result::<(), labplan_core::PlannerError>::Ok(())
    /// # };
    /// ```
    pub async fn list_experiments_summary(
        &self,
        params: &ListExperiments,
    ) -> Result<ExperimentSummaries> {
        let filter = Some(ExperimentFilter::from(params));
        let experiments = self.list_experiments(filter).await?;
        let summaries: Vec<ExperimentSummary> = experiments.iter().map(Into::into).collect();
        Ok(ExperimentSummaries(summaries))
    }

    /// Permanently deletes an experiment after explicit confirmation.
    ///
    /// Returns the deleted experiment for confirmation output, or `None` if
    /// it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidInput` if `confirmed` is false.
    pub async fn delete_experiment(&self, params: &DeleteExperiment) -> Result<Option<Experiment>> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input("confirmed").with_reason(
                "Experiment deletion requires explicit confirmation. Set 'confirmed' to true to permanently delete the experiment, its plan and all of its tasks.",
            ));
        }

        let id_params = Id { id: params.id };
        let experiment = self.get_experiment(&id_params).await?;

        if experiment.is_some() {
            self.delete_experiment_by_id(&id_params).await?;
        }

        Ok(experiment)
    }
}
