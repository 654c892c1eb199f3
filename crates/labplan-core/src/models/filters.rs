//! Filter types for querying experiments.

use super::ExperimentStatus;

/// Filter options for querying experiments.
#[derive(Debug, Clone, Default)]
pub struct ExperimentFilter {
    /// Filter by experiment title (case-insensitive partial match)
    pub title_contains: Option<String>,

    /// Filter by experiment status. `None` lists every experiment.
    pub status: Option<ExperimentStatus>,
}

impl From<&crate::params::ListExperiments> for ExperimentFilter {
    /// Convert ListExperiments parameters to an ExperimentFilter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use labplan_core::{
    ///     models::{ExperimentFilter, ExperimentStatus},
    ///     params::ListExperiments,
    /// };
    ///
    /// let params = ListExperiments { archived: true };
    /// let filter: ExperimentFilter = (&params).into();
    /// assert_eq!(filter.status, Some(ExperimentStatus::Archived));
    /// ```
    fn from(params: &crate::params::ListExperiments) -> Self {
        let status = if params.archived {
            ExperimentStatus::Archived
        } else {
            ExperimentStatus::Active
        };
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
