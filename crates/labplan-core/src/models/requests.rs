//! Request types for updating models.

use super::task::validate_importance;
use crate::schedule::WeekId;

/// Validated partial update of a task.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub week_id: Option<WeekId>,
    pub importance: Option<u8>,
    pub completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Whether the request changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl TryFrom<crate::params::UpdateTask> for UpdateTaskRequest {
    type Error = crate::PlannerError;

    /// Convert an UpdateTask parameter into a validated UpdateTaskRequest.
    ///
    /// The week is normalized to its Sunday and the importance is checked
    /// against the 1–5 range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use labplan_core::{models::UpdateTaskRequest, params::UpdateTask};
    ///
    /// let params = UpdateTask {
    ///     id: 1,
    ///     week: Some("2024-01-10".to_string()),
    ///     completed: Some(true),
    ///     ..Default::default()
    /// };
    ///
    /// let request: UpdateTaskRequest = params.try_into()?;
    /// assert_eq!(request.week_id.unwrap().to_string(), "2024-01-07");
    /// assert_eq!(request.completed, Some(true));
    /// # Ok::<(), labplan_core::PlannerError>(())
    /// ```
    fn try_from(params: crate::params::UpdateTask) -> Result<Self, Self::Error> {
        let title = match params.title {
            Some(title) => Some(crate::params::required_title(&title)?),
            None => None,
        };
        let week_id = params.week.as_deref().map(str::parse).transpose()?;
        let importance = params.importance.map(validate_importance).transpose()?;

        Ok(Self {
            title,
            description: params.description,
            week_id,
            importance,
            completed: params.completed,
        })
    }
}
