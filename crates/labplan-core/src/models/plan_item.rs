//! Plan template entries and their recurrence descriptors.

use std::iter::StepBy;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Controls how a plan entry expands into repeated task instances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    /// Weeks between consecutive instances (at least 1)
    #[serde(alias = "intervalWeeks")]
    pub interval_weeks: i32,

    /// Span in weeks, from the entry's first instance, that instances may
    /// start within (at least 1)
    #[serde(alias = "durationWeeks")]
    pub duration_weeks: i32,
}

impl Recurrence {
    /// Rejects non-positive intervals and durations.
    pub fn validate(&self) -> Result<()> {
        if self.interval_weeks < 1 || self.duration_weeks < 1 {
            return Err(PlannerError::InvalidRecurrence {
                interval_weeks: self.interval_weeks,
                duration_weeks: self.duration_weeks,
            });
        }
        Ok(())
    }

    /// Offsets of each instance relative to the entry's first week.
    ///
    /// Yields `k * interval_weeks` for every `k` with
    /// `k * interval_weeks < duration_weeks`, which is
    /// `ceil(duration_weeks / interval_weeks)` instances.
    pub fn relative_offsets(&self) -> Result<StepBy<Range<i32>>> {
        self.validate()?;
        // interval_weeks >= 1 after validation
        Ok((0..self.duration_weeks).step_by(self.interval_weeks.unsigned_abs() as usize))
    }

    /// Number of instances this recurrence expands into.
    pub fn occurrences(&self) -> Result<usize> {
        Ok(self.relative_offsets()?.count())
    }
}

/// A template task in an experiment's master plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanTaskItem {
    /// Unique identifier for the plan entry
    pub id: u64,

    /// Title given to generated tasks
    pub title: String,

    /// Description copied to generated tasks
    pub description: Option<String>,

    /// Week of the first instance, relative to the experiment start
    #[serde(alias = "weekOffset")]
    pub week_offset: i32,

    /// Importance copied to generated tasks
    pub importance: u8,

    /// Optional repetition of the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_is_ceiling_of_duration_over_interval() {
        let cases = [(1, 1, 1), (1, 4, 4), (2, 5, 3), (2, 4, 2), (3, 10, 4), (7, 3, 1)];
        for (interval_weeks, duration_weeks, expected) in cases {
            let recurrence = Recurrence {
                interval_weeks,
                duration_weeks,
            };
            assert_eq!(
                recurrence.occurrences().unwrap(),
                expected,
                "interval {interval_weeks}, duration {duration_weeks}"
            );
        }
    }

    #[test]
    fn test_relative_offsets_strictly_below_duration() {
        let recurrence = Recurrence {
            interval_weeks: 2,
            duration_weeks: 5,
        };
        let offsets: Vec<i32> = recurrence.relative_offsets().unwrap().collect();
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[test]
    fn test_zero_or_negative_interval_is_rejected() {
        for interval_weeks in [0, -1, -7] {
            let recurrence = Recurrence {
                interval_weeks,
                duration_weeks: 4,
            };
            assert!(matches!(
                recurrence.relative_offsets(),
                Err(PlannerError::InvalidRecurrence { .. })
            ));
        }
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let recurrence = Recurrence {
            interval_weeks: 1,
            duration_weeks: 0,
        };
        assert!(matches!(
            recurrence.validate(),
            Err(PlannerError::InvalidRecurrence {
                interval_weeks: 1,
                duration_weeks: 0
            })
        ));
    }

    #[test]
    fn test_camel_case_aliases() {
        let recurrence: Recurrence =
            serde_json::from_str(r#"{"intervalWeeks": 2, "durationWeeks": 6}"#).unwrap();
        assert_eq!(recurrence.interval_weeks, 2);
        assert_eq!(recurrence.duration_weeks, 6);
    }
}
