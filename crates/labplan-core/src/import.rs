//! Validation and sanitization of imported plan templates.
//!
//! Plan JSON usually comes from an AI assistant or a hand-edited file and is
//! treated as untrusted. [`parse_plan_json`] accepts either a bare array of
//! entries or an object with a `tasks` array, optionally wrapped in a Markdown
//! code fence, and produces [`PlanItemDraft`]s that are safe to persist and
//! expand. Unknown fields are ignored. Every rejection names the offending
//! entry and field, e.g. `tasks[3].week_offset`.

use serde_json::{Map, Value};

use crate::{
    error::{PlannerError, Result},
    models::{PlanTaskItem, Recurrence, Task, DEFAULT_IMPORTANCE, MAX_IMPORTANCE, MIN_IMPORTANCE},
};

/// Largest number of entries accepted in one import.
pub const MAX_PLAN_ENTRIES: usize = 500;
/// Titles longer than this many characters are truncated.
pub const MAX_TITLE_CHARS: usize = 200;
/// Largest absolute week offset accepted (about ten years).
pub const MAX_WEEK_OFFSET: i64 = 520;
/// Largest number of tasks one import may generate.
pub const MAX_GENERATED_TASKS: usize = 5_000;
/// Longest recurrence span accepted, in weeks.
pub const MAX_RECURRENCE_WEEKS: i32 = 2 * MAX_WEEK_OFFSET as i32;

/// A sanitized plan entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanItemDraft {
    pub title: String,
    pub description: Option<String>,
    pub week_offset: i32,
    pub importance: u8,
    pub recurrence: Option<Recurrence>,
}

/// Outcome of importing a plan into an experiment.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub experiment_id: u64,
    /// Plan entries stored by this import
    pub plan_items: Vec<PlanTaskItem>,
    /// Tasks generated from those entries
    pub created_tasks: Vec<Task>,
    /// Incomplete generated tasks removed by a replacing import
    pub removed_tasks: usize,
}

/// Parses and sanitizes a plan template.
pub fn parse_plan_json(input: &str) -> Result<Vec<PlanItemDraft>> {
    let value: Value = serde_json::from_str(strip_code_fence(input))?;

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("tasks") {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(PlannerError::invalid_input("tasks")
                    .with_reason("Expected a 'tasks' array in the plan object"));
            }
        },
        _ => {
            return Err(PlannerError::invalid_input("plan")
                .with_reason("Expected an array of tasks or an object with a 'tasks' array"));
        }
    };

    if entries.len() > MAX_PLAN_ENTRIES {
        return Err(PlannerError::invalid_input("tasks").with_reason(format!(
            "Plan has {} entries; at most {MAX_PLAN_ENTRIES} are accepted",
            entries.len()
        )));
    }

    let drafts = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| sanitize_entry(index, entry))
        .collect::<Result<Vec<_>>>()?;

    let mut generated = 0;
    for draft in &drafts {
        generated += match draft.recurrence {
            Some(recurrence) => recurrence.occurrences()?,
            None => 1,
        };
    }
    if generated > MAX_GENERATED_TASKS {
        return Err(PlannerError::invalid_input("tasks").with_reason(format!(
            "Plan would generate {generated} tasks; at most {MAX_GENERATED_TASKS} are accepted"
        )));
    }

    Ok(drafts)
}

fn strip_code_fence(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn sanitize_entry(index: usize, entry: &Value) -> Result<PlanItemDraft> {
    let field = |name: &str| format!("tasks[{index}].{name}");

    let Value::Object(object) = entry else {
        return Err(PlannerError::invalid_input(format!("tasks[{index}]"))
            .with_reason("Each plan entry must be an object"));
    };

    let title = match object.get("title") {
        Some(Value::String(title)) if !title.trim().is_empty() => {
            title.trim().chars().take(MAX_TITLE_CHARS).collect::<String>()
        }
        _ => {
            return Err(PlannerError::invalid_input(field("title"))
                .with_reason("A non-empty title is required"));
        }
    };

    let description = match object.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.trim().to_string()).filter(|s| !s.is_empty()),
        Some(_) => {
            return Err(PlannerError::invalid_input(field("description"))
                .with_reason("Description must be a string"));
        }
    };

    let week_offset = match lookup(object, "week_offset", "weekOffset").and_then(Value::as_i64) {
        Some(offset) if offset.abs() <= MAX_WEEK_OFFSET => offset as i32,
        Some(offset) => {
            return Err(PlannerError::invalid_input(field("week_offset")).with_reason(format!(
                "Week offset {offset} is out of range (at most {MAX_WEEK_OFFSET} weeks either way)"
            )));
        }
        None => {
            return Err(PlannerError::invalid_input(field("week_offset"))
                .with_reason("An integer week offset is required"));
        }
    };

    let importance = match object.get("importance") {
        None | Some(Value::Null) => DEFAULT_IMPORTANCE,
        Some(Value::Number(number)) => match number.as_f64() {
            Some(raw) if raw.is_finite() => {
                raw.round()
                    .clamp(f64::from(MIN_IMPORTANCE), f64::from(MAX_IMPORTANCE)) as u8
            }
            _ => DEFAULT_IMPORTANCE,
        },
        Some(_) => {
            return Err(PlannerError::invalid_input(field("importance"))
                .with_reason("Importance must be a number"));
        }
    };

    let recurrence = match object.get("recurrence") {
        None | Some(Value::Null) => None,
        Some(Value::Object(raw)) => {
            let interval_weeks = recurrence_field(raw, "interval_weeks", "intervalWeeks")
                .ok_or_else(|| {
                    PlannerError::invalid_input(field("recurrence.interval_weeks"))
                        .with_reason("An integer interval is required")
                })?;
            let duration_weeks = recurrence_field(raw, "duration_weeks", "durationWeeks")
                .ok_or_else(|| {
                    PlannerError::invalid_input(field("recurrence.duration_weeks"))
                        .with_reason("An integer duration is required")
                })?;
            let recurrence = Recurrence {
                interval_weeks,
                duration_weeks,
            };
            recurrence.validate()?;
            if duration_weeks > MAX_RECURRENCE_WEEKS {
                return Err(PlannerError::invalid_input(field("recurrence.duration_weeks"))
                    .with_reason(format!(
                        "Duration of {duration_weeks} weeks is too long (at most {MAX_RECURRENCE_WEEKS})"
                    )));
            }
            Some(recurrence)
        }
        Some(_) => {
            return Err(PlannerError::invalid_input(field("recurrence"))
                .with_reason("Recurrence must be an object"));
        }
    };

    Ok(PlanItemDraft {
        title,
        description,
        week_offset,
        importance,
        recurrence,
    })
}

fn lookup<'a>(object: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    object.get(snake).or_else(|| object.get(camel))
}

fn recurrence_field(object: &Map<String, Value>, snake: &str, camel: &str) -> Option<i32> {
    lookup(object, snake, camel)
        .and_then(Value::as_i64)
        .and_then(|value| i32::try_from(value).ok())
}
