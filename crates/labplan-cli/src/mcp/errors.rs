//! Error handling utilities for MCP server

use labplan_core::PlannerError;
use rmcp::ErrorData;

/// Converts a planner error into an MCP error. Rejected input (validation,
/// cycles, missing records) maps to `invalid_params`, so the client can
/// correct its call; storage failures map to `internal_error`.
pub fn to_mcp_error(message: &str, error: &PlannerError) -> ErrorData {
    let text = format!("{message}: {error}");
    if error.is_user_error() {
        ErrorData::invalid_params(text, None)
    } else {
        ErrorData::internal_error(text, None)
    }
}

/// Error for a lookup that found nothing.
pub fn not_found(kind: &str, id: u64) -> ErrorData {
    ErrorData::invalid_params(format!("{kind} with ID {id} not found"), None)
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;

    use super::*;

    #[test]
    fn test_user_errors_are_invalid_params() {
        let error = PlannerError::CycleRejected {
            task_id: 1,
            dependency_id: 2,
        };
        let data = to_mcp_error("Failed to add dependency", &error);
        assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
        assert!(data.message.starts_with("Failed to add dependency: "));
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let error = PlannerError::Configuration {
            message: "no data directory".to_string(),
        };
        let data = to_mcp_error("Failed to create experiment", &error);
        assert_eq!(data.code, ErrorCode::INTERNAL_ERROR);
    }
}
