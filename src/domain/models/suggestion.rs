//! Request/response records exchanged with the scheduling assistant.
//!
//! These are plain values built per call. Requests are checked with `validate`
//! before any prompt is rendered; model output goes through `from_model_output`,
//! which rejects anything that does not fit the declared shape.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub team_availability: String,
    #[serde(alias = "meetingDuration")]
    pub meeting_duration_minutes: i64,
    pub preferred_days: String,
    pub preferred_time_of_day: String,
}

impl SuggestionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("teamAvailability", &self.team_availability)?;
        if self.meeting_duration_minutes <= 0 {
            return Err(AppError::Validation("meetingDurationMinutes must be a positive integer".into()));
        }
        require_text("preferredDays", &self.preferred_days)?;
        require_text("preferredTimeOfDay", &self.preferred_time_of_day)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggested_times: Vec<String>,
    pub reasoning: String,
}

impl SuggestionResponse {
    /// Output shape handed to the model provider (OpenAPI subset, as Gemini expects it).
    pub fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "suggestedTimes": {
                    "type": "ARRAY",
                    "description": "Suggested meeting start times in ISO 8601 format.",
                    "items": { "type": "STRING" }
                },
                "reasoning": {
                    "type": "STRING",
                    "description": "Why these times were suggested."
                }
            },
            "required": ["suggestedTimes", "reasoning"],
            "propertyOrdering": ["suggestedTimes", "reasoning"]
        })
    }

    pub fn from_model_output(value: Value, min_times: usize) -> Result<Self, AppError> {
        let response: SuggestionResponse = serde_json::from_value(value)
            .map_err(|e| AppError::OutputSchema(e.to_string()))?;

        let min_times = min_times.max(1);
        if response.suggested_times.len() < min_times {
            return Err(AppError::OutputSchema(format!(
                "expected at least {} suggested times, got {}",
                min_times,
                response.suggested_times.len()
            )));
        }

        if let Some(bad) = response.suggested_times.iter().find(|t| !is_timestamp(t)) {
            return Err(AppError::OutputSchema(format!("unparseable timestamp: {:?}", bad)));
        }

        Ok(response)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub team_availability: String,
    pub user_preferences: String,
    pub suggested_times: String,
}

impl ExplanationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("teamAvailability", &self.team_availability)?;
        require_text("userPreferences", &self.user_preferences)?;
        require_text("suggestedTimes", &self.suggested_times)?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExplanationResponse {
    pub explanation: String,
}

impl ExplanationResponse {
    pub fn output_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "explanation": {
                    "type": "STRING",
                    "description": "Why the times were suggested."
                }
            },
            "required": ["explanation"]
        })
    }

    pub fn from_model_output(value: Value) -> Result<Self, AppError> {
        serde_json::from_value(value).map_err(|e| AppError::OutputSchema(e.to_string()))
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// RFC 3339 with offset, or a local ISO 8601 date-time without one.
fn is_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
}
