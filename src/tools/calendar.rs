//! The `create_calendar_event` tool.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use tracing::info;

use crate::calendar::{CalendarService, EventDetails};
use crate::error::AgendaError;
use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::AgentToolParameters;

/// Name the model uses to request an event.
pub const CREATE_CALENDAR_EVENT: &str = "create_calendar_event";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Validated argument set for [`CREATE_CALENDAR_EVENT`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreateEventArgs {
    pub summary: String,
    pub start_datetime: String,
    pub end_datetime: String,
}

impl CreateEventArgs {
    /// Check every field is present and both timestamps are ISO-8601 date-times.
    ///
    /// Start is not compared against end.
    pub fn validate(&self) -> Result<(), AgendaError> {
        if self.summary.trim().is_empty() {
            return Err(invalid("summary must not be empty"));
        }
        for (field, value) in [
            ("start_datetime", &self.start_datetime),
            ("end_datetime", &self.end_datetime),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{field} must not be empty")));
            }
            if !is_iso_datetime(value) {
                return Err(invalid(format!(
                    "{field} '{value}' is not an ISO 8601 date-time (e.g. 2024-05-20T10:00:00)"
                )));
            }
        }
        Ok(())
    }

    /// Build the calendar payload in the given time zone.
    pub fn to_event(&self, time_zone: &str) -> EventDetails {
        EventDetails::new(
            self.summary.clone(),
            self.start_datetime.clone(),
            self.end_datetime.clone(),
            time_zone,
        )
    }
}

fn invalid(message: impl Into<String>) -> AgendaError {
    AgendaError::ToolValidation {
        tool_name: CREATE_CALENDAR_EVENT.to_string(),
        message: message.into(),
    }
}

fn is_iso_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NAIVE_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}

/// Parameter schema advertised to the model.
pub fn create_event_parameters() -> AgentToolParameters {
    AgentToolParameters::object()
        .non_empty_string("summary", "A summary or title for the event.")
        .non_empty_string(
            "start_datetime",
            "The start date and time for the event in ISO 8601 format (e.g., '2024-05-20T10:00:00').",
        )
        .non_empty_string(
            "end_datetime",
            "The end date and time for the event in ISO 8601 format (e.g., '2024-05-20T11:00:00').",
        )
        .build()
}

/// Create the `create_calendar_event` tool backed by `service`.
///
/// Every event is stamped with `time_zone`; the model never chooses it.
pub fn create_calendar_event_tool(
    service: Arc<dyn CalendarService>,
    time_zone: impl Into<String>,
) -> Arc<dyn Tool> {
    let time_zone: Arc<str> = Arc::from(time_zone.into());
    Arc::new(AgentTool::new(
        CREATE_CALENDAR_EVENT,
        "Creates a Google Calendar event with a summary, start time, and end time.",
        create_event_parameters(),
        move |args, ctx: ToolExecutionContext| {
            let service = Arc::clone(&service);
            let time_zone = Arc::clone(&time_zone);
            async move {
                let parsed: CreateEventArgs = args
                    .deserialize()
                    .map_err(|e| invalid(e.to_string()))?;
                parsed.validate()?;

                let event = parsed.to_event(&time_zone);
                info!(
                    call_id = ctx.tool_call_id.as_deref().unwrap_or("-"),
                    summary = %event.summary,
                    "creating calendar event"
                );
                let created = service.create_event(&event).await.map_err(|e| {
                    AgendaError::ToolExecution {
                        tool_name: CREATE_CALENDAR_EVENT.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok(serde_json::Value::String(created))
            }
        },
    ))
}
