//! Calendar collaborator: event payloads and the service boundary.
//!
//! The agent never talks to a calendar API directly. It builds an
//! [`EventDetails`] payload and hands it to a [`CalendarService`], whose
//! authentication, retry and API semantics are its own business.

pub mod google;

pub use google::GoogleCalendarService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgendaError;

/// Time zone attached to every event unless configured otherwise.
pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

/// Event payload in the calendar API's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDetails {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// A point in time paired with the zone it should be read in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

impl EventDetails {
    pub fn new(
        summary: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        time_zone: &str,
    ) -> Self {
        Self {
            summary: summary.into(),
            start: EventDateTime {
                date_time: start.into(),
                time_zone: time_zone.to_string(),
            },
            end: EventDateTime {
                date_time: end.into(),
                time_zone: time_zone.to_string(),
            },
        }
    }
}

/// External calendar service.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Create an event, returning the service's textual result.
    async fn create_event(&self, event: &EventDetails) -> Result<String, AgendaError>;
}
