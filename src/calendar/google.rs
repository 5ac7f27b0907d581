//! Google Calendar REST client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::AgendaError;
use crate::provider::http::{bearer_headers, shared_client, status_to_error};

use super::{CalendarService, EventDetails};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Creates events through `POST /calendars/{calendarId}/events`.
#[derive(Debug, Clone)]
pub struct GoogleCalendarService {
    access_token: Option<String>,
    calendar_id: String,
    base_url: String,
}

impl GoogleCalendarService {
    pub fn new(access_token: Option<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            access_token,
            calendar_id: calendar_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self) -> Result<reqwest::Url, AgendaError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AgendaError::Configuration(format!("invalid calendar base URL '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AgendaError::Configuration(format!(
                    "calendar base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarService {
    async fn create_event(&self, event: &EventDetails) -> Result<String, AgendaError> {
        let token = self.access_token.as_deref().ok_or_else(|| {
            AgendaError::Authentication("Missing GOOGLE_CALENDAR_ACCESS_TOKEN".into())
        })?;
        let url = self.events_url()?;

        debug!(calendar = %self.calendar_id, summary = %event.summary, "creating calendar event");

        let resp = shared_client()
            .post(url)
            .headers(bearer_headers(token))
            .json(event)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let created: CreatedEvent = resp.json().await?;
        let reference = created
            .html_link
            .or(created.id)
            .unwrap_or_else(|| "(no link returned)".to_string());
        Ok(format!("Event created: {reference}"))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedEvent {
    id: Option<String>,
    html_link: Option<String>,
}
