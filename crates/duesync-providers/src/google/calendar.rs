//! [`CalendarService`] backed by Google Calendar.

use tracing::info;

use crate::calendar::{BoxFuture, CalendarService, EventQuery, NewEvent, RemoteEvent};
use crate::error::ProviderResult;

use super::auth::GoogleAuth;
use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::tokens::TokenInfo;

/// One Google calendar, reached with an already valid access token.
pub struct GoogleCalendar {
    client: GoogleCalendarClient,
    calendar_id: String,
    name: String,
}

impl GoogleCalendar {
    /// Wraps a valid token for the calendar named in `config`.
    pub fn new(config: &GoogleConfig, tokens: &TokenInfo) -> ProviderResult<Self> {
        let client = GoogleCalendarClient::new(
            &tokens.access_token,
            &config.api_base_url,
            config.timeout,
        )?;

        Ok(Self {
            client,
            calendar_id: config.calendar_id.clone(),
            name: config.provider_name(),
        })
    }

    /// Obtains a valid token (refreshing or asking for consent) and connects.
    pub async fn connect(config: GoogleConfig, interactive: bool) -> ProviderResult<Self> {
        let mut auth = GoogleAuth::new(config)?;
        let tokens = auth.ensure_valid(interactive).await?;
        let calendar = Self::new(auth.config(), &tokens)?;
        info!("connected to {}", calendar.name);
        Ok(calendar)
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }
}

impl CalendarService for GoogleCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn search_events(&self, query: EventQuery) -> BoxFuture<'_, ProviderResult<Vec<RemoteEvent>>> {
        Box::pin(async move {
            self.client
                .list_events(&self.calendar_id, &query)
                .await
                .map_err(|e| e.with_provider(&self.name))
        })
    }

    fn insert_event(&self, event: NewEvent) -> BoxFuture<'_, ProviderResult<RemoteEvent>> {
        Box::pin(async move {
            self.client
                .insert_event(&self.calendar_id, &event)
                .await
                .map_err(|e| e.with_provider(&self.name))
        })
    }

    fn delete_event<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            self.client
                .delete_event(&self.calendar_id, event_id)
                .await
                .map_err(|e| e.with_provider(&self.name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::config::OAuthCredentials;
    use chrono::DateTime;
    use duesync_core::TimeWindow;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn calendar(server: &MockServer) -> GoogleCalendar {
        let config = GoogleConfig::new(OAuthCredentials::new(
            "test-client.apps.googleusercontent.com",
            "secret",
        ))
        .with_calendar_id("school")
        .with_api_base_url(server.uri());
        let tokens = TokenInfo::new("tok", None, Some(3600), config.scopes.clone());
        GoogleCalendar::new(&config, &tokens).unwrap()
    }

    #[tokio::test]
    async fn errors_carry_calendar_name() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/school/events/e1"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let calendar = calendar(&server);
        assert_eq!(calendar.name(), "google:school");

        let err = calendar.delete_event("e1").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.provider(), Some("google:school"));
    }

    #[tokio::test]
    async fn search_through_trait_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/school/events"))
            .and(bearer_token("tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "e1", "summary": "MAT 111: HW1" }]
            })))
            .mount(&server)
            .await;

        let calendar = calendar(&server);
        let service: &dyn CalendarService = &calendar;
        let due = DateTime::parse_from_rfc3339("2024-03-01T23:59:00-08:00").unwrap();
        let events = service
            .search_events(EventQuery::new(TimeWindow::for_deadline(due)).with_text("MAT 111: HW1"))
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert!(events[0].has_summary("MAT 111: HW1"));
    }
}
