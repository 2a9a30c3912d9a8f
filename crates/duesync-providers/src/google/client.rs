//! Google Calendar API v3 client.
//!
//! Thin HTTP layer over `events.list`, `events.insert` and `events.delete`.
//! Every non-success status is mapped onto a [`ProviderError`] category.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::{EventQuery, NewEvent, RemoteEvent};
use crate::error::{ProviderError, ProviderResult};

/// Google Calendar API client bound to one access token.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    /// Lists every event matching the query, following `nextPageToken`.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> ProviderResult<Vec<RemoteEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .list_events_page(calendar_id, query, page_token.as_deref())
                .await?;

            events.extend(page.items.into_iter().filter_map(convert_event));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(
            "found {} events in {} for {:?}",
            events.len(),
            calendar_id,
            query.text
        );
        Ok(events)
    }

    async fn list_events_page(
        &self,
        calendar_id: &str,
        query: &EventQuery,
        page_token: Option<&str>,
    ) -> ProviderResult<EventListResponse> {
        let mut request = self
            .http_client
            .get(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", query.window.start.to_rfc3339()),
                ("timeMax", query.window.end.to_rfc3339()),
                ("singleEvents", query.single_events.to_string()),
            ]);

        if let Some(ref text) = query.text {
            request = request.query(&[("q", text)]);
        }

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(response, "events.list").await?;
        parse_json(response).await
    }

    /// Creates an event and returns it as stored by Google.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> ProviderResult<RemoteEvent> {
        let body = InsertEventRequest::from(event);

        let response = self
            .http_client
            .post(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, "events.insert").await?;
        let created: ApiEvent = parse_json(response).await?;

        match created.id.as_deref() {
            Some(id) if !id.is_empty() => {}
            _ => {
                return Err(ProviderError::invalid_response(
                    "insert response carried no event id",
                ));
            }
        }

        convert_event(created)
            .ok_or_else(|| ProviderError::invalid_response("insert response could not be read"))
    }

    /// Deletes an event. Gone or unknown events come back as not found.
    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        let url = format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id)
        );

        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(response, "events.delete").await?;
        debug!("deleted event {} from {}", event_id, calendar_id);
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    ProviderError::network(message).with_source(e)
}

/// Turns a non-success response into a [`ProviderError`] carrying the
/// status, Google's error message and any `Retry-After` seconds.
async fn check_status(
    response: reqwest::Response,
    operation: &str,
) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();
    let detail = api_error_message(&body).unwrap_or(body);

    let err = ProviderError::http(
        status.as_u16(),
        format!("{} returned {}: {}", operation, status, detail.trim()),
    )
    .with_retry_after(retry_after);

    debug!("{}", err);
    Err(err)
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> ProviderResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

    serde_json::from_str(&body)
        .map_err(|e| ProviderError::invalid_response(format!("failed to parse response: {}", e)))
}

/// Pulls `error.message` out of a Google error body.
fn api_error_message(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    parsed.error.message
}

fn convert_event(event: ApiEvent) -> Option<RemoteEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let id = event.id.filter(|id| !id.is_empty())?;
    let mut remote = RemoteEvent::new(id);
    remote.summary = event.summary;
    remote.html_link = event.html_link;
    remote.start = event.start.and_then(|t| t.parse());
    remote.end = event.end.and_then(|t| t.parse());
    Some(remote)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
    html_link: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl ApiEventTime {
    fn new(at: DateTime<FixedOffset>, time_zone: Option<&str>) -> Self {
        Self {
            date_time: Some(at.to_rfc3339()),
            time_zone: time_zone.map(String::from),
        }
    }

    /// All-day events carry no `dateTime` and yield `None`.
    fn parse(self) -> Option<DateTime<FixedOffset>> {
        let raw = self.date_time?;
        DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| warn!("failed to parse event time {:?}: {}", raw, e))
            .ok()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventRequest {
    summary: String,
    start: ApiEventTime,
    end: ApiEventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    color_id: Option<String>,
}

impl From<&NewEvent> for InsertEventRequest {
    fn from(event: &NewEvent) -> Self {
        let tz = event.time_zone.as_deref();
        Self {
            summary: event.summary.clone(),
            start: ApiEventTime::new(event.start, tz),
            end: ApiEventTime::new(event.end, tz),
            color_id: event.color_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}
