//! CalendarService trait definition.
//!
//! The upload and delete pipelines only talk to the calendar through this
//! trait: a filtered search, an insert and a delete. Implementations are
//! handed out already authenticated.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, FixedOffset};
use duesync_core::TimeWindow;

use crate::error::ProviderResult;

/// A boxed future, used so the trait stays object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Server-side filter for event searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Events intersecting this window are returned.
    pub window: TimeWindow,
    /// Free-text query; the service may match more loosely than equality.
    pub text: Option<String>,
    /// Whether to expand recurring events into instances.
    pub single_events: bool,
}

impl EventQuery {
    /// Creates a query for the given window.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            text: None,
            single_events: true,
        }
    }

    /// Builder method to set the text query.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method to toggle recurring event expansion.
    pub fn with_single_events(mut self, single_events: bool) -> Self {
        self.single_events = single_events;
        self
    }
}

/// An event to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Color/category tag.
    pub color_id: Option<String>,
    /// IANA time zone the calendar UI should display the event in.
    pub time_zone: Option<String>,
}

impl NewEvent {
    /// Creates an event spanning `[start, end)`.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
            color_id: None,
            time_zone: None,
        }
    }

    pub fn with_color(mut self, color_id: impl Into<String>) -> Self {
        self.color_id = Some(color_id.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

/// An event as stored by the calendar service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    /// Remote event identifier.
    pub id: String,
    pub summary: Option<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    /// Browser link to the event.
    pub html_link: Option<String>,
}

impl RemoteEvent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: None,
            start: None,
            end: None,
            html_link: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_times(mut self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }

    /// True if the summary equals `summary` exactly.
    pub fn has_summary(&self, summary: &str) -> bool {
        self.summary.as_deref() == Some(summary)
    }
}

/// A calendar the pipelines can search, insert into and delete from.
///
/// Every method issues exactly one logical remote operation (pagination of a
/// single search aside) and never retries.
pub trait CalendarService: Send + Sync {
    /// Returns the name of this calendar (e.g., "google:primary").
    fn name(&self) -> &str;

    /// Lists events matching the query.
    fn search_events(&self, query: EventQuery) -> BoxFuture<'_, ProviderResult<Vec<RemoteEvent>>>;

    /// Creates an event and returns it as stored remotely.
    fn insert_event(&self, event: NewEvent) -> BoxFuture<'_, ProviderResult<RemoteEvent>>;

    /// Deletes the event with the given identifier.
    fn delete_event<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<()>>;
}
