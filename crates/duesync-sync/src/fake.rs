//! In-memory calendar for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use duesync_providers::{
    BoxFuture, CalendarService, EventQuery, NewEvent, ProviderError, ProviderResult, RemoteEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(EventQuery),
    Insert(NewEvent),
    Delete(String),
}

/// Search matches on substring, like the real service's free-text query.
#[derive(Default)]
pub struct FakeCalendar {
    events: Mutex<Vec<RemoteEvent>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<u32>,
    failing_searches: HashSet<String>,
    failing_inserts: HashSet<String>,
    failing_deletes: HashMap<String, fn(String) -> ProviderError>,
    blank_insert_ids: bool,
}

impl FakeCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(self, event: RemoteEvent) -> Self {
        self.events.lock().unwrap().push(event);
        self
    }

    pub fn failing_search(mut self, summary: &str) -> Self {
        self.failing_searches.insert(summary.to_string());
        self
    }

    pub fn failing_insert(mut self, summary: &str) -> Self {
        self.failing_inserts.insert(summary.to_string());
        self
    }

    pub fn failing_delete(mut self, id: &str, error: fn(String) -> ProviderError) -> Self {
        self.failing_deletes.insert(id.to_string(), error);
        self
    }

    pub fn with_blank_insert_ids(mut self) -> Self {
        self.blank_insert_ids = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inserts(&self) -> Vec<NewEvent> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Insert(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<RemoteEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CalendarService for FakeCalendar {
    fn name(&self) -> &str {
        "fake"
    }

    fn search_events(&self, query: EventQuery) -> BoxFuture<'_, ProviderResult<Vec<RemoteEvent>>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Search(query.clone()));

            let text = query.text.clone().unwrap_or_default();
            if self.failing_searches.contains(&text) {
                return Err(ProviderError::server("search exploded"));
            }

            Ok(self
                .events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.summary.as_deref().unwrap_or("").contains(&text))
                .filter(|e| match (e.start, e.end) {
                    (Some(start), Some(end)) => query.window.overlaps(start, end),
                    _ => true,
                })
                .cloned()
                .collect())
        })
    }

    fn insert_event(&self, event: NewEvent) -> BoxFuture<'_, ProviderResult<RemoteEvent>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(Call::Insert(event.clone()));

            if self.failing_inserts.contains(&event.summary) {
                return Err(ProviderError::rate_limited("slow down"));
            }

            let id = if self.blank_insert_ids {
                String::new()
            } else {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                format!("evt{}", *next)
            };

            let created = RemoteEvent::new(&id)
                .with_summary(&event.summary)
                .with_times(event.start, event.end)
                .with_html_link(format!("https://calendar.test/event?eid={}", id));
            self.events.lock().unwrap().push(created.clone());
            Ok(created)
        })
    }

    fn delete_event<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Delete(event_id.to_string()));

            if let Some(error) = self.failing_deletes.get(event_id) {
                return Err(error(format!("cannot delete {}", event_id)));
            }

            let mut events = self.events.lock().unwrap();
            let before = events.len();
            events.retain(|e| e.id != event_id);
            if events.len() == before {
                return Err(ProviderError::not_found(format!("{} is gone", event_id)));
            }
            Ok(())
        })
    }
}
