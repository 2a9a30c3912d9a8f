//! Event log records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::deadline::{NormalizedDeadline, summary_for};

/// Links a deadline to the calendar event created for it.
///
/// One record exists per event created in the most recent upload run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Course display name.
    pub course_name: String,
    /// Assignment name.
    pub event_name: String,
    /// Start of the created event.
    pub start_time: DateTime<FixedOffset>,
    /// Remote event identifier.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Browser link to the event.
    #[serde(default)]
    pub event_link: Option<String>,
}

impl LogRecord {
    /// Creates a record for a deadline whose event was created remotely.
    pub fn created(
        deadline: &NormalizedDeadline,
        event_id: impl Into<String>,
        event_link: Option<String>,
    ) -> Self {
        Self {
            course_name: deadline.course_name.clone(),
            event_name: deadline.name.clone(),
            start_time: deadline.due,
            event_id: Some(event_id.into()),
            event_link,
        }
    }

    /// The event id, if present and non-empty.
    pub fn remote_id(&self) -> Option<&str> {
        self.event_id.as_deref().filter(|id| !id.is_empty())
    }

    /// `"{course}: {assignment}"`, as shown in the calendar.
    pub fn summary(&self) -> String {
        summary_for(&self.course_name, &self.event_name)
    }
}
