//! Time windows for calendar queries.

use chrono::{DateTime, Duration, FixedOffset};

/// Length of every calendar event created for a deadline.
pub const EVENT_DURATION: Duration = Duration::hours(1);

/// A half-open interval `[start, end)` for querying calendar events.
///
/// The offsets of the bounds are kept so queries carry the same offset the
/// portal reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// The one-hour window of an event created for a deadline due at `due`.
    pub fn for_deadline(due: DateTime<FixedOffset>) -> Self {
        Self {
            start: due,
            end: due + EVENT_DURATION,
        }
    }

    /// Checks if an event spanning `[event_start, event_end)` intersects this window.
    pub fn overlaps(&self, event_start: DateTime<FixedOffset>, event_end: DateTime<FixedOffset>) -> bool {
        event_start < self.end && event_end > self.start
    }
}
