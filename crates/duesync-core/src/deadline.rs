//! Assignment deadlines as scraped from the portal and after normalization.
//!
//! A [`RawDeadline`] carries the due date exactly as the portal printed it.
//! [`normalize`] turns it into a [`NormalizedDeadline`] with a timezone-aware
//! instant, or rejects it with [`NormalizeError::MalformedTimestamp`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::time::{EVENT_DURATION, TimeWindow};

/// The only due-date format the portal emits, e.g. `2024-03-01 23:59:00 -0800`.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// A deadline as scraped from a course page.
///
/// Serialized form is the deadlines file schema: `course_name`, `name`,
/// `deadline`. The course identifier only lives in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDeadline {
    /// Portal course identifier the deadline was scraped from.
    #[serde(skip)]
    pub course_id: String,
    /// Course display name.
    pub course_name: String,
    /// Assignment name.
    pub name: String,
    /// Due date text, unparsed.
    pub deadline: String,
}

impl RawDeadline {
    /// Creates a raw deadline.
    pub fn new(
        course_id: impl Into<String>,
        course_name: impl Into<String>,
        name: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            course_name: course_name.into(),
            name: name.into(),
            deadline: deadline.into(),
        }
    }
}

/// A deadline whose due instant has been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeadline {
    /// Course display name.
    pub course_name: String,
    /// Assignment name.
    pub name: String,
    /// Due instant, keeping the offset the portal reported.
    pub due: DateTime<FixedOffset>,
}

impl NormalizedDeadline {
    /// The event title and deduplication key, `"{course}: {assignment}"`.
    pub fn summary(&self) -> String {
        summary_for(&self.course_name, &self.name)
    }

    /// End of the calendar event created for this deadline.
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.due + EVENT_DURATION
    }

    /// The window an existing event must fall into to count as a duplicate.
    pub fn event_window(&self) -> TimeWindow {
        TimeWindow::for_deadline(self.due)
    }
}

/// Builds the summary string for a course/assignment pair.
pub fn summary_for(course_name: &str, assignment: &str) -> String {
    format!("{}: {}", course_name, assignment)
}

/// Reasons a raw deadline is dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The due-date text does not match [`DEADLINE_FORMAT`].
    #[error("malformed timestamp {text:?} for {course_name}: {name}")]
    MalformedTimestamp {
        course_name: String,
        name: String,
        text: String,
    },
}

/// Parses the due date of a single raw deadline.
pub fn normalize(raw: &RawDeadline) -> Result<NormalizedDeadline, NormalizeError> {
    let malformed = || NormalizeError::MalformedTimestamp {
        course_name: raw.course_name.clone(),
        name: raw.name.clone(),
        text: raw.deadline.clone(),
    };

    let due = DateTime::parse_from_str(&raw.deadline, DEADLINE_FORMAT).map_err(|e| {
        debug!(text = %raw.deadline, error = %e, "deadline text rejected");
        malformed()
    })?;

    // chrono skips whitespace loosely; only the exact portal layout is accepted.
    if due.format(DEADLINE_FORMAT).to_string() != raw.deadline {
        debug!(text = %raw.deadline, "deadline text is not in canonical layout");
        return Err(malformed());
    }

    Ok(NormalizedDeadline {
        course_name: raw.course_name.clone(),
        name: raw.name.clone(),
        due,
    })
}

/// Normalizes a batch, keeping input order.
///
/// Returns the parsed deadlines and the rejections. Every rejection is logged
/// with the course and assignment it belongs to.
pub fn normalize_all(raw: &[RawDeadline]) -> (Vec<NormalizedDeadline>, Vec<NormalizeError>) {
    let mut kept = Vec::with_capacity(raw.len());
    let mut dropped = Vec::new();

    for deadline in raw {
        match normalize(deadline) {
            Ok(normalized) => kept.push(normalized),
            Err(err) => {
                warn!(
                    course = %deadline.course_name,
                    assignment = %deadline.name,
                    text = %deadline.deadline,
                    "skipping deadline with invalid date format"
                );
                dropped.push(err);
            }
        }
    }

    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(deadline: &str) -> RawDeadline {
        RawDeadline::new("940384", "MAT 111", "HW1", deadline)
    }

    #[test]
    fn parses_portal_format() {
        let normalized = normalize(&raw("2024-03-01 23:59:00 -0800")).unwrap();
        let expected = FixedOffset::west_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 23, 59, 0)
            .unwrap();
        assert_eq!(normalized.due, expected);
        assert_eq!(normalized.due.to_rfc3339(), "2024-03-01T23:59:00-08:00");
        assert_eq!(normalized.summary(), "MAT 111: HW1");
        assert_eq!(normalized.end().to_rfc3339(), "2024-03-02T00:59:00-08:00");
    }

    #[test]
    fn keeps_reported_offset() {
        let normalized = normalize(&raw("2024-07-10 09:00:00 +0530")).unwrap();
        assert_eq!(normalized.due.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn rejects_free_text() {
        let err = normalize(&raw("March 1st")).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MalformedTimestamp {
                course_name: "MAT 111".to_string(),
                name: "HW1".to_string(),
                text: "March 1st".to_string(),
            }
        );
        assert!(err.to_string().contains("MAT 111: HW1"));
    }

    #[test]
    fn rejects_other_datetime_formats() {
        for text in [
            "2024-03-01T23:59:00-08:00",
            "2024-03-01 23:59:00",
            "2024-03-01 23:59 -0800",
            "03/01/2024 23:59:00 -0800",
            "2024-03-0123:59:00-0800",
            " 2024-03-01 23:59:00 -0800",
            "2024-03-01 23:59:00 -0800 ",
            "2024-03-01  23:59:00 -0800",
            "",
        ] {
            assert!(normalize(&raw(text)).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn normalize_all_drops_only_malformed() {
        let input = vec![
            raw("2024-03-01 23:59:00 -0800"),
            RawDeadline::new("933351", "MAT 145", "Quiz", "March 1st"),
            RawDeadline::new("933351", "MAT 145", "HW2", "2024-03-05 17:00:00 -0800"),
        ];

        let (kept, dropped) = normalize_all(&input);

        assert!(kept.len() <= input.len());
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].name, "HW1");
        assert_eq!(kept[1].name, "HW2");
        assert_eq!(dropped.len(), 1);

        // every dropped element fails the parser on its own
        for NormalizeError::MalformedTimestamp { text, .. } in &dropped {
            assert!(DateTime::parse_from_str(text, DEADLINE_FORMAT).is_err());
        }
    }

    #[test]
    fn deadlines_file_schema() {
        let json = serde_json::to_value(raw("2024-03-01 23:59:00 -0800")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "course_name": "MAT 111",
                "name": "HW1",
                "deadline": "2024-03-01 23:59:00 -0800"
            })
        );

        let parsed: RawDeadline = serde_json::from_value(json).unwrap();
        assert!(parsed.course_id.is_empty());
        assert_eq!(parsed.name, "HW1");
    }

    #[test]
    fn event_window_spans_one_hour() {
        let normalized = normalize(&raw("2024-03-01 23:59:00 -0800")).unwrap();
        let window = normalized.event_window();
        assert_eq!(window.start, normalized.due);
        assert_eq!(window.end, normalized.end());
    }
}
