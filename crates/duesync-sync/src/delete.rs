//! Bulk delete of the events recorded in the event log.

use duesync_core::LogRecord;
use duesync_providers::{CalendarService, ProviderError};
use tracing::{debug, info, warn};

/// What happened to one log record.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    /// The record has no remote id; nothing was sent.
    SkippedMissingId,
    /// The delete call failed, including for events already gone.
    Failed(ProviderError),
}

#[derive(Debug)]
pub struct DeleteResult {
    pub record: LogRecord,
    pub outcome: DeleteOutcome,
}

/// Per-record results, in log order.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub results: Vec<DeleteResult>,
}

impl DeleteReport {
    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::Deleted))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::SkippedMissingId))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&DeleteOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Deletes every logged event that has a remote id.
///
/// Every record is attempted regardless of earlier failures. The log itself
/// is not modified.
pub async fn delete_logged(calendar: &dyn CalendarService, records: &[LogRecord]) -> DeleteReport {
    let mut report = DeleteReport::default();

    for record in records {
        let outcome = match record.remote_id() {
            None => {
                warn!(
                    "skipping event with missing id: {} ({})",
                    record.event_name, record.course_name
                );
                DeleteOutcome::SkippedMissingId
            }
            Some(id) => match calendar.delete_event(id).await {
                Ok(()) => {
                    info!("deleted event: {} ({})", record.event_name, record.course_name);
                    DeleteOutcome::Deleted
                }
                Err(error) => {
                    warn!(
                        "failed to delete event: {} ({}): {}",
                        record.event_name, record.course_name, error
                    );
                    DeleteOutcome::Failed(error)
                }
            },
        };

        report.results.push(DeleteResult {
            record: record.clone(),
            outcome,
        });
    }

    debug!(
        "delete run on {}: {} deleted, {} skipped, {} failed",
        calendar.name(),
        report.deleted(),
        report.skipped(),
        report.failed()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeCalendar};
    use chrono::DateTime;
    use duesync_providers::{ProviderErrorCode, RemoteEvent};

    fn record(name: &str, id: Option<&str>) -> LogRecord {
        LogRecord {
            course_name: "MAT 111".to_string(),
            event_name: name.to_string(),
            start_time: DateTime::parse_from_rfc3339("2024-03-01T23:59:00-08:00").unwrap(),
            event_id: id.map(String::from),
            event_link: None,
        }
    }

    #[tokio::test]
    async fn missing_id_skipped_and_failure_does_not_halt() {
        let calendar = FakeCalendar::new()
            .with_event(RemoteEvent::new("y"))
            .failing_delete("x", |m| ProviderError::server(m));

        let records = vec![record("HW1", None), record("HW2", Some("x")), record("HW3", Some("y"))];
        let report = delete_logged(&calendar, &records).await;

        assert_eq!(report.results.len(), 3);
        assert!(matches!(report.results[0].outcome, DeleteOutcome::SkippedMissingId));
        assert!(matches!(report.results[1].outcome, DeleteOutcome::Failed(_)));
        assert!(matches!(report.results[2].outcome, DeleteOutcome::Deleted));

        // both ids attempted, nothing sent for the record without one
        assert_eq!(
            calendar.calls(),
            vec![Call::Delete("x".to_string()), Call::Delete("y".to_string())]
        );
        assert_eq!((report.deleted(), report.skipped(), report.failed()), (1, 1, 1));
    }

    #[tokio::test]
    async fn empty_id_counts_as_missing() {
        let calendar = FakeCalendar::new();
        let report = delete_logged(&calendar, &[record("HW1", Some(""))]).await;

        assert_eq!(report.skipped(), 1);
        assert!(calendar.calls().is_empty());
    }

    #[tokio::test]
    async fn already_deleted_event_is_reported_not_found() {
        let calendar = FakeCalendar::new().with_event(RemoteEvent::new("a"));
        let records = vec![record("HW1", Some("a"))];

        let first = delete_logged(&calendar, &records).await;
        assert_eq!(first.deleted(), 1);

        let second = delete_logged(&calendar, &records).await;
        match &second.results[0].outcome {
            DeleteOutcome::Failed(error) => assert_eq!(error.code(), ProviderErrorCode::NotFound),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn results_keep_log_order() {
        let calendar = FakeCalendar::new()
            .with_event(RemoteEvent::new("a"))
            .with_event(RemoteEvent::new("b"));
        let records = vec![record("second", Some("b")), record("first", Some("a"))];

        let report = delete_logged(&calendar, &records).await;
        let names: Vec<&str> = report
            .results
            .iter()
            .map(|r| r.record.event_name.as_str())
            .collect();
        assert_eq!(names, vec!["second", "first"]);
        assert!(calendar.events().is_empty());
    }
}
