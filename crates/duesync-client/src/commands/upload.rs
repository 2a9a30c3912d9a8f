//! `duesync upload`: turn the deadlines file into calendar events.

use duesync_core::NormalizeError;
use duesync_providers::google::GoogleCalendar;
use duesync_sync::{DeadlinesFile, EventLog, ReconcileOutcome, ReconcileResult, Reconciler, UploadReport, upload};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Uploads the deadlines file and replaces the event log.
///
/// The browser is opened for consent when no usable token is stored.
pub async fn run(config: &ClientConfig) -> ClientResult<()> {
    let output_dir = config.output_dir();
    let deadlines = DeadlinesFile::in_dir(&output_dir).read()?;
    let google = config.google_config().map_err(ClientError::Config)?;
    let time_zone = google.time_zone.clone();

    let calendar = GoogleCalendar::connect(google, true).await?;
    let colors = config.courses.course_colors();
    let reconciler = Reconciler::new(&calendar, &colors).with_time_zone(time_zone);
    let log = EventLog::in_dir(&output_dir);

    let report = upload(&deadlines, &reconciler, &log).await?;
    for line in report_lines(&report) {
        println!("{}", line);
    }
    info!(
        "upload finished: {} created, {} duplicate(s), {} failed, {} rejected",
        report.reconcile.created(),
        report.reconcile.duplicates(),
        report.reconcile.failed(),
        report.rejected.len()
    );
    println!("Event log saved to {}", log.path().display());

    Ok(())
}

fn report_lines(report: &UploadReport) -> Vec<String> {
    report
        .rejected
        .iter()
        .map(describe_rejected)
        .chain(report.reconcile.results.iter().map(describe))
        .collect()
}

fn describe_rejected(error: &NormalizeError) -> String {
    match error {
        NormalizeError::MalformedTimestamp { text, .. } => {
            format!("Skipping event due to invalid date format: {}", text)
        }
    }
}

fn describe(result: &ReconcileResult) -> String {
    match &result.outcome {
        ReconcileOutcome::Created(record) => format!(
            "Event added: {}",
            record.event_link.as_deref().unwrap_or(&result.summary)
        ),
        ReconcileOutcome::SkippedDuplicate => {
            format!("Duplicate event skipped: {}", result.summary)
        }
        ReconcileOutcome::Failed { stage, error } => format!(
            "Failed to add event: {} ({} failed). Error: {}",
            result.summary, stage, error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duesync_core::LogRecord;
    use duesync_providers::ProviderError;
    use duesync_sync::{ReconcileReport, ReconcileStage};

    fn result(outcome: ReconcileOutcome) -> ReconcileResult {
        ReconcileResult {
            summary: "MAT 111: HW1".to_string(),
            outcome,
        }
    }

    fn record(link: Option<&str>) -> LogRecord {
        LogRecord {
            course_name: "MAT 111".to_string(),
            event_name: "HW1".to_string(),
            start_time: "2024-03-01T23:59:00-08:00".parse().unwrap(),
            event_id: Some("evt1".to_string()),
            event_link: link.map(String::from),
        }
    }

    #[test]
    fn created_prints_link_or_summary() {
        let linked = result(ReconcileOutcome::Created(record(Some(
            "https://www.google.com/calendar/event?eid=abc",
        ))));
        assert_eq!(
            describe(&linked),
            "Event added: https://www.google.com/calendar/event?eid=abc"
        );

        let bare = result(ReconcileOutcome::Created(record(None)));
        assert_eq!(describe(&bare), "Event added: MAT 111: HW1");
    }

    #[test]
    fn duplicate_and_failure_lines() {
        assert_eq!(
            describe(&result(ReconcileOutcome::SkippedDuplicate)),
            "Duplicate event skipped: MAT 111: HW1"
        );

        let failed = describe(&result(ReconcileOutcome::Failed {
            stage: ReconcileStage::Insert,
            error: ProviderError::rate_limited("quota"),
        }));
        assert!(failed.starts_with("Failed to add event: MAT 111: HW1 (insert failed). Error: "));
        assert!(failed.contains("quota"));
    }

    #[test]
    fn rejected_deadlines_listed_first() {
        let report = UploadReport {
            rejected: vec![NormalizeError::MalformedTimestamp {
                course_name: "MAT 111".to_string(),
                name: "HW2".to_string(),
                text: "March 1st".to_string(),
            }],
            reconcile: ReconcileReport {
                results: vec![result(ReconcileOutcome::SkippedDuplicate)],
            },
        };
        assert_eq!(
            report_lines(&report),
            vec![
                "Skipping event due to invalid date format: March 1st".to_string(),
                "Duplicate event skipped: MAT 111: HW1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_deadlines_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.output.directory = Some(tmp.path().to_path_buf());

        match run(&config).await {
            Err(ClientError::Store(e)) => assert!(e.is_not_found()),
            other => panic!("expected missing deadlines file, got {:?}", other),
        }
    }
}
