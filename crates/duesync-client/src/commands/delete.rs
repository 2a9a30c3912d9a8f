//! `duesync delete`: remove every event recorded in the event log.

use std::path::PathBuf;

use duesync_core::LogRecord;
use duesync_providers::google::GoogleCalendar;
use duesync_sync::{DeleteOutcome, DeleteResult, EventLog, delete_logged};
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// What the event log holds before anything is deleted.
#[derive(Debug)]
enum Pending {
    NoLog(PathBuf),
    Empty,
    Records(Vec<LogRecord>),
}

/// Deletes the logged events. The log file itself is left in place.
///
/// A missing or empty log ends the command successfully without
/// authenticating against Google.
pub async fn run(config: &ClientConfig) -> ClientResult<()> {
    let log = EventLog::in_dir(config.output_dir());

    let records = match pending(&log)? {
        Pending::NoLog(path) => {
            println!("Log file not found: {}", path.display());
            return Ok(());
        }
        Pending::Empty => {
            println!("No events to delete.");
            return Ok(());
        }
        Pending::Records(records) => records,
    };

    let google = config.google_config().map_err(ClientError::Config)?;
    let calendar = GoogleCalendar::connect(google, true).await?;

    let report = delete_logged(&calendar, &records).await;
    for result in &report.results {
        println!("{}", describe(result));
    }
    info!(
        "delete finished: {} deleted, {} skipped, {} failed",
        report.deleted(),
        report.skipped(),
        report.failed()
    );

    Ok(())
}

fn pending(log: &EventLog) -> ClientResult<Pending> {
    match log.read() {
        Ok(records) if records.is_empty() => Ok(Pending::Empty),
        Ok(records) => Ok(Pending::Records(records)),
        Err(e) if e.is_not_found() => Ok(Pending::NoLog(log.path().to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

fn describe(result: &DeleteResult) -> String {
    let record = &result.record;
    match &result.outcome {
        DeleteOutcome::Deleted => {
            format!("Deleted event: {} ({})", record.event_name, record.course_name)
        }
        DeleteOutcome::SkippedMissingId => format!(
            "Skipping event with missing ID: {} ({})",
            record.event_name, record.course_name
        ),
        DeleteOutcome::Failed(error) => format!(
            "Failed to delete event: {} ({}). Error: {}",
            record.event_name, record.course_name, error
        ),
    }
}
