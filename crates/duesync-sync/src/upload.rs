//! The upload run: normalize, reconcile, replace the event log.

use duesync_core::{NormalizeError, RawDeadline, normalize_all};

use crate::error::StoreResult;
use crate::log_store::EventLog;
use crate::reconcile::{ReconcileReport, Reconciler};

#[derive(Debug, Default)]
pub struct UploadReport {
    /// Deadlines dropped because their due date didn't parse.
    pub rejected: Vec<NormalizeError>,
    pub reconcile: ReconcileReport,
}

/// Uploads scraped deadlines and writes the created events to `log`.
///
/// The log is replaced even when nothing was created. Only a failure to
/// write it is an error; per-deadline problems land in the report.
pub async fn upload(
    deadlines: &[RawDeadline],
    reconciler: &Reconciler<'_>,
    log: &EventLog,
) -> StoreResult<UploadReport> {
    let (normalized, rejected) = normalize_all(deadlines);
    let reconcile = reconciler.reconcile_all(&normalized).await;

    log.write(&reconcile.records())?;

    Ok(UploadReport {
        rejected,
        reconcile,
    })
}
