//! Sync pipelines for duesync.
//!
//! - [`upload`]: normalize scraped deadlines, reconcile them against the
//!   calendar and replace the [`EventLog`]
//! - [`delete_logged`]: delete every event the log knows about
//! - [`DeadlinesFile`]: the scrape output read by upload

mod artifact;
pub mod deadlines;
pub mod delete;
pub mod error;
pub mod log_store;
pub mod reconcile;
pub mod upload;

#[cfg(test)]
mod fake;

pub use deadlines::DeadlinesFile;
pub use delete::{DeleteOutcome, DeleteReport, DeleteResult, delete_logged};
pub use error::{Artifact, LogStoreError, StoreResult};
pub use log_store::EventLog;
pub use reconcile::{ReconcileOutcome, ReconcileReport, ReconcileResult, ReconcileStage, Reconciler};
pub use upload::{UploadReport, upload};
