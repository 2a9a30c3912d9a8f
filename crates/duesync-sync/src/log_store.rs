//! Event log: the record of events created by the last upload run.

use std::path::{Path, PathBuf};

use duesync_core::LogRecord;

use crate::artifact::{read_array, write_array};
use crate::error::{Artifact, StoreResult};

/// File-backed event log.
///
/// Each upload run replaces the whole log; there is no history across runs.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub const FILE_NAME: &'static str = "event_log.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log at its usual name inside an output directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replaces the log with `records`, in order.
    pub fn write(&self, records: &[LogRecord]) -> StoreResult<()> {
        write_array(Artifact::EventLog, &self.path, records)
    }

    /// Reads every record, in the order written.
    ///
    /// A missing file is [`LogStoreError::NotFound`](crate::LogStoreError::NotFound).
    pub fn read(&self) -> StoreResult<Vec<LogRecord>> {
        read_array(Artifact::EventLog, &self.path)
    }
}
