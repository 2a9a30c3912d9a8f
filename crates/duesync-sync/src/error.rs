//! Errors for the on-disk artifacts (deadlines file and event log).

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for artifact reads and writes.
pub type StoreResult<T> = Result<T, LogStoreError>;

/// Which artifact an error is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Deadlines,
    EventLog,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deadlines => "deadlines file",
            Self::EventLog => "event log",
        })
    }
}

/// Errors reading or writing an artifact file.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// The file does not exist.
    #[error("{artifact} not found at {}", path.display())]
    NotFound { artifact: Artifact, path: PathBuf },

    /// Filesystem error.
    #[error("failed to access {artifact} at {}: {source}", path.display())]
    Io {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but isn't the expected JSON.
    #[error("malformed {artifact} at {}: {source}", path.display())]
    Json {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LogStoreError {
    pub(crate) fn io(artifact: Artifact, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound {
                artifact,
                path: path.to_path_buf(),
            };
        }
        Self::Io {
            artifact,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(artifact: Artifact, path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            artifact,
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the artifact simply hasn't been written yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn artifact(&self) -> Artifact {
        match self {
            Self::NotFound { artifact, .. }
            | Self::Io { artifact, .. }
            | Self::Json { artifact, .. } => *artifact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_from_io_kind() {
        let err = LogStoreError::io(
            Artifact::EventLog,
            Path::new("/tmp/out/event_log.json"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "event log not found at /tmp/out/event_log.json");

        let denied = LogStoreError::io(
            Artifact::Deadlines,
            Path::new("d.json"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(!denied.is_not_found());
        assert_eq!(denied.artifact(), Artifact::Deadlines);
    }
}
