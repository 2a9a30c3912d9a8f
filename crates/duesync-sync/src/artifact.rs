//! JSON array files, replaced atomically.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Artifact, LogStoreError, StoreResult};

/// Writes `items` as a pretty-printed JSON array.
///
/// Content goes to a sibling temporary file first and is renamed over
/// `path`, so a failed write leaves the previous file intact.
pub(crate) fn write_array<T: Serialize>(
    artifact: Artifact,
    path: &Path,
    items: &[T],
) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| LogStoreError::io(artifact, parent, e))?;
    }

    let json = serde_json::to_string_pretty(items)
        .map_err(|e| LogStoreError::json(artifact, path, e))?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json).map_err(|e| LogStoreError::io(artifact, &temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| LogStoreError::io(artifact, path, e))?;

    debug!("wrote {} entries to {}", items.len(), path.display());
    Ok(())
}

/// Reads a JSON array written by [`write_array`].
pub(crate) fn read_array<T: DeserializeOwned>(artifact: Artifact, path: &Path) -> StoreResult<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| LogStoreError::io(artifact, path, e))?;
    let items: Vec<T> =
        serde_json::from_str(&content).map_err(|e| LogStoreError::json(artifact, path, e))?;

    debug!("read {} entries from {}", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_write_keeps_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        write_array(Artifact::EventLog, &path, &["a", "b"]).unwrap();

        // a directory squatting on the temp name makes the write fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();
        assert!(write_array(Artifact::EventLog, &path, &["c"]).is_err());

        let kept: Vec<String> = read_array(Artifact::EventLog, &path).unwrap();
        assert_eq!(kept, vec!["a", "b"]);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("nested").join("x.json");
        write_array::<u32>(Artifact::Deadlines, &path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let err = read_array::<String>(Artifact::Deadlines, &path).unwrap_err();
        assert!(matches!(err, LogStoreError::Json { .. }));
    }
}
