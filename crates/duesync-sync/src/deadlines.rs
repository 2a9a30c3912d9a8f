//! The deadlines file handed from `scrape` to `upload`.

use std::path::{Path, PathBuf};

use duesync_core::RawDeadline;

use crate::artifact::{read_array, write_array};
use crate::error::{Artifact, StoreResult};

#[derive(Debug, Clone)]
pub struct DeadlinesFile {
    path: PathBuf,
}

impl DeadlinesFile {
    pub const FILE_NAME: &'static str = "deadlines.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, deadlines: &[RawDeadline]) -> StoreResult<()> {
        write_array(Artifact::Deadlines, &self.path, deadlines)
    }

    /// Reads the scraped deadlines. Course ids are not stored and come back empty.
    pub fn read(&self) -> StoreResult<Vec<RawDeadline>> {
        read_array(Artifact::Deadlines, &self.path)
    }
}
