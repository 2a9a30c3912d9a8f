//! `duesync sync` (the default command): scrape, then upload.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientResult;

use super::{scrape, upload};

/// Runs a scrape and uploads its output. A failed scrape uploads nothing.
pub async fn run(config: &ClientConfig) -> ClientResult<()> {
    let file = scrape::run(config).await?;
    debug!("uploading {}", file.path().display());
    upload::run(config).await
}
