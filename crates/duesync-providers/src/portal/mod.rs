//! Gradescope portal: form login and assignment deadline extraction.
//!
//! # Example
//!
//! ```ignore
//! use duesync_providers::portal::{PortalConfig, PortalSession, scrape_deadlines};
//!
//! let config = PortalConfig::new("me@uni.edu", password)?
//!     .with_course_ids(vec!["940384".into()]);
//! let session = PortalSession::login(&config).await?;
//! let report = scrape_deadlines(&session, &config.course_ids, &config.course_names).await?;
//! ```

// Expands to a lazily parsed static `Selector`. Callers import `Lazy` and `Selector`.
macro_rules! selector {
    ($name:ident, $query:expr) => {
        static $name: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
    };
}

mod config;
mod error;
mod extract;
mod session;

pub use config::PortalConfig;
pub use error::{PortalError, PortalResult};
pub use extract::{ScrapeReport, SkippedCourse, extract_deadlines, scrape_deadlines};
pub use session::{LOGIN_FAILED_MARKER, PortalSession};
