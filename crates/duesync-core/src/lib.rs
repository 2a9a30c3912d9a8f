//! Core types: deadlines, log records, course tables, time windows, tracing
//!
//! Everything in this crate is free of I/O: the portal scraper and the
//! calendar client live in `duesync-providers`, the upload/delete pipelines
//! in `duesync-sync`.

pub mod course;
pub mod deadline;
pub mod record;
pub mod time;
pub mod tracing;

pub use course::{CourseColors, CourseNames, DEFAULT_COLOR_ID, UNKNOWN_COURSE};
pub use deadline::{
    DEADLINE_FORMAT, NormalizeError, NormalizedDeadline, RawDeadline, normalize, normalize_all,
    summary_for,
};
pub use record::LogRecord;
pub use time::{EVENT_DURATION, TimeWindow};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
