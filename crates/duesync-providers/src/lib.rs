//! External services for duesync.
//!
//! - [`CalendarService`]: the calendar boundary the sync pipelines use
//! - [`google`]: Google Calendar behind that boundary, with OAuth and token storage
//! - [`portal`]: Gradescope login and deadline extraction
//!
//! Both integrations are behind cargo features (`google`, `gradescope`),
//! enabled by default.

pub mod calendar;
pub mod error;

#[cfg(feature = "google")]
pub mod google;

#[cfg(feature = "gradescope")]
pub mod portal;

pub use calendar::{BoxFuture, CalendarService, EventQuery, NewEvent, RemoteEvent};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
