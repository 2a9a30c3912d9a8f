//! Subcommand implementations.
//!
//! Commands print their per-item progress on stdout; diagnostics go through
//! `tracing`.

#[cfg(feature = "google")]
pub mod auth;
pub mod config;
#[cfg(feature = "google")]
pub mod delete;
#[cfg(feature = "gradescope")]
pub mod scrape;
#[cfg(all(feature = "google", feature = "gradescope"))]
pub mod sync;
#[cfg(feature = "google")]
pub mod upload;
