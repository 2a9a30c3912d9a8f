//! duesync command-line client
//!
//! Loads `config.toml`, resolves secret references and runs the scrape,
//! upload, delete and auth commands on top of `duesync-providers` and
//! `duesync-sync`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
