//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// duesync - Gradescope deadlines in your Google Calendar
#[derive(Debug, Parser)]
#[command(name = "duesync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DUESYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands. Without one, `sync` runs.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape deadlines, then upload them
    #[cfg(all(feature = "google", feature = "gradescope"))]
    Sync,

    /// Log in to Gradescope and write the deadlines file
    #[cfg(feature = "gradescope")]
    Scrape,

    /// Create calendar events for the deadlines file and rewrite the event log
    #[cfg(feature = "google")]
    Upload,

    /// Delete every event recorded in the event log
    #[cfg(feature = "google")]
    Delete,

    /// Authentication commands
    Auth {
        #[command(subcommand)]
        provider: AuthProvider,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Authentication providers.
#[derive(Debug, Subcommand)]
pub enum AuthProvider {
    /// Authenticate with Google Calendar
    #[cfg(feature = "google")]
    Google {
        /// OAuth client ID (from Google Cloud Console)
        #[arg(long, env = "GOOGLE_CLIENT_ID")]
        client_id: Option<String>,

        /// OAuth client secret (from Google Cloud Console)
        #[arg(long, env = "GOOGLE_CLIENT_SECRET")]
        client_secret: Option<String>,

        /// Path to the credentials JSON downloaded from Google Cloud Console
        #[arg(long, env = "GOOGLE_CREDENTIALS_FILE")]
        credentials_file: Option<PathBuf>,

        /// Drop stored tokens and ask for consent again
        #[arg(long, short)]
        force: bool,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
