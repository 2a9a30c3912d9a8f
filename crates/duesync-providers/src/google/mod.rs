//! Google Calendar implementation of [`CalendarService`](crate::CalendarService).
//!
//! # Authentication
//!
//! 1. The user registers their own OAuth client (Google requires one)
//! 2. Stored tokens are loaded from the token file and classified
//! 3. Expired tokens are refreshed with the stored refresh token
//! 4. Otherwise the browser is opened on Google's consent page and the
//!    redirect lands on a loopback listener (PKCE)
//! 5. New tokens are persisted for the next run
//!
//! # Example
//!
//! ```ignore
//! use duesync_providers::google::{GoogleCalendar, GoogleConfig, OAuthCredentials};
//!
//! let credentials = OAuthCredentials::from_file("credentials.json")?;
//! let calendar = GoogleCalendar::connect(GoogleConfig::new(credentials), true).await?;
//! ```

mod auth;
mod calendar;
mod client;
mod config;
mod oauth;
mod tokens;

pub use auth::GoogleAuth;
pub use calendar::GoogleCalendar;
pub use client::GoogleCalendarClient;
pub use config::{GoogleConfig, OAuthCredentials};
pub use oauth::{OAuthClient, PkceFlow};
pub use tokens::{AuthState, TokenInfo, TokenStorage};
