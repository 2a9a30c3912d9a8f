//! Client configuration.
//!
//! All settings live in a single `config.toml`, by default at
//! `~/.config/duesync/config.toml`:
//!
//! ```toml
//! [portal]
//! username = "me@ucdavis.edu"
//! password = "pass::school/gradescope"
//! course_ids = ["940384", "933351"]
//!
//! [courses.names]
//! "940384" = "MAT 111"
//!
//! [courses.colors]
//! "MAT 111" = "8"
//!
//! [google]
//! client_id = "xxx.apps.googleusercontent.com"
//! client_secret = "env::GOOGLE_CLIENT_SECRET"
//! ```
//!
//! Credential values accept secret references (see [`crate::secret`]).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use duesync_core::{CourseColors, CourseNames};
use serde::{Deserialize, Serialize};

use crate::secret;

/// Configuration for the duesync client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gradescope login and the courses to scrape.
    #[cfg(feature = "gradescope")]
    pub portal: Option<PortalSettings>,

    /// Course display names and colors.
    pub courses: CourseSettings,

    /// Google Calendar settings.
    #[cfg(feature = "google")]
    pub google: Option<GoogleSettings>,

    /// Where the deadlines file and the event log are kept.
    pub output: OutputSettings,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is absent.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("duesync")
            .join("config.toml")
    }

    /// Returns the default directory for the deadlines file and event log.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("duesync")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output
            .directory
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Builds the portal configuration, resolving secret references.
    #[cfg(feature = "gradescope")]
    pub fn portal_config(&self) -> Result<duesync_providers::portal::PortalConfig, String> {
        let portal = self.portal.as_ref().ok_or_else(|| {
            format!(
                "no [portal] section in {}; add username, password and course_ids",
                Self::default_path().display()
            )
        })?;
        portal.to_provider_config(&self.courses)
    }

    /// Builds the Google configuration, resolving secret references.
    #[cfg(feature = "google")]
    pub fn google_config(&self) -> Result<duesync_providers::google::GoogleConfig, String> {
        let google = self.google.as_ref().ok_or_else(missing_google_credentials)?;
        google.to_provider_config()
    }
}

// ---------------------------------------------------------------------------
// [portal]
// ---------------------------------------------------------------------------

#[cfg(feature = "gradescope")]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    /// Login email (supports `pass::` and `env::` prefixes).
    pub username: Option<String>,

    /// Login password (supports `pass::` and `env::` prefixes).
    pub password: Option<String>,

    /// Course ids to scrape, in order.
    pub course_ids: Vec<String>,

    /// Portal root URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Seconds to wait for a course page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_timeout_secs: Option<u64>,
}

#[cfg(feature = "gradescope")]
impl PortalSettings {
    pub fn to_provider_config(
        &self,
        courses: &CourseSettings,
    ) -> Result<duesync_providers::portal::PortalConfig, String> {
        use duesync_providers::portal::PortalConfig;
        use std::time::Duration;

        let username = resolve_field(self.username.as_deref(), "portal", "username")?;
        let password = resolve_field(self.password.as_deref(), "portal", "password")?;

        let mut config = PortalConfig::new(username, password)
            .map_err(|e| e.to_string())?
            .with_course_ids(self.course_ids.clone())
            .with_course_names(courses.course_names());

        if let Some(ref base_url) = self.base_url {
            config = config
                .with_base_url(base_url)
                .map_err(|e| format!("invalid portal base_url: {}", e))?;
        }
        if let Some(secs) = self.load_timeout_secs {
            config = config.with_load_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// [courses]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSettings {
    /// Portal course id to display name.
    pub names: BTreeMap<String, String>,

    /// Display name to Google color id ("1" to "11").
    pub colors: BTreeMap<String, String>,

    /// Color id for courses missing from `colors`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
}

impl CourseSettings {
    pub fn course_names(&self) -> CourseNames {
        self.names
            .iter()
            .fold(CourseNames::new(), |names, (id, name)| names.with(id, name))
    }

    pub fn course_colors(&self) -> CourseColors {
        let colors = self
            .colors
            .iter()
            .fold(CourseColors::default(), |colors, (name, id)| {
                colors.with(name, id)
            });
        match self.default_color {
            Some(ref color) => colors.with_default(color),
            None => colors,
        }
    }
}

// ---------------------------------------------------------------------------
// [google]
// ---------------------------------------------------------------------------

/// Google Calendar settings.
///
/// Credentials come from `client_id`/`client_secret` when both are set,
/// otherwise from `credentials_file`.
#[cfg(feature = "google")]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// OAuth client ID (supports `pass::` and `env::` prefixes).
    pub client_id: Option<String>,

    /// OAuth client secret (supports `pass::` and `env::` prefixes).
    pub client_secret: Option<String>,

    /// Credentials JSON downloaded from Google Cloud Console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,

    /// Calendar to write to; `primary` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,

    /// Time zone for created events. An empty string leaves it to the calendar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Path to token storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

#[cfg(feature = "google")]
impl GoogleSettings {
    /// Converts to provider configuration.
    pub fn to_provider_config(&self) -> Result<duesync_providers::google::GoogleConfig, String> {
        use duesync_providers::google::GoogleConfig;

        let mut config = GoogleConfig::new(self.resolve_credentials()?);

        if let Some(ref id) = self.calendar_id {
            config = config.with_calendar_id(id);
        }
        if let Some(ref tz) = self.time_zone {
            let tz = tz.trim();
            config = config.with_time_zone((!tz.is_empty()).then(|| tz.to_string()));
        }
        if let Some(ref path) = self.token_path {
            config = config.with_token_path(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolves the OAuth client from inline fields or the credentials file.
    pub(crate) fn resolve_credentials(
        &self,
    ) -> Result<duesync_providers::google::OAuthCredentials, String> {
        use duesync_providers::google::OAuthCredentials;

        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => {
                let id = secret::resolve(id).map_err(|e| format!("failed to resolve client_id: {}", e))?;
                let secret = secret::resolve(secret)
                    .map_err(|e| format!("failed to resolve client_secret: {}", e))?;
                Ok(OAuthCredentials::new(id, secret))
            }
            (Some(_), None) => {
                Err("client_secret is missing from [google] section in config.toml".to_string())
            }
            (None, Some(_)) => {
                Err("client_id is missing from [google] section in config.toml".to_string())
            }
            (None, None) => match self.credentials_file {
                Some(ref path) => OAuthCredentials::from_file(path)
                    .map_err(|e| format!("failed to load {}: {}", path.display(), e)),
                None => Err(missing_google_credentials()),
            },
        }
    }
}

#[cfg(feature = "google")]
fn missing_google_credentials() -> String {
    format!(
        "Google credentials not found. Add to {}:\n  \
         [google]\n  \
         client_id = \"YOUR_ID.apps.googleusercontent.com\"\n  \
         client_secret = \"YOUR_SECRET\"\n\n  \
         Or run: duesync auth google --credentials-file <path>",
        ClientConfig::default_path().display()
    )
}

// ---------------------------------------------------------------------------
// [output]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory holding `deadlines.json` and `event_log.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[cfg(feature = "gradescope")]
fn resolve_field(value: Option<&str>, section: &str, field: &str) -> Result<String, String> {
    let raw = value.ok_or_else(|| format!("{} is missing from [{}] section", field, section))?;
    secret::resolve(raw).map_err(|e| format!("failed to resolve {}: {}", field, e))
}
