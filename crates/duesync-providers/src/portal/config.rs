//! Portal connection settings.

use std::fmt;
use std::time::Duration;

use duesync_core::CourseNames;
use url::Url;

use super::error::PortalResult;

/// Settings for logging in to the portal and scraping courses.
#[derive(Clone)]
pub struct PortalConfig {
    /// Portal root, always ending in `/`.
    pub base_url: Url,
    pub username: String,
    pub password: String,
    /// Courses to scrape, in order.
    pub course_ids: Vec<String>,
    /// Display names for course ids.
    pub course_names: CourseNames,
    /// Upper bound on loading a single course page.
    pub load_timeout: Duration,
    /// Timeout for the login requests.
    pub request_timeout: Duration,
}

impl PortalConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.gradescope.com/";
    pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 20;
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> PortalResult<Self> {
        Ok(Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL)?,
            username: username.into(),
            password: password.into(),
            course_ids: Vec::new(),
            course_names: CourseNames::default(),
            load_timeout: Duration::from_secs(Self::DEFAULT_LOAD_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(Self::DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    /// Sets the portal root. A missing trailing `/` is added so relative
    /// paths resolve below it.
    pub fn with_base_url(mut self, base_url: &str) -> PortalResult<Self> {
        let mut url = Url::parse(base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn with_course_ids(mut self, ids: Vec<String>) -> Self {
        self.course_ids = ids;
        self
    }

    pub fn with_course_names(mut self, names: CourseNames) -> Self {
        self.course_names = names;
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("portal username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("portal password is required".to_string());
        }
        if self.course_ids.is_empty() {
            return Err("at least one course id is required".to_string());
        }
        if self.load_timeout.is_zero() {
            return Err("course load timeout must be positive".to_string());
        }
        Ok(())
    }
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("course_ids", &self.course_ids)
            .field("load_timeout", &self.load_timeout)
            .finish()
    }
}
