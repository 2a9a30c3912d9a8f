//! Errors raised while talking to the course portal.

use std::time::Duration;

use thiserror::Error;

/// Errors from logging in to the portal or loading course pages.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The portal rejected the username/password pair.
    #[error("login failed: invalid email/password combination")]
    LoginFailed,

    /// The login page carried no `authenticity_token`.
    #[error("login page has no authenticity token")]
    MissingCsrfToken,

    /// A course page did not finish loading in time.
    #[error("timed out after {}s loading course {course}", timeout.as_secs())]
    CourseLoadTimeout { course: String, timeout: Duration },

    /// A course page loaded but has no assignment table.
    #[error("course {course} page has no assignments table")]
    AssignmentTableMissing { course: String },

    /// The portal answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("portal request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid portal URL: {0}")]
    Url(#[from] url::ParseError),
}

impl PortalError {
    /// True for errors that only affect one course; the scrape moves on.
    /// Anything else (transport, bad URL, login) ends the scrape.
    pub fn skips_course(&self) -> bool {
        matches!(
            self,
            Self::CourseLoadTimeout { .. } | Self::AssignmentTableMissing { .. } | Self::Status { .. }
        )
    }
}

pub type PortalResult<T> = Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let err = PortalError::CourseLoadTimeout {
            course: "MAT 111".to_string(),
            timeout: Duration::from_secs(20),
        };
        assert_eq!(err.to_string(), "timed out after 20s loading course MAT 111");
        assert_eq!(
            PortalError::LoginFailed.to_string(),
            "login failed: invalid email/password combination"
        );
    }

    #[test]
    fn course_level_errors_skip() {
        assert!(
            PortalError::AssignmentTableMissing {
                course: "MAT 145".into()
            }
            .skips_course()
        );
        assert!(
            PortalError::Status {
                status: 404,
                url: "https://www.gradescope.com/courses/1".into()
            }
            .skips_course()
        );
        assert!(!PortalError::LoginFailed.skips_course());
        assert!(!PortalError::MissingCsrfToken.skips_course());
        assert!(!PortalError::Url(url::ParseError::EmptyHost).skips_course());
    }
}
