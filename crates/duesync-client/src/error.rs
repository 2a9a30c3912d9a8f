//! Client error types.

use std::fmt;

use duesync_providers::ProviderError;
#[cfg(feature = "gradescope")]
use duesync_providers::portal::PortalError;
use duesync_sync::LogStoreError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that end a command.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration missing or invalid.
    Config(String),
    /// Portal login or setup failed.
    #[cfg(feature = "gradescope")]
    Portal(PortalError),
    /// Calendar authentication or setup failed.
    Provider(ProviderError),
    /// Deadlines file or event log could not be read or written.
    Store(LogStoreError),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            #[cfg(feature = "gradescope")]
            Self::Portal(err) => write!(f, "gradescope: {}", err),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Store(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(_) => None,
            #[cfg(feature = "gradescope")]
            Self::Portal(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

#[cfg(feature = "gradescope")]
impl From<PortalError> for ClientError {
    fn from(err: PortalError) -> Self {
        Self::Portal(err)
    }
}

impl From<LogStoreError> for ClientError {
    fn from(err: LogStoreError) -> Self {
        Self::Store(err)
    }
}
