//! Error types for csutil-core
//!
//! A single error enum covers both fatal configuration problems and the
//! per-object failures that the scheduler captures into a [`TaskFailure`].
//!
//! [`TaskFailure`]: crate::task::TaskFailure

use thiserror::Error;

/// Result type alias for csutil-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for csutil-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration; no batch is started
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote object or bucket does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Provider or network failure during a single operation
    #[error("Transfer failed: {0}")]
    Transfer(String),

    /// Local file missing, unreadable, or destination unwritable
    #[error("Local I/O error: {0}")]
    LocalIo(String),

    /// Operation exceeded the configured deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Object key rejected by the provider
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::TomlParse(_) | Error::InvalidUrl(_) => 2, // ConfigError
            Error::Transfer(_) => 3,                                          // NetworkError
            Error::NotFound(_) => 5,                                          // NotFound
            Error::Timeout(_) => 124,                                         // Timeout
            _ => 1,                                                           // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Transfer("test".into()).exit_code(), 3);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Timeout("test".into()).exit_code(), 124);
        assert_eq!(Error::LocalIo("test".into()).exit_code(), 1);
        assert_eq!(Error::InvalidKey("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("bucket/a.txt".into());
        assert_eq!(err.to_string(), "Not found: bucket/a.txt");

        let err = Error::Config("unknown platform 'gcp'".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown platform 'gcp'"
        );
    }
}
