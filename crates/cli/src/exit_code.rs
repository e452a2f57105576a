//! Exit code definitions for csutil
//!
//! Scripts depend on these values. Changing one is a breaking change.

use csutil_core::{BatchResult, Error};

/// Exit codes for the csutil CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General error, including a batch in which some items failed
    GeneralError = 1,

    /// Invalid arguments or configuration
    UsageError = 2,

    /// Retryable network or provider error
    NetworkError = 3,

    /// Bucket or object does not exist
    NotFound = 5,

    /// The operation deadline passed
    Timeout = 124,

    /// Operation was interrupted (e.g., Ctrl+C)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            5 => Some(Self::NotFound),
            124 => Some(Self::Timeout),
            130 => Some(Self::Interrupted),
            _ => None,
        }
    }

    /// Exit code for an error that aborted a command
    pub fn from_error(err: &Error) -> Self {
        Self::from_i32(err.exit_code()).unwrap_or(Self::GeneralError)
    }

    /// Exit code for a finished batch
    pub fn from_batch(result: &BatchResult) -> Self {
        if result.is_success() {
            Self::Success
        } else if result.timed_out() {
            Self::Timeout
        } else {
            Self::GeneralError
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
            Self::NetworkError => "Network error (retryable)",
            Self::NotFound => "Resource not found",
            Self::Timeout => "Operation timed out",
            Self::Interrupted => "Operation interrupted",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // Every variant fits in a u8
        std::process::ExitCode::from(u8::try_from(code.as_i32()).unwrap_or(1))
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 2);
        assert_eq!(ExitCode::NetworkError.as_i32(), 3);
        assert_eq!(ExitCode::NotFound.as_i32(), 5);
        assert_eq!(ExitCode::Timeout.as_i32(), 124);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_exit_code_from_i32() {
        assert_eq!(ExitCode::from_i32(2), Some(ExitCode::UsageError));
        assert_eq!(ExitCode::from_i32(124), Some(ExitCode::Timeout));
        assert_eq!(ExitCode::from_i32(4), None);
        assert_eq!(ExitCode::from_i32(99), None);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&Error::Config("missing".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from_error(&Error::NotFound("bucket".into())),
            ExitCode::NotFound
        );
        assert_eq!(
            ExitCode::from_error(&Error::Transfer("reset".into())),
            ExitCode::NetworkError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Timeout("list".into())),
            ExitCode::Timeout
        );
        assert_eq!(
            ExitCode::from_error(&Error::InvalidKey("..".into())),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn test_exit_code_into_process_exit_code() {
        for code in [ExitCode::Success, ExitCode::Timeout, ExitCode::Interrupted] {
            let expected = std::process::ExitCode::from(code.as_i32() as u8);
            assert_eq!(std::process::ExitCode::from(code), expected);
        }
    }

    #[test]
    fn test_exit_code_display() {
        let display = format!("{}", ExitCode::NotFound);
        assert!(display.contains("5"));
        assert!(display.contains("not found"));
    }
}
