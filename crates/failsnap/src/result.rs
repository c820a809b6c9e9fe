//! Result and error types for failsnap.

use thiserror::Error;

/// Result type for failsnap operations
pub type FailsnapResult<T> = Result<T, FailsnapError>;

/// Errors that can occur in failsnap
#[derive(Debug, Error)]
pub enum FailsnapError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Driver command failed (resize, navigation, console query, ...)
    #[error("Driver command '{command}' failed: {message}")]
    Driver {
        /// Command that failed
        command: String,
        /// Error message
        message: String,
    },

    /// Script injection error
    #[error("Script execution failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Attachment could not be delivered to the report
    #[error("Attachment '{name}' failed: {message}")]
    Attachment {
        /// Attachment name
        name: String,
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Browser feature not compiled in
    #[error("Browser feature not enabled. Rebuild with --features browser")]
    BrowserUnavailable,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FailsnapError {
    /// Create a driver error for the named command
    #[must_use]
    pub fn driver(command: impl Into<String>, message: impl ToString) -> Self {
        Self::Driver {
            command: command.into(),
            message: message.to_string(),
        }
    }

    /// Create a screenshot error
    #[must_use]
    pub fn screenshot(message: impl ToString) -> Self {
        Self::Screenshot {
            message: message.to_string(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_names_command() {
        let err = FailsnapError::driver("set_window_size", "no window");
        assert_eq!(
            err.to_string(),
            "Driver command 'set_window_size' failed: no window"
        );
    }

    #[test]
    fn test_screenshot_error() {
        let err = FailsnapError::screenshot("target closed");
        assert!(err.to_string().contains("Screenshot failed"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FailsnapError = io_err.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
