//! Error types for dashshot
//!
//! This module provides the error type hierarchy using `thiserror`
//! for proper error handling across all components.

use thiserror::Error;

/// The main error type for dashshot operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Capture errors (screenshot, artifact write)
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),
}

/// Navigation and wait errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),

    /// The operator never reached the dashboard
    #[error("Login wait timed out after {timeout_ms}ms waiting for URL matching {pattern}")]
    LoginTimeout {
        /// URL pattern that was never matched
        pattern: String,
        /// The wait bound in milliseconds
        timeout_ms: u64,
    },

    /// Generic wait timeout
    #[error("Wait timed out after {0}ms")]
    Timeout(u64),
}

/// Capture errors (screenshot and artifact write)
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Screenshot failed
    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    /// Screenshot payload was not valid base64
    #[error("Screenshot payload decode failed: {0}")]
    PayloadDecodeFailed(String),

    /// Captured bytes were not a decodable image
    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    /// Writing the output file failed
    #[error("Failed to write artifact to {path}: {source}")]
    WriteFailed {
        /// Destination path
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for dashshot operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Browser(BrowserError::LaunchFailed("no chrome".to_string()));
        assert!(err.to_string().contains("Failed to launch browser"));
        assert!(err.to_string().contains("no chrome"));
    }

    #[test]
    fn test_login_timeout_error() {
        let err = NavigationError::LoginTimeout {
            pattern: "**/home".to_string(),
            timeout_ms: 120_000,
        };
        assert!(err.to_string().contains("120000"));
        assert!(err.to_string().contains("**/home"));
    }

    #[test]
    fn test_capture_write_error_carries_path() {
        let err = CaptureError::WriteFailed {
            path: std::path::PathBuf::from("/nope/dashboard.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/dashboard.png"));
    }

    #[test]
    fn test_cdp_error() {
        let err = Error::cdp("connection dropped");
        assert_eq!(err.to_string(), "CDP error: connection dropped");
    }
}
