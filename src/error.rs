//! Error types for domcurl
//!
//! This module provides the error type hierarchy using `thiserror`
//! for proper error handling across all components.

use thiserror::Error;

/// The main error type for domcurl operations
#[derive(Error, Debug)]
pub enum Error {
    /// Cookie string parsing errors
    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieParseError),

    /// Browser lifecycle errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// I/O errors (output file, trace file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),
}

/// Errors parsing a raw cookie string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CookieParseError {
    /// The string has no `=` separator, so no name can be extracted
    #[error("cookie string has no '=' separator: {0:?}")]
    MissingSeparator(String),

    /// The part before `=` is empty
    #[error("cookie string has an empty name: {0:?}")]
    EmptyName(String),
}

/// Browser lifecycle and configuration errors
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

    /// The engine rejected an injected cookie
    #[error("Failed to set cookie {name:?}: {reason}")]
    CookieRejected {
        /// Cookie name
        name: String,
        /// Engine-reported reason
        reason: String,
    },
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Navigation timeout
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// Result type alias for domcurl operations
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
