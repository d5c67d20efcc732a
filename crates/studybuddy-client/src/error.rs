//! Error types for form submission

use thiserror::Error;

/// Result type alias for form submission operations
pub type Result<T> = std::result::Result<T, StudyBuddyError>;

/// Errors that can occur while building or sending a form submission
///
/// Transport and parse failures display as the bare failure message, since
/// that text is shown to the user after the exception prefix.
#[derive(Error, Debug)]
pub enum StudyBuddyError {
    /// HTTP request failed
    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Transport failed without reaching the server
    #[error("{0}")]
    Transport(String),

    /// Response body was not valid JSON
    #[error("{0}")]
    ParseError(String),

    /// A form field could not be coerced
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl StudyBuddyError {
    /// Create an invalid-field error
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
