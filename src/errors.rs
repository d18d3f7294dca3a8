/*!
 * Error types for the dualsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when calling the text-generation API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The request volume allowed by the API key is used up
    #[error("Quota exhausted: {0}")]
    QuotaExceeded(String),
}

impl ProviderError {
    /// Whether this failure means the caller exceeded its quota or rate limit.
    ///
    /// The Gemini client produces `QuotaExceeded` structurally from HTTP 429 or
    /// a RESOURCE_EXHAUSTED status; the message scan below is a fallback so that
    /// quota failures surfacing through other variants classify the same way.
    pub fn is_quota(&self) -> bool {
        match self {
            Self::QuotaExceeded(_) => true,
            Self::ApiError {
                status_code: 429, ..
            } => true,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("quota") || message.contains("429")
            }
        }
    }
}

/// Errors that can occur while planning a translation job
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Batch parameters that select nothing, or a zero batch size
    #[error("Invalid batch range: {0}")]
    InvalidRange(String),
}
