/*!
 * Error types for the lexibook application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
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
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur when reading or writing the book container
#[derive(Error, Debug)]
pub enum BookError {
    /// Error from an underlying file operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the zip archive layer
    #[error("Archive error: {0}")]
    Archive(String),

    /// Error in the container structure (container.xml, OPF manifest)
    #[error("Malformed container: {0}")]
    Container(String),

    /// Error parsing or re-serializing section markup
    #[error("Markup error: {0}")]
    Markup(String),
}

impl From<zip::result::ZipError> for BookError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::Archive(error.to_string())
    }
}

impl From<quick_xml::Error> for BookError {
    fn from(error: quick_xml::Error) -> Self {
        Self::Markup(error.to_string())
    }
}
