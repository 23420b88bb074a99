//! Error types for the vision client.

use thiserror::Error;

/// Errors that can occur when classifying an image.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failed to reach the classifier API
    #[error("network error: {0}")]
    Network(String),

    /// The classifier API returned an error status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The reply carried no message content
    #[error("no content in classifier response")]
    MissingContent,

    /// The reply content could not be decoded as a classification
    #[error("failed to parse classifier response: {0}")]
    Parse(String),
}
