//! Error types for the Yandex OAuth client.

use thiserror::Error;

/// Errors that can occur during the OAuth flow.
#[derive(Debug, Error)]
pub enum YandexError {
    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failed to reach the provider
    #[error("network error: {0}")]
    Network(String),

    /// The provider rejected the code exchange
    #[error("authorization rejected: {0}")]
    Rejected(String),

    /// The provider returned an error status
    #[error("provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A provider response could not be decoded
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}
