//! Yandex OAuth 2.0 client.
//!
//! Covers the three provider interactions the backend needs: building
//! the authorization URL, exchanging an authorization code for an access
//! token, and fetching the verified profile behind that token.

mod client;
mod config;
mod error;
mod types;

pub use client::YandexClient;
pub use config::YandexConfig;
pub use error::YandexError;
pub use types::YandexProfile;
