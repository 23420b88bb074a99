//! Configuration for the Yandex OAuth client.

use std::env;

use crate::error::YandexError;

/// Configuration for [`crate::YandexClient`].
///
/// The client id alone is enough to issue authorization URLs; the code
/// exchange additionally needs the secret.
#[derive(Debug, Clone)]
pub struct YandexConfig {
    /// OAuth application client id.
    pub client_id: String,

    /// OAuth application client secret, required for the code exchange.
    pub client_secret: Option<String>,

    /// Authorization/token endpoint base URL.
    pub oauth_url: String,

    /// Profile endpoint base URL.
    pub login_url: String,
}

impl YandexConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `YANDEX_CLIENT_ID` - OAuth application client id
    ///
    /// Optional environment variables:
    /// - `YANDEX_CLIENT_SECRET` - client secret (required for code exchange)
    /// - `YANDEX_OAUTH_URL` - authorization base URL (default: https://oauth.yandex.ru)
    /// - `YANDEX_LOGIN_URL` - profile base URL (default: https://login.yandex.ru)
    pub fn from_env() -> Result<Self, YandexError> {
        let client_id = env::var("YANDEX_CLIENT_ID")
            .map_err(|_| YandexError::Configuration("YANDEX_CLIENT_ID is not set".to_string()))?;

        let client_secret = env::var("YANDEX_CLIENT_SECRET").ok();

        let oauth_url =
            env::var("YANDEX_OAUTH_URL").unwrap_or_else(|_| "https://oauth.yandex.ru".to_string());

        let login_url =
            env::var("YANDEX_LOGIN_URL").unwrap_or_else(|_| "https://login.yandex.ru".to_string());

        Ok(Self {
            client_id,
            client_secret,
            oauth_url,
            login_url,
        })
    }

    /// Create a configuration with explicit credentials and default URLs.
    pub fn new(client_id: impl Into<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            oauth_url: "https://oauth.yandex.ru".to_string(),
            login_url: "https://login.yandex.ru".to_string(),
        }
    }
}
