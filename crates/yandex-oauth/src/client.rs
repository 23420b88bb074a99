//! YandexClient implementation.

use reqwest::Client;
use tracing::debug;

use crate::config::YandexConfig;
use crate::error::YandexError;
use crate::types::{TokenError, TokenResponse, YandexProfile};

/// A client for the Yandex OAuth 2.0 provider.
#[derive(Debug, Clone)]
pub struct YandexClient {
    client: Client,
    config: YandexConfig,
}

impl YandexClient {
    /// Create a new YandexClient with the given configuration.
    pub fn new(config: YandexConfig) -> Result<Self, YandexError> {
        let client = Client::builder().build().map_err(|e| {
            YandexError::Configuration(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self { client, config })
    }

    /// Create a YandexClient from environment variables.
    ///
    /// See [`YandexConfig::from_env`] for the recognized variables.
    pub fn from_env() -> Result<Self, YandexError> {
        let config = YandexConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &YandexConfig {
        &self.config
    }

    /// Build the provider's authorization URL for this application.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/authorize?response_type=code&client_id={}",
            self.config.oauth_url, self.config.client_id
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// A provider rejection (error status or a body without a token) is
    /// reported as [`YandexError::Rejected`].
    pub async fn exchange_code(&self, code: &str) -> Result<String, YandexError> {
        let client_secret = self.config.client_secret.as_deref().ok_or_else(|| {
            YandexError::Configuration("YANDEX_CLIENT_SECRET is not set".to_string())
        })?;

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", client_secret),
        ];

        debug!("Exchanging authorization code for access token");

        let response = self
            .client
            .post(format!("{}/token", self.config.oauth_url))
            .form(&params)
            .send()
            .await
            .map_err(|e| YandexError::Network(format!("Failed to send request: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<TokenError>(&error_text) {
                Ok(err) => err
                    .error_description
                    .or(err.error)
                    .unwrap_or(error_text),
                Err(_) => error_text,
            };

            return Err(YandexError::Rejected(message));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| YandexError::Parse(format!("Failed to parse token response: {e}")))?;

        token
            .access_token
            .ok_or_else(|| YandexError::Rejected("no access token in response".to_string()))
    }

    /// Fetch the verified profile behind an access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<YandexProfile, YandexError> {
        let response = self
            .client
            .get(format!("{}/info?format=json", self.config.login_url))
            .header("Authorization", format!("OAuth {access_token}"))
            .send()
            .await
            .map_err(|e| YandexError::Network(format!("Failed to send request: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(YandexError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| YandexError::Parse(format!("Failed to parse profile response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url() {
        let client = YandexClient::new(YandexConfig::new("app-id", None)).unwrap();

        assert_eq!(
            client.authorize_url(),
            "https://oauth.yandex.ru/authorize?response_type=code&client_id=app-id"
        );
    }

    #[tokio::test]
    async fn test_exchange_code_requires_secret() {
        let client = YandexClient::new(YandexConfig::new("app-id", None)).unwrap();

        let result = client.exchange_code("some-code").await;
        match result {
            Err(YandexError::Configuration(msg)) => assert!(msg.contains("YANDEX_CLIENT_SECRET")),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }
}
