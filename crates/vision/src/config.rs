//! Configuration for the vision client.

use std::env;

use crate::error::VisionError;

/// Configuration for [`crate::VisionClient`].
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for the reply.
    pub max_tokens: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
        }
    }
}

impl VisionConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API base URL (default: https://api.openai.com)
    /// - `OPENAI_VISION_MODEL` - Model name (default: gpt-4o-mini)
    /// - `OPENAI_MAX_TOKENS` - Max reply tokens (default: 300)
    pub fn from_env() -> Result<Self, VisionError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| VisionError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        let api_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model =
            env::var("OPENAI_VISION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> VisionConfigBuilder {
        VisionConfigBuilder::default()
    }
}

/// Builder for [`VisionConfig`].
#[derive(Debug, Default)]
pub struct VisionConfigBuilder {
    config: VisionConfig,
}

impl VisionConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max reply tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> VisionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VisionConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 300);
    }

    #[test]
    fn test_builder_all_options() {
        let config = VisionConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("gpt-4o")
            .max_tokens(512)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 512);
    }

    // Environment-based scenarios share one test to avoid races between
    // parallel tests (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            std::env::remove_var("OPENAI_API_KEY");
            std::env::remove_var("OPENAI_API_URL");
            std::env::remove_var("OPENAI_VISION_MODEL");
            std::env::remove_var("OPENAI_MAX_TOKENS");
        }

        // Missing API key should error
        clear_all_vars();
        let result = VisionConfig::from_env();
        match result {
            Err(VisionError::Configuration(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("expected Configuration error, got {other:?}"),
        }

        // Only API key set, defaults used
        clear_all_vars();
        std::env::set_var("OPENAI_API_KEY", "test-env-key");

        let config = VisionConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 300);

        // All vars set
        std::env::set_var("OPENAI_API_URL", "https://test.api.com");
        std::env::set_var("OPENAI_VISION_MODEL", "gpt-4o");
        std::env::set_var("OPENAI_MAX_TOKENS", "600");

        let config = VisionConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 600);

        clear_all_vars();
    }
}
