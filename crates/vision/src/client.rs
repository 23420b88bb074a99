//! VisionClient implementation over an OpenAI-compatible API.

use reqwest::Client;
use tracing::debug;

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentPart,
};
use crate::classification::{parse_classification, Classification};
use crate::config::VisionConfig;
use crate::error::VisionError;

/// Base instruction sent with every image.
const CLASSIFY_PROMPT: &str = "Analyze this image and identify the main object in the photo. \
    Reply in JSON format: {\"title\": \"object name\", \"category\": \"category\", \
    \"confidence\": number from 0 to 100}. Categories: Fruits, Vegetables, Animals, \
    Electronics, Vehicles, Clothing, Furniture, Plants, Food, Other.";

/// Follow-up instruction added when the user has AI responses enabled.
const DESCRIPTION_PROMPT: &str =
    "Also add a 'description' field with a detailed description of the object (2-3 sentences).";

/// A client for the vision classification API.
///
/// Each call is a single synchronous request/response exchange; the
/// client holds no per-user state.
#[derive(Debug, Clone)]
pub struct VisionClient {
    client: Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Create a new VisionClient with the given configuration.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let client = Client::builder().build().map_err(|e| {
            VisionError::Configuration(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self { client, config })
    }

    /// Create a VisionClient from environment variables.
    ///
    /// See [`VisionConfig::from_env`] for the recognized variables.
    pub fn from_env() -> Result<Self, VisionError> {
        let config = VisionConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Classify a base64-encoded image.
    ///
    /// When `include_description` is set the request additionally asks
    /// for a descriptive explanation; otherwise only the concise
    /// structural classification is requested.
    pub async fn classify(
        &self,
        image_base64: &str,
        include_description: bool,
    ) -> Result<Classification, VisionError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: build_messages(image_base64, include_description),
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.api_url);
        debug!(model = %request.model, include_description, "Sending classification request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| VisionError::Network(format!("Failed to send request: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                total = usage.total_tokens,
                "Token usage"
            );
        }

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or(VisionError::MissingContent)?;

        parse_classification(content)
    }
}

/// Build the messages array for a classification request.
fn build_messages(image_base64: &str, include_description: bool) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::user_parts(vec![
        ContentPart::text(CLASSIFY_PROMPT),
        ContentPart::image_base64(image_base64),
    ])];

    if include_description {
        messages.push(ChatMessage::user(DESCRIPTION_PROMPT));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::MessageContent;

    #[test]
    fn test_build_messages_without_description() {
        let messages = build_messages("aGVsbG8=", false);

        assert_eq!(messages.len(), 1);
        match &messages[0].content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], ContentPart::Text { .. }));
                match &parts[1] {
                    ContentPart::ImageUrl { image_url } => {
                        assert!(image_url.url.starts_with("data:image/jpeg;base64,"));
                        assert!(image_url.url.ends_with("aGVsbG8="));
                    }
                    other => panic!("expected image part, got {other:?}"),
                }
            }
            other => panic!("expected content parts, got {other:?}"),
        }
    }

    #[test]
    fn test_build_messages_with_description() {
        let messages = build_messages("aGVsbG8=", true);

        assert_eq!(messages.len(), 2);
        match &messages[1].content {
            MessageContent::Text(text) => assert!(text.contains("description")),
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[test]
    fn test_new_keeps_config() {
        let config = VisionConfig::builder().api_key("test-key").build();

        let client = VisionClient::new(config).unwrap();
        assert_eq!(client.config().api_key, "test-key");
    }
}
