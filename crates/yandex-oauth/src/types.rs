//! Provider request and response types.

use serde::Deserialize;

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token, absent when the exchange was rejected.
    pub access_token: Option<String>,
}

/// Token endpoint error body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenError {
    /// Error code, e.g. "invalid_grant".
    pub error: Option<String>,
    /// Human-readable description.
    pub error_description: Option<String>,
}

/// Verified profile returned by the provider's info endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct YandexProfile {
    /// Stable account id.
    pub id: String,
    /// Primary email address.
    pub default_email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialization() {
        let body = r#"{"access_token": "tok-123", "token_type": "bearer", "expires_in": 31536000}"#;

        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.access_token.as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_token_response_without_token() {
        let token: TokenResponse = serde_json::from_str("{}").unwrap();
        assert!(token.access_token.is_none());
    }

    #[test]
    fn test_profile_deserialization() {
        let body = r#"{
            "id": "123456",
            "login": "ada",
            "default_email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace"
        }"#;

        let profile: YandexProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.id, "123456");
        assert_eq!(profile.default_email.as_deref(), Some("ada@example.com"));
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
    }
}
