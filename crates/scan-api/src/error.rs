//! Error types for the scan API.
//!
//! Every failure is caught here and rendered as a structured JSON body;
//! nothing propagates to the caller as an unstructured fault.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// A referenced user does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A required credential is not configured.
    #[error("{0}")]
    Configuration(String),

    /// The identity provider rejected the exchange.
    #[error("{0}")]
    ExternalAuth(String),

    /// The classifier call or response parsing failed.
    #[error("{0}")]
    Processing(String),

    /// The route does not support the request method.
    #[error("Method not supported")]
    MethodNotSupported,

    /// Database error.
    #[error("{0}")]
    Database(#[from] database::DatabaseError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ExternalAuth(_) => StatusCode::BAD_REQUEST,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(database::DatabaseError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<vision::VisionError> for ApiError {
    fn from(err: vision::VisionError) -> Self {
        match err {
            vision::VisionError::Configuration(msg) => ApiError::Configuration(msg),
            other => ApiError::Processing(other.to_string()),
        }
    }
}

impl From<yandex_oauth::YandexError> for ApiError {
    fn from(err: yandex_oauth::YandexError) -> Self {
        match err {
            yandex_oauth::YandexError::Configuration(msg) => ApiError::Configuration(msg),
            yandex_oauth::YandexError::Rejected(msg) => ApiError::ExternalAuth(msg),
            err @ yandex_oauth::YandexError::Api { .. } => ApiError::ExternalAuth(err.to_string()),
            other => ApiError::Processing(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::warn!(%status, "{message}");
        }

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("phone is required".into()), 400),
            (ApiError::NotFound("User not found".into()), 404),
            (ApiError::Configuration("no key".into()), 500),
            (ApiError::ExternalAuth("bad code".into()), 400),
            (ApiError::Processing("bad reply".into()), 500),
            (ApiError::MethodNotSupported, 405),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status().as_u16(), expected, "{err}");
        }
    }

    #[test]
    fn test_database_not_found_maps_to_404() {
        let err = ApiError::from(database::DatabaseError::NotFound {
            entity: "User",
            id: "7".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from(database::DatabaseError::AlreadyExists {
            entity: "User",
            id: "+1555".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_vision_error_mapping() {
        let err = ApiError::from(vision::VisionError::Configuration("no key".into()));
        assert!(matches!(err, ApiError::Configuration(_)));

        let err = ApiError::from(vision::VisionError::Parse("not json".into()));
        assert!(matches!(err, ApiError::Processing(_)));
    }

    #[test]
    fn test_yandex_error_mapping() {
        let err = ApiError::from(yandex_oauth::YandexError::Rejected("invalid_grant".into()));
        assert!(matches!(err, ApiError::ExternalAuth(_)));

        let err = ApiError::from(yandex_oauth::YandexError::Network("timeout".into()));
        assert!(matches!(err, ApiError::Processing(_)));
    }
}
