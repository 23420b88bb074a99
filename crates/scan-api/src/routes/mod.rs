//! Route handlers for the scan API.

pub mod accounts;
pub mod health;
pub mod scans;
pub mod yandex;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the router with all routes.
///
/// Each route group registers its supported methods explicitly, an
/// OPTIONS preflight, and a fallback turning any other method into a
/// structured 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts",
            get(accounts::get_profile)
                .post(accounts::register)
                .put(accounts::update_settings)
                .options(accounts::preflight)
                .fallback(method_not_supported),
        )
        .route(
            "/scans",
            get(scans::history)
                .post(scans::submit)
                .options(scans::preflight)
                .fallback(method_not_supported),
        )
        .route(
            "/auth/yandex",
            get(yandex::auth_url)
                .post(yandex::exchange)
                .options(yandex::preflight)
                .fallback(method_not_supported),
        )
        .route("/health", get(health::health))
}

/// Empty 200 advertising a route's allowed methods.
pub(crate) fn preflight_response(allowed_methods: &'static str) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, allowed_methods),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, X-User-Id",
            ),
        ],
    )
}

/// Validation error for a body that failed JSON extraction.
pub(crate) fn invalid_body() -> ApiError {
    ApiError::Validation("request body must be valid JSON".to_string())
}

async fn method_not_supported() -> ApiError {
    ApiError::MethodNotSupported
}
