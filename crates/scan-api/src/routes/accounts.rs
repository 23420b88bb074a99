//! Account routes: phone registration/login, profile retrieval, settings.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use database::models::User;
use database::{users, DatabaseError};

/// Methods advertised on preflight.
const ALLOWED_METHODS: &str = "GET, POST, PUT, OPTIONS";

/// CORS preflight.
pub async fn preflight() -> impl IntoResponse {
    super::preflight_response(ALLOWED_METHODS)
}

/// Request to register or log in by phone.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Profile returned by registration and login.
#[derive(Serialize)]
pub struct AccountResponse {
    pub user_id: i64,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub yandex_connected: bool,
    pub ai_responses_enabled: bool,
    pub message: String,
}

impl AccountResponse {
    fn new(user: User, message: &str) -> Self {
        Self {
            user_id: user.id,
            yandex_connected: user.yandex_connected(),
            phone: user.phone,
            first_name: user.first_name,
            last_name: user.last_name,
            ai_responses_enabled: user.ai_responses_enabled,
            message: message.to_string(),
        }
    }
}

/// Register a new user by phone, or log an existing one in.
///
/// Registration is idempotent: a known phone returns the existing
/// profile with 200 and no mutation; a fresh one inserts and returns 201.
pub async fn register(
    State(state): State<AppState>,
    body: Option<Json<RegisterRequest>>,
) -> Result<Response> {
    let Json(req) = body.ok_or_else(super::invalid_body)?;

    let phone = trimmed(req.phone)
        .ok_or_else(|| ApiError::Validation("phone is required".to_string()))?;
    let first_name = trimmed(req.first_name);
    let last_name = trimmed(req.last_name);

    let pool = state.db.pool();

    if let Some(user) = users::find_by_phone(pool, &phone).await? {
        return Ok(Json(AccountResponse::new(user, "Login successful")).into_response());
    }

    match users::create_user(pool, &phone, first_name.as_deref(), last_name.as_deref()).await {
        Ok(user) => {
            info!(user_id = user.id, "Registered new user");
            let body = AccountResponse::new(user, "Registration successful");
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        // A concurrent registration with the same phone won the race;
        // return the winning row as a login.
        Err(DatabaseError::AlreadyExists { .. }) => {
            let user = users::find_by_phone(pool, &phone)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("User not found: {phone}")))?;
            Ok(Json(AccountResponse::new(user, "Login successful")).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Query parameters for profile retrieval.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub user_id: Option<i64>,
}

/// Full profile, including the linked Yandex email.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub yandex_connected: bool,
    pub yandex_email: Option<String>,
    pub ai_responses_enabled: bool,
}

/// Get a user's profile.
pub async fn get_profile(
    State(state): State<AppState>,
    query: Option<Query<ProfileQuery>>,
) -> Result<Json<ProfileResponse>> {
    let user_id = query
        .and_then(|q| q.0.user_id)
        .ok_or_else(|| ApiError::Validation("user_id is required".to_string()))?;

    let user = users::get_user(state.db.pool(), user_id).await?;

    Ok(Json(ProfileResponse {
        user_id: user.id,
        yandex_connected: user.yandex_connected(),
        phone: user.phone,
        first_name: user.first_name,
        last_name: user.last_name,
        yandex_email: user.yandex_email,
        ai_responses_enabled: user.ai_responses_enabled,
    }))
}

/// Request to update user settings.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub user_id: Option<i64>,
    pub ai_responses_enabled: Option<bool>,
}

/// Settings update acknowledgment.
#[derive(Serialize)]
pub struct UpdateSettingsResponse {
    pub message: String,
}

/// Update user settings.
///
/// An absent flag is a no-op; the call acknowledges success either way.
pub async fn update_settings(
    State(state): State<AppState>,
    body: Option<Json<UpdateSettingsRequest>>,
) -> Result<Json<UpdateSettingsResponse>> {
    let Json(req) = body.ok_or_else(super::invalid_body)?;

    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::Validation("user_id is required".to_string()))?;

    if let Some(enabled) = req.ai_responses_enabled {
        users::update_ai_responses(state.db.pool(), user_id, enabled).await?;
        info!(user_id, enabled, "Updated AI responses setting");
    }

    Ok(Json(UpdateSettingsResponse {
        message: "Settings updated".to_string(),
    }))
}

/// Trim a field, mapping empty/absent values to `None`.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
