//! Yandex OAuth routes: authorization URL, code exchange, account linking.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use database::models::User;
use database::{users, DatabaseError};
use yandex_oauth::{YandexClient, YandexProfile};

/// Methods advertised on preflight.
const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// CORS preflight.
pub async fn preflight() -> impl IntoResponse {
    super::preflight_response(ALLOWED_METHODS)
}

/// Authorization URL response.
#[derive(Serialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Issue the provider's authorization URL.
pub async fn auth_url(State(state): State<AppState>) -> Result<Json<AuthUrlResponse>> {
    let client = require_client(&state)?;

    Ok(Json(AuthUrlResponse {
        auth_url: client.authorize_url(),
    }))
}

/// Request to exchange an authorization code. `user_id` switches between
/// linking to an existing account and standalone login/registration.
#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub code: Option<String>,
    pub user_id: Option<i64>,
}

/// Profile returned after linking to an existing account.
#[derive(Serialize)]
pub struct LinkResponse {
    pub user_id: i64,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub yandex_email: Option<String>,
    pub message: String,
}

/// Profile returned on login through Yandex.
#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub yandex_email: Option<String>,
    pub ai_responses_enabled: bool,
    pub message: String,
}

/// Profile returned on first registration through Yandex.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub yandex_email: Option<String>,
    pub yandex_connected: bool,
    pub ai_responses_enabled: bool,
    pub message: String,
}

/// Exchange an authorization code for a session: link, log in, or register.
pub async fn exchange(
    State(state): State<AppState>,
    body: Option<Json<ExchangeRequest>>,
) -> Result<Response> {
    let Json(req) = body.ok_or_else(super::invalid_body)?;

    let code = req
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("authorization code is required".to_string()))?;

    let client = require_client(&state)?;

    let access_token = client.exchange_code(&code).await?;
    let profile = client.fetch_profile(&access_token).await?;

    match req.user_id {
        Some(user_id) => link(&state, user_id, &profile).await,
        None => login_or_register(&state, &profile).await,
    }
}

/// Attach the Yandex identity to an existing account.
async fn link(state: &AppState, user_id: i64, profile: &YandexProfile) -> Result<Response> {
    let user = users::link_yandex(
        state.db.pool(),
        user_id,
        &profile.id,
        profile.default_email.as_deref(),
    )
    .await?;

    info!(user_id, "Linked Yandex account");

    Ok(Json(LinkResponse {
        user_id: user.id,
        phone: user.phone,
        first_name: user.first_name,
        last_name: user.last_name,
        yandex_email: user.yandex_email,
        message: "Yandex account linked".to_string(),
    })
    .into_response())
}

/// Log in by Yandex id, registering a new account on first contact.
async fn login_or_register(state: &AppState, profile: &YandexProfile) -> Result<Response> {
    let pool = state.db.pool();

    if let Some(user) = users::find_by_yandex_id(pool, &profile.id).await? {
        return Ok(Json(login_response(user)).into_response());
    }

    match users::create_yandex_user(
        pool,
        &profile.id,
        profile.default_email.as_deref(),
        profile.first_name.as_deref(),
        profile.last_name.as_deref(),
    )
    .await
    {
        Ok(user) => {
            info!(user_id = user.id, "Registered user via Yandex");
            let body = RegisterResponse {
                user_id: user.id,
                first_name: user.first_name,
                last_name: user.last_name,
                yandex_email: user.yandex_email,
                yandex_connected: true,
                ai_responses_enabled: user.ai_responses_enabled,
                message: "Registered with Yandex".to_string(),
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        // A concurrent first sign-in with this Yandex id won the race;
        // return the winning row as a login.
        Err(DatabaseError::AlreadyExists { .. }) => {
            let user = users::find_by_yandex_id(pool, &profile.id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", profile.id)))?;
            Ok(Json(login_response(user)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

fn login_response(user: User) -> LoginResponse {
    LoginResponse {
        user_id: user.id,
        phone: user.phone,
        first_name: user.first_name,
        last_name: user.last_name,
        yandex_email: user.yandex_email,
        ai_responses_enabled: user.ai_responses_enabled,
        message: "Signed in with Yandex".to_string(),
    }
}

fn require_client(state: &AppState) -> Result<&YandexClient> {
    state
        .yandex
        .as_ref()
        .ok_or_else(|| ApiError::Configuration("Yandex OAuth is not configured".to_string()))
}
