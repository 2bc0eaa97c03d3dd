//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::AccountResponse;
use crate::errors::AppResult;
use crate::services::LoginOutcome;

/// Account registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login handle (unique, case-insensitive)
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Optional role label; defaults to "User"
    pub role: Option<String>,
}

/// Login request.
///
/// No validation attributes: empty fields are part of the soft-fail
/// login contract and produce messages, not rejections.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .auth_service
        .register(payload.username, payload.name, payload.password, payload.role)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Login and get a session token.
///
/// Credential failures answer 401 with the structured outcome body so
/// callers can tell the cases apart by message.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(StatusCode, Json<LoginOutcome>)> {
    let outcome = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    Ok((status, Json(outcome)))
}
