//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, ROLE_ADMIN};
use crate::errors::AppError;

/// Authenticated account extracted from the session token
#[derive(Clone, Debug)]
pub struct CurrentAccount {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl CurrentAccount {
    /// Check if the account has admin role.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the token from the Authorization header, then
/// injects the CurrentAccount into the request extensions. Bad, missing,
/// or expired tokens fail with Unauthorized; role checks happen later in
/// the handlers and fail with Forbidden.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let current_account = CurrentAccount {
        id: claims.sub,
        username: claims.username,
        role: claims.role,
    };

    request.extensions_mut().insert(current_account);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(account: &CurrentAccount) -> Result<(), AppError> {
    if account.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
