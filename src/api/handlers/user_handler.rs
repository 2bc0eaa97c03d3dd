//! Account management handlers (admin only).

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use crate::api::middleware::{require_admin, CurrentAccount};
use crate::api::AppState;
use crate::domain::AccountResponse;
use crate::errors::AppResult;

/// Create account management routes (mounted behind the auth middleware)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/:id", get(get_account))
}

/// List all accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<Json<Vec<AccountResponse>>> {
    require_admin(&current)?;

    let accounts = state.account_service.list_accounts().await?;
    Ok(Json(
        accounts.into_iter().map(AccountResponse::from).collect(),
    ))
}

/// Get account by ID
pub async fn get_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AccountResponse>> {
    require_admin(&current)?;

    let account = state.account_service.get_account(id).await?;
    Ok(Json(AccountResponse::from(account)))
}
