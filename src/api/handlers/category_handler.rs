//! Category handlers.
//!
//! Reads are public; mutations require an authenticated admin.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentAccount};
use crate::api::AppState;
use crate::domain::CategoryResponse;
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Category create/update request
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
}

/// Public category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id", get(get_category))
        .route("/:id/products", get(products_for_category))
}

/// Admin category routes (mounted behind the auth middleware)
pub fn category_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/:id", put(update_category))
        .route("/:id", delete(delete_category))
}

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Get category by ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.category_service.get_category(id).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// List products belonging to a category
pub async fn products_for_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<crate::domain::ProductResponse>>> {
    let products = state.product_service.products_for_category(id).await?;
    Ok(Json(products))
}

/// Create a new category
pub async fn create_category(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    require_admin(&current)?;

    let category = state.category_service.create_category(payload.name).await?;
    Ok(Created(CategoryResponse::from(category)))
}

/// Rename a category
pub async fn update_category(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    require_admin(&current)?;

    let category = state
        .category_service
        .update_category(id, payload.name)
        .await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&current)?;

    state.category_service.delete_category(id).await?;
    Ok(NoContent)
}
