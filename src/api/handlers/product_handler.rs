//! Product handlers.
//!
//! Reads are public; mutations require an authenticated admin; buying
//! requires any authenticated account.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentAccount};
use crate::api::AppState;
use crate::domain::{ProductInput, ProductResponse};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent, Paginated, PaginationParams};

/// Product create/update request
#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub img_url: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: i32,
    pub category_id: Uuid,
}

impl From<ProductRequest> for ProductInput {
    fn from(req: ProductRequest) -> Self {
        ProductInput {
            name: req.name,
            description: req.description,
            price: req.price,
            img_url: req.img_url,
            sku: req.sku,
            stock_quantity: req.stock_quantity,
            category_id: req.category_id,
        }
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Purchase request
#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub quantity: i32,
}

/// Public product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/paginated", get(list_products_paginated))
        .route("/search", get(search_products))
        .route("/:id", get(get_product))
}

/// Protected product routes (mounted behind the auth middleware)
pub fn product_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
        .route("/buy/:name", post(buy_product))
}

/// List all products with their category names
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

/// Fetch one page of products
pub async fn list_products_paginated(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ProductResponse>>> {
    let page = state
        .product_service
        .list_products_paginated(params.page, params.limit())
        .await?;
    Ok(Json(page))
}

/// Case-insensitive substring search over name and description
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.product_service.search_products(&params.q).await?;
    Ok(Json(products))
}

/// Get product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Created<ProductResponse>> {
    require_admin(&current)?;

    let product = state
        .product_service
        .create_product(payload.into())
        .await?;
    Ok(Created(product))
}

/// Overwrite a product's fields
pub async fn update_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    require_admin(&current)?;

    let product = state
        .product_service
        .update_product(id, payload.into())
        .await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&current)?;

    state.product_service.delete_product(id).await?;
    Ok(NoContent)
}

/// Purchase a quantity of the named product
pub async fn buy_product(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<BuyRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .product_service
        .buy_product(&name, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::message("Purchase successful")))
}
