//! Integration tests for API endpoints.
//!
//! The router is driven with mock services injected through `AppState`,
//! so routing, auth gating, and status mapping are exercised without a
//! database connection.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use catalog_api::api::middleware::{require_admin, CurrentAccount};
use catalog_api::api::{create_router, AppState};
use catalog_api::domain::{
    Account, AccountResponse, Category, Product, ProductInput, ProductResponse, Role,
};
use catalog_api::errors::{AppError, AppResult};
use catalog_api::infra::Database;
use catalog_api::services::{
    AccountService, AuthService, CategoryService, Claims, LoginOutcome, ProductService,
};
use catalog_api::types::Paginated;

// =============================================================================
// Mock Services
// =============================================================================

const USER_TOKEN: &str = "user-test-token";
const ADMIN_TOKEN: &str = "admin-test-token";

/// Mock auth service with two recognized tokens
struct MockAuthService;

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(
        &self,
        username: String,
        name: String,
        _password: String,
        role: Option<String>,
    ) -> AppResult<AccountResponse> {
        Ok(AccountResponse {
            id: Uuid::new_v4(),
            username,
            name,
            role: role.unwrap_or_else(|| "User".to_string()),
            created_at: Utc::now(),
        })
    }

    async fn login(&self, username: String, _password: String) -> AppResult<LoginOutcome> {
        if username == "alice" {
            Ok(LoginOutcome {
                token: Some(USER_TOKEN.to_string()),
                account: Some(AccountResponse {
                    id: Uuid::new_v4(),
                    username,
                    name: "Alice".to_string(),
                    role: "User".to_string(),
                    created_at: Utc::now(),
                }),
                message: "Login successful".to_string(),
            })
        } else {
            Ok(LoginOutcome {
                token: None,
                account: None,
                message: "Invalid username".to_string(),
            })
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let role = match token {
            USER_TOKEN => "User",
            ADMIN_TOKEN => "Admin",
            _ => return Err(AppError::Unauthorized),
        };

        Ok(Claims {
            sub: Uuid::new_v4(),
            username: "someone".to_string(),
            role: role.to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }
}

fn sample_account() -> Account {
    Account {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        password_hash: "hashed".to_string(),
        name: "Alice".to_string(),
        role: Role::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_category() -> Category {
    Category {
        id: Uuid::new_v4(),
        name: "Gadgets".to_string(),
        created_at: Utc::now(),
    }
}

fn sample_product() -> Product {
    Product {
        id: Uuid::new_v4(),
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price: Decimal::new(1999, 2),
        img_url: "https://example.com/w.png".to_string(),
        sku: "SKU-1".to_string(),
        stock_quantity: 3,
        category_id: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_response() -> ProductResponse {
    ProductResponse::from((sample_product(), sample_category()))
}

struct MockAccountService;

#[async_trait]
impl AccountService for MockAccountService {
    async fn get_account(&self, _id: Uuid) -> AppResult<Account> {
        Ok(sample_account())
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        Ok(vec![sample_account(), sample_account()])
    }
}

struct MockCategoryService;

#[async_trait]
impl CategoryService for MockCategoryService {
    async fn get_category(&self, _id: Uuid) -> AppResult<Category> {
        Ok(sample_category())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(vec![sample_category()])
    }

    async fn create_category(&self, name: String) -> AppResult<Category> {
        Ok(Category {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        })
    }

    async fn update_category(&self, id: Uuid, name: String) -> AppResult<Category> {
        Ok(Category {
            id,
            name,
            created_at: Utc::now(),
        })
    }

    async fn delete_category(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

struct MockProductService;

#[async_trait]
impl ProductService for MockProductService {
    async fn get_product(&self, _id: Uuid) -> AppResult<ProductResponse> {
        Ok(sample_response())
    }

    async fn list_products(&self) -> AppResult<Vec<ProductResponse>> {
        Ok(vec![sample_response()])
    }

    async fn list_products_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<Paginated<ProductResponse>> {
        Ok(Paginated::new(vec![sample_response()], page, per_page, 1))
    }

    async fn products_for_category(&self, _category_id: Uuid) -> AppResult<Vec<ProductResponse>> {
        Ok(vec![sample_response()])
    }

    async fn search_products(&self, _term: &str) -> AppResult<Vec<ProductResponse>> {
        Ok(vec![sample_response()])
    }

    async fn create_product(&self, input: ProductInput) -> AppResult<ProductResponse> {
        Ok(ProductResponse::from((
            Product {
                id: Uuid::new_v4(),
                name: input.name,
                description: input.description,
                price: input.price,
                img_url: input.img_url,
                sku: input.sku,
                stock_quantity: input.stock_quantity,
                category_id: input.category_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            sample_category(),
        )))
    }

    async fn update_product(&self, _id: Uuid, input: ProductInput) -> AppResult<ProductResponse> {
        self.create_product(input).await
    }

    async fn delete_product(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn buy_product(&self, _name: &str, quantity: i32) -> AppResult<()> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be positive"));
        }
        Ok(())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Build an app backed entirely by mock services.
///
/// The wrapped connection is disconnected, so only the health endpoint
/// ever touches it.
fn test_app() -> axum::Router {
    let state = AppState::new(
        Arc::new(MockAuthService),
        Arc::new(MockAccountService),
        Arc::new(MockCategoryService),
        Arc::new(MockProductService),
        Arc::new(Database::from_connection(
            sea_orm::DatabaseConnection::default(),
        )),
    );
    create_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_with_token(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Router Tests
// =============================================================================

#[tokio::test]
async fn test_root_returns_banner() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_login_success_answers_200_with_token() {
    let request = post_json(
        "/auth/login",
        json!({"username": "alice", "password": "password123"}),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["token"], USER_TOKEN);
}

#[tokio::test]
async fn test_login_failure_answers_401_with_soft_fail_body() {
    let request = post_json(
        "/auth/login",
        json!({"username": "nobody", "password": "password123"}),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid username");
    assert!(body["token"].is_null());
    assert!(body["account"].is_null());
}

#[tokio::test]
async fn test_register_answers_201() {
    let request = post_json(
        "/auth/register",
        json!({"username": "bob", "name": "Bob", "password": "password123"}),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["username"], "bob");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let request = post_json(
        "/auth/register",
        json!({"username": "bob", "name": "Bob", "password": "short"}),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_reads_are_public() {
    let response = test_app().oneshot(get("/products")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body[0]["name"], "Widget");
    assert_eq!(body[0]["category_name"], "Gadgets");
}

#[tokio::test]
async fn test_product_search_is_public() {
    let response = test_app()
        .oneshot(get("/products/search?q=widget"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_product_mutations_require_token() {
    let request = post_json("/products", json!({}));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_mutations_reject_unknown_token() {
    let request = post_json_with_token("/products", "forged-token", json!({}));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_product_mutations_require_admin() {
    let request = post_json_with_token(
        "/products",
        USER_TOKEN,
        json!({
            "name": "Widget",
            "price": "19.99",
            "sku": "SKU-1",
            "stock_quantity": 3,
            "category_id": Uuid::new_v4(),
        }),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_create_product() {
    let request = post_json_with_token(
        "/products",
        ADMIN_TOKEN,
        json!({
            "name": "Widget",
            "price": "19.99",
            "sku": "SKU-1",
            "stock_quantity": 3,
            "category_id": Uuid::new_v4(),
        }),
    );
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Widget");
}

#[tokio::test]
async fn test_buy_requires_token_but_not_admin() {
    let unauthenticated = post_json("/products/buy/Widget", json!({"quantity": 1}));
    let response = test_app().oneshot(unauthenticated).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let authenticated = post_json_with_token("/products/buy/Widget", USER_TOKEN, json!({"quantity": 1}));
    let response = test_app().oneshot(authenticated).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_buy_rejects_non_positive_quantity() {
    let request = post_json_with_token("/products/buy/Widget", USER_TOKEN, json!({"quantity": 0}));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_reads_are_public() {
    let response = test_app().oneshot(get("/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_category_mutations_require_admin() {
    let request = post_json_with_token("/categories", USER_TOKEN, json!({"name": "Gadgets"}));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = post_json_with_token("/categories", ADMIN_TOKEN, json!({"name": "Gadgets"}));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_account_listing_requires_admin() {
    let response = test_app().oneshot(get("/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = test_app()
        .oneshot(get_with_token("/users", USER_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test_app()
        .oneshot(get_with_token("/users", ADMIN_TOKEN))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Response Type Tests
// =============================================================================

#[tokio::test]
async fn test_api_response_structure() {
    use catalog_api::types::ApiResponse;

    let response: ApiResponse<String> = ApiResponse::success("test data".to_string());
    assert!(response.success);
    assert_eq!(response.data.unwrap(), "test data");
    assert!(response.message.is_none());
}

#[tokio::test]
async fn test_paginated_meta_rounds_up() {
    let page: Paginated<i32> = Paginated::new(vec![1, 2], 3, 2, 5);
    assert_eq!(page.meta.page, 3);
    assert_eq!(page.meta.per_page, 2);
    assert_eq!(page.meta.total, 5);
    assert_eq!(page.meta.total_pages, 3);
}

#[tokio::test]
async fn test_pagination_params_defaults() {
    use catalog_api::types::PaginationParams;

    let params = PaginationParams::default();
    assert_eq!(params.page, 1);
    assert_eq!(params.per_page, 20);
    assert_eq!(params.limit(), 20);
}

// =============================================================================
// Domain Model Tests
// =============================================================================

#[tokio::test]
async fn test_role_display() {
    assert_eq!(Role::User.to_string(), "User");
    assert_eq!(Role::Admin.to_string(), "Admin");
}

#[tokio::test]
async fn test_role_from_str() {
    assert_eq!(Role::from("User"), Role::User);
    assert_eq!(Role::from("Admin"), Role::Admin);
    // Unknown labels fall back to User
    assert_eq!(Role::from("invalid"), Role::User);
}

#[tokio::test]
async fn test_product_response_carries_category_name() {
    let category = sample_category();
    let mut product = sample_product();
    product.category_id = category.id;

    let response = ProductResponse::from((product.clone(), category.clone()));
    assert_eq!(response.id, product.id);
    assert_eq!(response.category_id, category.id);
    assert_eq!(response.category_name, "Gadgets");
}

// =============================================================================
// Error Type Tests
// =============================================================================

#[tokio::test]
async fn test_app_error_status_codes() {
    use axum::response::IntoResponse;

    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, StatusCode::FORBIDDEN),
        (AppError::NotFound, StatusCode::NOT_FOUND),
        (AppError::duplicate("Product"), StatusCode::BAD_REQUEST),
        (AppError::referential("Category"), StatusCode::BAD_REQUEST),
        (AppError::InsufficientStock, StatusCode::BAD_REQUEST),
        (AppError::validation("bad field"), StatusCode::BAD_REQUEST),
        (
            AppError::internal("boom"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let response = error.into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_app_error_constructors() {
    assert!(matches!(
        AppError::duplicate("Username"),
        AppError::Duplicate(_)
    ));
    assert!(matches!(
        AppError::referential("Category"),
        AppError::ReferentialViolation(_)
    ));
    assert!(matches!(
        AppError::validation("invalid field"),
        AppError::Validation(_)
    ));
}

// =============================================================================
// Auth Middleware Tests
// =============================================================================

#[tokio::test]
async fn test_require_admin_allows_admin() {
    let account = CurrentAccount {
        id: Uuid::new_v4(),
        username: "root".to_string(),
        role: "Admin".to_string(),
    };

    assert!(account.is_admin());
    assert!(require_admin(&account).is_ok());
}

#[tokio::test]
async fn test_require_admin_rejects_user() {
    let account = CurrentAccount {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        role: "User".to_string(),
    };

    assert!(!account.is_admin());
    assert!(matches!(
        require_admin(&account).unwrap_err(),
        AppError::Forbidden
    ));
}

// =============================================================================
// JWT Claims Tests
// =============================================================================

#[tokio::test]
async fn test_claims_structure() {
    let claims = Claims {
        sub: Uuid::new_v4(),
        username: "alice".to_string(),
        role: "User".to_string(),
        exp: Utc::now().timestamp() + 3600,
        iat: Utc::now().timestamp(),
    };

    assert!(!claims.username.is_empty());
    assert!(claims.exp > claims.iat);
}
