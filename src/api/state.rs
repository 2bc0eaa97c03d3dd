//! Application state - dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{AccountService, AuthService, CategoryService, ProductService, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Account service
    pub account_service: Arc<dyn AccountService>,
    /// Category service
    pub category_service: Arc<dyn CategoryService>,
    /// Product service
    pub product_service: Arc<dyn ProductService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            account_service: container.accounts(),
            category_service: container.categories(),
            product_service: container.products(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        category_service: Arc<dyn CategoryService>,
        product_service: Arc<dyn ProductService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            category_service,
            product_service,
            database,
        }
    }
}
