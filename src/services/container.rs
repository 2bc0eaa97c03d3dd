//! Service container - centralized service construction and access.
//!
//! Wires the Unit of Work into the service trait objects the API layer
//! depends on.

use std::sync::Arc;

use super::{AccountService, AuthService, CategoryService, ProductService};
use crate::config::Config;
use crate::infra::Persistence;

/// Concrete service container
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    category_service: Arc<dyn CategoryService>,
    product_service: Arc<dyn ProductService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{AccountManager, Authenticator, CategoryManager, ProductManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let account_service = Arc::new(AccountManager::new(uow.clone()));
        let category_service = Arc::new(CategoryManager::new(uow.clone()));
        let product_service = Arc::new(ProductManager::new(uow));

        Self {
            auth_service,
            account_service,
            category_service,
            product_service,
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get account service
    pub fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    /// Get category service
    pub fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    /// Get product service
    pub fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }
}
