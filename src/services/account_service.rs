//! Account service - read-side account use cases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Account;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Get account by ID
    async fn get_account(&self, id: Uuid) -> AppResult<Account>;

    /// List all accounts ordered by handle
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;
}

/// Concrete implementation of AccountService using Unit of Work.
pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    /// Create new account service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.uow.accounts().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        self.uow.accounts().list().await
    }
}
