//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories and manages database
//! transactions (begin, commit, rollback). Registration uses it to make
//! ensure-role-exists and insert-account a single atomic step.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{account, role};
use super::repositories::{
    AccountRepository, AccountStore, CategoryRepository, CategoryStore, ProductRepository,
    ProductStore,
};
use crate::domain::{normalize_handle, Account};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the repository level or supply an in-memory
/// `TxStore` through a `TransactionContext`.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get account repository
    fn accounts(&self) -> Arc<dyn AccountRepository>;

    /// Get category repository
    fn categories(&self) -> Arc<dyn CategoryRepository>;

    /// Get product repository
    fn products(&self) -> Arc<dyn ProductRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled back
    /// on error. Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Store operations available inside a transaction.
///
/// The live implementation is `DatabaseTransaction`; tests substitute an
/// in-memory store to exercise the registration path end to end.
#[async_trait]
pub trait TxStore: Send + Sync {
    /// Find account by login handle (case-insensitive, trimmed)
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Insert a new account
    async fn insert_account(
        &self,
        username: String,
        name: String,
        password_hash: String,
        role: String,
    ) -> AppResult<Account>;

    /// Register the role label if it is not known yet
    async fn ensure_role(&self, name: &str) -> AppResult<()>;
}

#[async_trait]
impl TxStore for DatabaseTransaction {
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let result = account::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(account::Column::Username)))
                    .eq(normalize_handle(username)),
            )
            .one(self)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn insert_account(
        &self,
        username: String,
        name: String,
        password_hash: String,
        role: String,
    ) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = account::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            password_hash: Set(password_hash),
            name: Set(name),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self).await.map_err(AppError::from)?;
        Ok(Account::from(model))
    }

    async fn ensure_role(&self, name: &str) -> AppResult<()> {
        let existing = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(self)
            .await
            .map_err(AppError::from)?;

        if existing.is_none() {
            let active_model = role::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name.to_string()),
                created_at: Set(chrono::Utc::now()),
            };
            active_model.insert(self).await.map_err(AppError::from)?;
        }

        Ok(())
    }
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same transactional store.
pub struct TransactionContext<'a> {
    store: &'a dyn TxStore,
}

impl<'a> TransactionContext<'a> {
    /// Wrap a transactional store
    pub fn new(store: &'a dyn TxStore) -> Self {
        Self { store }
    }

    /// Get account repository for this transaction
    pub fn accounts(&self) -> TxAccountRepository<'_> {
        TxAccountRepository { store: self.store }
    }

    /// Get role registry for this transaction
    pub fn roles(&self) -> TxRoleRepository<'_> {
        TxRoleRepository { store: self.store }
    }
}

/// Transaction-aware account repository.
pub struct TxAccountRepository<'a> {
    store: &'a dyn TxStore,
}

impl TxAccountRepository<'_> {
    /// Find account by login handle (case-insensitive, trimmed)
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        self.store.find_account_by_username(username).await
    }

    /// Create a new account
    pub async fn create(
        &self,
        username: String,
        name: String,
        password_hash: String,
        role: String,
    ) -> AppResult<Account> {
        self.store
            .insert_account(username, name, password_hash, role)
            .await
    }
}

/// Transaction-aware role registry.
///
/// Runs inside the caller's transaction so role creation and account
/// assignment commit or roll back together.
pub struct TxRoleRepository<'a> {
    store: &'a dyn TxStore,
}

impl TxRoleRepository<'_> {
    /// Create the role label if it is not registered yet
    pub async fn ensure(&self, name: &str) -> AppResult<()> {
        self.store.ensure_role(name).await
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    account_repo: Arc<AccountStore>,
    category_repo: Arc<CategoryStore>,
    product_repo: Arc<ProductStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let account_repo = Arc::new(AccountStore::new(db.clone()));
        let category_repo = Arc::new(CategoryStore::new(db.clone()));
        let product_repo = Arc::new(ProductStore::new(db.clone()));
        Self {
            db,
            account_repo,
            category_repo,
            product_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn accounts(&self) -> Arc<dyn AccountRepository> {
        self.account_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
