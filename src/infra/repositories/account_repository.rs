//! Account repository - lookup and listing of identity records.
//!
//! Account creation runs inside the registration transaction and lives
//! on the transaction-aware repository in `unit_of_work`.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::account;
use crate::domain::{normalize_handle, Account};
use crate::errors::AppResult;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by login handle.
    ///
    /// The handle is matched case-insensitively after trimming whitespace.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// List all accounts ordered by handle
    async fn list(&self) -> AppResult<Vec<Account>>;
}

/// Concrete SeaORM-backed account repository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = account::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Account::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let result = account::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(account::Column::Username)))
                    .eq(normalize_handle(username)),
            )
            .one(&self.db)
            .await?;
        Ok(result.map(Account::from))
    }

    async fn list(&self) -> AppResult<Vec<Account>> {
        let models = account::Entity::find()
            .order_by_asc(account::Column::Username)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Account::from).collect())
    }
}
