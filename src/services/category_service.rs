//! Category service - catalog category use cases.
//!
//! Enforces name uniqueness (case-insensitive, trimmed) before any write.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Category;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Category service trait for dependency injection.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Get category by ID
    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    /// List all categories ordered by name
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// Create a category with a unique name
    async fn create_category(&self, name: String) -> AppResult<Category>;

    /// Rename a category, keeping the name unique
    async fn update_category(&self, id: Uuid, name: String) -> AppResult<Category>;

    /// Delete a category by ID.
    ///
    /// Whether products still reference it is not checked here; the
    /// store's foreign key has the final say.
    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CategoryService using Unit of Work.
pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    /// Create new category service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow.categories().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn create_category(&self, name: String) -> AppResult<Category> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }

        if self.uow.categories().find_by_name(&name).await?.is_some() {
            return Err(AppError::duplicate("Category"));
        }

        self.uow.categories().create(name).await
    }

    async fn update_category(&self, id: Uuid, name: String) -> AppResult<Category> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Category name is required"));
        }

        if self.uow.categories().find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        // Another category may not already hold the new name
        if let Some(existing) = self.uow.categories().find_by_name(&name).await? {
            if existing.id != id {
                return Err(AppError::duplicate("Category"));
            }
        }

        self.uow.categories().update(id, name).await
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.uow.categories().delete(id).await
    }
}
