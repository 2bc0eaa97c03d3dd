//! Category repository - catalog category persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category;
use crate::domain::Category;
use crate::errors::{AppError, AppResult};

/// Category repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Find category by name (case-insensitive, trimmed)
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// Check whether a category with this ID exists
    async fn exists(&self, id: Uuid) -> AppResult<bool>;

    /// List all categories ordered by name
    async fn list(&self) -> AppResult<Vec<Category>>;

    /// Persist a new category
    async fn create(&self, name: String) -> AppResult<Category>;

    /// Overwrite a category's name
    async fn update(&self, id: Uuid, name: String) -> AppResult<Category>;

    /// Remove a category by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete SeaORM-backed category repository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let result = category::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(category::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(&self.db)
            .await?;
        Ok(result.map(Category::from))
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let result = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.is_some())
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, name: String) -> AppResult<Category> {
        let active_model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn update(&self, id: Uuid, name: String) -> AppResult<Category> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: category::ActiveModel = model.into();
        active.name = Set(name);

        let model = active.update(&self.db).await?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = category::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
