//! Product repository - catalog product persistence.
//!
//! Read methods join the owning category explicitly so projections can
//! carry the category name without a lazily resolved reference graph.
//! `decrement_stock` is the compare-and-set write backing the purchase
//! path: the row is only updated while it still holds enough stock.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{category, product};
use crate::domain::{Category, Product, ProductInput};
use crate::errors::{AppError, AppResult};

/// Product repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID with its category
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Product, Category)>>;

    /// Find product by name (case-insensitive, trimmed)
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>>;

    /// Check whether a product with this name exists (case-insensitive, trimmed)
    async fn exists_by_name(&self, name: &str) -> AppResult<bool>;

    /// List all products with categories, ordered by name
    async fn list(&self) -> AppResult<Vec<(Product, Category)>>;

    /// Fetch one page of products with categories, plus the total count
    async fn list_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<(Product, Category)>, u64)>;

    /// List products belonging to a category, ordered by name
    async fn for_category(&self, category_id: Uuid) -> AppResult<Vec<(Product, Category)>>;

    /// Case-insensitive substring search over name and description.
    /// A blank term lists every product.
    async fn search(&self, term: &str) -> AppResult<Vec<(Product, Category)>>;

    /// Persist a new product with timestamps set to now
    async fn create(&self, input: ProductInput) -> AppResult<Product>;

    /// Overwrite a product's fields and bump its update timestamp
    async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product>;

    /// Remove a product by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Conditionally decrement stock by `quantity`.
    ///
    /// The write only lands if the row still holds at least `quantity`
    /// units, so concurrent purchases cannot oversubscribe inventory.
    /// Returns whether the decrement was applied.
    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> AppResult<bool>;
}

/// Concrete SeaORM-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Resolve the joined category row; every product references one by FK.
fn with_category(
    (product, category): (product::Model, Option<category::Model>),
) -> AppResult<(Product, Category)> {
    let category =
        category.ok_or_else(|| AppError::internal("product references a missing category"))?;
    Ok((Product::from(product), Category::from(category)))
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<(Product, Category)>> {
        let result = product::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await?;

        result.map(with_category).transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>> {
        let result = product::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col((
                    product::Entity,
                    product::Column::Name,
                ))))
                .eq(name.trim().to_lowercase()),
            )
            .one(&self.db)
            .await?;
        Ok(result.map(Product::from))
    }

    async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    async fn list(&self) -> AppResult<Vec<(Product, Category)>> {
        let rows = product::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await?;

        rows.into_iter().map(with_category).collect()
    }

    async fn list_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<(Product, Category)>, u64)> {
        let paginator = product::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(product::Column::Name)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        let data = rows.into_iter().map(with_category).collect::<AppResult<_>>()?;

        Ok((data, total))
    }

    async fn for_category(&self, category_id: Uuid) -> AppResult<Vec<(Product, Category)>> {
        let rows = product::Entity::find()
            .find_also_related(category::Entity)
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await?;

        rows.into_iter().map(with_category).collect()
    }

    async fn search(&self, term: &str) -> AppResult<Vec<(Product, Category)>> {
        let mut query = product::Entity::find().find_also_related(category::Entity);

        let term = term.trim().to_lowercase();
        if !term.is_empty() {
            let pattern = format!("%{}%", term);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            product::Entity,
                            product::Column::Name,
                        ))))
                        .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            product::Entity,
                            product::Column::Description,
                        ))))
                        .like(pattern),
                    ),
            );
        }

        let rows = query
            .order_by_asc(product::Column::Name)
            .all(&self.db)
            .await?;

        rows.into_iter().map(with_category).collect()
    }

    async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let now = Utc::now();
        let active_model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            img_url: Set(input.img_url),
            sku: Set(input.sku),
            stock_quantity: Set(input.stock_quantity),
            category_id: Set(input.category_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = model.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.img_url = Set(input.img_url);
        active.sku = Set(input.sku);
        active.stock_quantity = Set(input.stock_quantity);
        active.category_id = Set(input.category_id);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn decrement_stock(&self, id: Uuid, quantity: i32) -> AppResult<bool> {
        let result = product::Entity::update_many()
            .col_expr(
                product::Column::StockQuantity,
                Expr::col(product::Column::StockQuantity).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::StockQuantity.gte(quantity))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
