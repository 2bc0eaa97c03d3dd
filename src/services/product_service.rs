//! Product service - catalog product use cases and the purchase path.
//!
//! Create and update enforce name uniqueness and category existence
//! before any write. `buy_product` delegates the check-and-decrement to
//! the repository's conditional update so concurrent purchases can never
//! oversubscribe stock.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{ProductInput, ProductResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::Paginated;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Get product by ID with its category name populated
    async fn get_product(&self, id: Uuid) -> AppResult<ProductResponse>;

    /// List all products ordered by name
    async fn list_products(&self) -> AppResult<Vec<ProductResponse>>;

    /// Fetch one page of products.
    ///
    /// Page number and size must be positive; a page past the last one
    /// (for a non-empty result set) does not resolve.
    async fn list_products_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<Paginated<ProductResponse>>;

    /// List products belonging to a category
    async fn products_for_category(&self, category_id: Uuid) -> AppResult<Vec<ProductResponse>>;

    /// Case-insensitive substring search over name and description
    async fn search_products(&self, term: &str) -> AppResult<Vec<ProductResponse>>;

    /// Create a product, enforcing name uniqueness and category existence
    async fn create_product(&self, input: ProductInput) -> AppResult<ProductResponse>;

    /// Overwrite a product's fields, enforcing the same invariants
    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<ProductResponse>;

    /// Delete a product by ID
    async fn delete_product(&self, id: Uuid) -> AppResult<()>;

    /// Purchase `quantity` units of the product with this name.
    ///
    /// The stock check and decrement are one atomic unit relative to
    /// concurrent purchases of the same product.
    async fn buy_product(&self, name: &str, quantity: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    /// Create new product service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn validate_input(input: &ProductInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if input.price < Decimal::ZERO {
            return Err(AppError::validation("Price must not be negative"));
        }
        if input.stock_quantity < 0 {
            return Err(AppError::validation("Stock quantity must not be negative"));
        }
        Ok(())
    }

    /// Re-fetch a product with its category joined for the response
    async fn fetch_response(&self, id: Uuid) -> AppResult<ProductResponse> {
        let pair = self.uow.products().find_by_id(id).await?.ok_or_not_found()?;
        Ok(ProductResponse::from(pair))
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn get_product(&self, id: Uuid) -> AppResult<ProductResponse> {
        self.fetch_response(id).await
    }

    async fn list_products(&self) -> AppResult<Vec<ProductResponse>> {
        let rows = self.uow.products().list().await?;
        Ok(rows.into_iter().map(ProductResponse::from).collect())
    }

    async fn list_products_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> AppResult<Paginated<ProductResponse>> {
        if page == 0 || per_page == 0 {
            return Err(AppError::validation(
                "Page number and page size must be positive",
            ));
        }

        let (rows, total) = self.uow.products().list_paginated(page, per_page).await?;

        let total_pages = total.div_ceil(per_page);
        if total > 0 && page > total_pages {
            return Err(AppError::NotFound);
        }

        let data = rows.into_iter().map(ProductResponse::from).collect();
        Ok(Paginated::new(data, page, per_page, total))
    }

    async fn products_for_category(&self, category_id: Uuid) -> AppResult<Vec<ProductResponse>> {
        let rows = self.uow.products().for_category(category_id).await?;
        Ok(rows.into_iter().map(ProductResponse::from).collect())
    }

    async fn search_products(&self, term: &str) -> AppResult<Vec<ProductResponse>> {
        let rows = self.uow.products().search(term).await?;
        Ok(rows.into_iter().map(ProductResponse::from).collect())
    }

    async fn create_product(&self, input: ProductInput) -> AppResult<ProductResponse> {
        Self::validate_input(&input)?;

        if self.uow.products().exists_by_name(&input.name).await? {
            return Err(AppError::duplicate("Product"));
        }
        if !self.uow.categories().exists(input.category_id).await? {
            return Err(AppError::referential("Category"));
        }

        let created = self.uow.products().create(input).await?;
        self.fetch_response(created.id).await
    }

    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<ProductResponse> {
        Self::validate_input(&input)?;

        let (current, _) = self.uow.products().find_by_id(id).await?.ok_or_not_found()?;

        // The new name may not collide with another product
        if let Some(existing) = self.uow.products().find_by_name(&input.name).await? {
            if existing.id != current.id {
                return Err(AppError::duplicate("Product"));
            }
        }
        if !self.uow.categories().exists(input.category_id).await? {
            return Err(AppError::referential("Category"));
        }

        let updated = self.uow.products().update(id, input).await?;
        self.fetch_response(updated.id).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await
    }

    async fn buy_product(&self, name: &str, quantity: i32) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be positive"));
        }

        let product = self
            .uow
            .products()
            .find_by_name(name)
            .await?
            .ok_or_not_found()?;

        if quantity > product.stock_quantity {
            return Err(AppError::InsufficientStock);
        }

        // The read above can be stale under concurrency; the conditional
        // decrement re-checks the stock inside the write itself.
        let applied = self
            .uow
            .products()
            .decrement_stock(product.id, quantity)
            .await?;

        if !applied {
            return Err(AppError::InsufficientStock);
        }

        Ok(())
    }
}
