//! Product domain entity and projections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub sku: String,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or overwriting a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub sku: String,
    pub stock_quantity: i32,
    pub category_id: Uuid,
}

/// Product response projection with its category name populated.
///
/// The category is fetched with an explicit join when the product is
/// loaded; there is no lazily resolved reference graph.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: String,
    pub sku: String,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(Product, Category)> for ProductResponse {
    fn from((product, category): (Product, Category)) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            sku: product.sku,
            stock_quantity: product.stock_quantity,
            category_id: product.category_id,
            category_name: category.name,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
