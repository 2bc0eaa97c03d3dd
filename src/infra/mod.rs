//! Infrastructure layer - external systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AccountRepository, AccountStore, CategoryRepository, CategoryStore, ProductRepository,
    ProductStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxStore, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAccountRepository, MockCategoryRepository, MockProductRepository};
