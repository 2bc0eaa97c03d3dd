//! Domain layer - core business entities and logic.
//!
//! Contains the entities, value objects, and projections that represent
//! catalog concepts independent of infrastructure concerns.

pub mod account;
pub mod category;
pub mod password;
pub mod product;

pub use account::{normalize_handle, Account, AccountResponse, Role};
pub use category::{Category, CategoryResponse};
pub use password::Password;
pub use product::{Product, ProductInput, ProductResponse};
