//! Application services layer - use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and use the Unit of Work for repository access.

mod account_service;
mod auth_service;
mod category_service;
pub mod container;
mod product_service;

pub use container::Services;

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator, Claims, LoginOutcome};
pub use category_service::{CategoryManager, CategoryService};
pub use product_service::{ProductManager, ProductService};
