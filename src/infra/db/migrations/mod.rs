//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250110_000001_create_accounts_table;
mod m20250110_000002_create_roles_table;
mod m20250110_000003_create_categories_table;
mod m20250110_000004_create_products_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_accounts_table::Migration),
            Box::new(m20250110_000002_create_roles_table::Migration),
            Box::new(m20250110_000003_create_categories_table::Migration),
            Box::new(m20250110_000004_create_products_table::Migration),
        ]
    }
}
