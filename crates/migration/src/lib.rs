//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_company;
mod m20240301_000002_create_customer;
mod m20240301_000003_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_company::Migration),
            Box::new(m20240301_000002_create_customer::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000003_add_indexes::Migration),
        ]
    }
}
