//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_account;
mod m20240101_000002_create_user;
mod m20240101_000003_create_client;
mod m20240101_000004_create_vendor;
mod m20240101_000005_create_invoice;
mod m20240101_000006_create_expense;
mod m20240101_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_account::Migration),
            Box::new(m20240101_000002_create_user::Migration),
            Box::new(m20240101_000003_create_client::Migration),
            Box::new(m20240101_000004_create_vendor::Migration),
            Box::new(m20240101_000005_create_invoice::Migration),
            Box::new(m20240101_000006_create_expense::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000007_add_indexes::Migration),
        ]
    }
}
