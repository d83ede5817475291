//! Database migrations for the hospital administration service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_10_000100_create_users;
mod m2025_06_10_000200_create_hospitals;
mod m2025_06_10_000300_create_profiles;
mod m2025_06_10_000400_create_roles;
mod m2025_06_12_000100_create_patients;
mod m2025_06_12_000200_create_assets;
mod m2025_06_12_000300_create_suppliers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_10_000100_create_users::Migration),
            Box::new(m2025_06_10_000200_create_hospitals::Migration),
            Box::new(m2025_06_10_000300_create_profiles::Migration),
            Box::new(m2025_06_10_000400_create_roles::Migration),
            Box::new(m2025_06_12_000100_create_patients::Migration),
            Box::new(m2025_06_12_000200_create_assets::Migration),
            Box::new(m2025_06_12_000300_create_suppliers::Migration),
        ]
    }
}
