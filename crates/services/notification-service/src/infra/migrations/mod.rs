//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}
//!
//! The users collection is owned by the identity provider and is never
//! migrated here.

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_notifications_table;
mod m20250101_000002_create_user_devices_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_notifications_table::Migration),
            Box::new(m20250101_000002_create_user_devices_table::Migration),
        ]
    }
}
