//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_services;
mod m20240101_000003_create_bookings;
mod m20240101_000004_create_trips;
mod m20240101_000005_create_posts;
mod m20240101_000006_create_messages;
mod m20240101_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_services::Migration),
            Box::new(m20240101_000003_create_bookings::Migration),
            Box::new(m20240101_000004_create_trips::Migration),
            Box::new(m20240101_000005_create_posts::Migration),
            Box::new(m20240101_000006_create_messages::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000007_add_indexes::Migration),
        ]
    }
}
