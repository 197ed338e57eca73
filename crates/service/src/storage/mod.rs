//! Store backends for the repository traits.
//!
//! `SeaOrmStore` is the production backend; each domain module implements
//! its repository trait for it under `repo/seaorm.rs`. `memory::InMemoryStore`
//! implements every trait over one shared lock, so reference checks and
//! conditional writes behave like the database does.

use sea_orm::DatabaseConnection;

pub mod memory;

#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}
