#![cfg(test)]
use migration::MigratorTrait;
use tokio::sync::OnceCell;

use crate::storage::SeaOrmStore;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn db_config() -> configs::DatabaseConfig {
    configs::DatabaseConfig {
        url: models::db::DATABASE_URL.clone(),
        max_connections: 20,
        min_connections: 1,
        acquire_timeout_secs: 10,
        ..Default::default()
    }
}

/// A store over the test database, or `None` when `SKIP_DB_TESTS` is set
/// or Postgres is unreachable.
pub async fn get_store() -> Option<SeaOrmStore> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match models::db::connect_with_config(&db_config()).await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {e}");
                    false
                }
            }
        })
        .await;
    if !migrated {
        return None;
    }
    // Fresh connection for the current test's runtime
    models::db::connect_with_config(&db_config()).await.ok().map(SeaOrmStore::new)
}
