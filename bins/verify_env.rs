//! Preflight: required variables are set and the database answers.

use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use sea_orm::{ConnectionTrait, Statement};
use tracing::{error, info};

const REQUIRED: &[&str] = &["DATABASE_URL"];

async fn check_database(config: &AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&config.database).await?;
    db.execute(Statement::from_string(db.get_database_backend(), "SELECT 1".to_owned())).await?;
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let missing = common::env::missing_vars(REQUIRED, |k| std::env::var(k).ok());
    if !missing.is_empty() {
        error!(missing = ?missing, "required environment variables are not set");
        return ExitCode::FAILURE;
    }
    info!(step = "env", "required variables present");

    let config = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(step = "config", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };
    info!(step = "config", environment = config.environment.as_str(), "configuration valid");

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(check_database(&config)) {
        Ok(()) => {
            info!(step = "database", "SELECT 1 succeeded");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(step = "database", error = %e, "database check failed");
            ExitCode::FAILURE
        }
    }
}
