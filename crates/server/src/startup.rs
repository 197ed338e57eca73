use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use configs::{AppConfig, CorsConfig};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Browser origins are checked against the configured patterns; requests
/// without an `Origin` header are not affected.
pub fn build_cors(cors: &CorsConfig) -> CorsLayer {
    let cors = cors.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin.to_str().map(|o| cors.allows(o)).unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Open the pool (pinged on connect) and optionally migrate.
pub async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection, StartupError> {
    let db = models::db::connect_with_config(&config.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    if config.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Database(format!("migrations failed: {e}")))?;
        info!("migrations applied");
    }
    Ok(db)
}

/// A bound listener plus the router it will serve.
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Bind the configured address. The static client bundle is only
    /// served in production and only when its directory exists.
    pub async fn bind(config: &AppConfig, state: AppState) -> Result<Self, StartupError> {
        let static_dir = if config.environment.is_production()
            && common::env::check_static_dir(&config.server.static_dir).await
        {
            Some(config.server.static_dir.as_str())
        } else {
            None
        };
        let router = routes::build_router(state, build_cors(&config.cors), static_dir);

        let addr = config.server.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| StartupError::Runtime(format!("cannot bind {addr}: {e}")))?;
        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, StartupError> {
        self.listener.local_addr().map_err(|e| StartupError::Runtime(e.to_string()))
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(%addr, "listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                warn!("shutdown requested; draining connections");
            })
            .await?;
        info!("server stopped");
        Ok(())
    }
}
