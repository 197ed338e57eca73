use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use server::startup::connect_database;
use server::{AppState, Server};
use tracing::{error, info};
use uuid::Uuid;

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal(service_id: Uuid) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(service = "server", event = "shutdown_signal", %service_id, pid = std::process::id(), "shutting down");
}

async fn serve(config: AppConfig, service_id: Uuid) -> ExitCode {
    let db = match connect_database(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!(service = "server", event = "database_failed", error = %e, "database unavailable");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::postgres(db, &config);
    let server = match Server::bind(&config, state).await {
        Ok(server) => server,
        Err(e) => {
            error!(service = "server", event = "bind_failed", error = %e, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    match server.run_until(shutdown_signal(service_id)).await {
        Ok(()) => {
            info!(service = "server", event = "stop", %service_id, pid = std::process::id(), "server stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "server", event = "run_failed", error = %e, "server returned error");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    dotenv().ok();

    // Logging format depends on the environment, which is only known once
    // the config is loaded; a config failure is reported in dev format.
    let loaded = AppConfig::load_and_validate();
    let production = loaded.as_ref().map(|c| c.environment.is_production()).unwrap_or(false);
    common::utils::logging::init_for(production);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = config.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        environment = config.environment.as_str(),
        threads = config.server.worker_threads.unwrap_or_default(),
        "server service starting"
    );

    rt.block_on(serve(config, service_id))
}
