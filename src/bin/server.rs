use std::sync::Arc;

use tracing::{error, info};

use ladders::env_config;
use ladders::history::HistoryStore;
use ladders::server::create_router_with_static;

#[tokio::main]
async fn main() {
    env_config::init_tracing();
    let _base = env_config::init_base_path();
    let port = env_config::server_port();
    let db_path = env_config::database_path();
    let static_dir = env_config::static_dir();
    info!("Starting ladders history server...");

    let store = match HistoryStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(path = %db_path.display(), error = %e, "cannot open history store");
            std::process::exit(1);
        }
    };
    if !static_dir.is_dir() {
        info!(dir = %static_dir.display(), "static directory not found; only the API is served");
    }
    let app = create_router_with_static(store, &static_dir);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            error!(port, error = %e, "cannot bind");
            std::process::exit(1);
        }
    };
    info!("Server running on http://localhost:{}. Press Ctrl+C to stop.", port);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
    }

    info!("Stopping server...");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
}
