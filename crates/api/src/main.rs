use anyhow::{Context, Result};
use tracing::{info, warn};

use persistence::Documents;
use sleepy_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!("Starting Sleepy v{}", env!("CARGO_PKG_VERSION"));

    if !config.auth.is_configured() {
        warn!("No shared secret configured, every authenticated request will fail");
    }

    let paths = config.storage.document_paths();
    let documents = Documents::json_files(&paths);
    if config.storage.seed_missing {
        let created = documents
            .seed_missing()
            .await
            .with_context(|| format!("Failed to seed documents in {}", paths.data_dir.display()))?;
        if !created.is_empty() {
            info!(documents = ?created, "Created missing documents");
        }
    }
    info!(data_dir = %paths.data_dir.display(), "Using document store");

    let addr = config.socket_addr()?;
    let app = app::create_app(config, documents);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
