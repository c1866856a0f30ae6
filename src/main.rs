use tracing_subscriber::EnvFilter;

use clinora::api::{start_server, ApiContext};
use clinora::config::{self, AppConfig};
use clinora::db;
use clinora::prediction::PredictionClient;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Clinora starting v{}", config::APP_VERSION);

    let cfg = AppConfig::from_env();
    if cfg.prediction_endpoint.is_empty() {
        // Not fatal: the first prediction call will report the failure
        tracing::warn!("API_URL is not set; prediction calls will fail until it is");
    }

    if let Some(parent) = cfg.database_path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create data directory");
    }
    // Opening once up front applies migrations before the first request
    db::open_database(&cfg.database_path).expect("failed to open records database");

    let ctx = ApiContext::new(
        cfg.database_path.clone(),
        PredictionClient::new(&cfg.prediction_endpoint),
    );

    let mut server = start_server(ctx, cfg.bind_addr)
        .await
        .expect("failed to start server");
    tracing::info!(addr = %server.addr, "Clinora listening");

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    server.shutdown();
}
