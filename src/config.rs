use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Clinora";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "info,clinora=debug"
}

/// Get the application data directory
/// ~/Clinora/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Clinora")
}

/// Default location of the records database
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("clinora.db")
}

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8420";

/// Runtime configuration, assembled from environment variables.
///
/// `API_URL` supplies the prediction endpoint. Its absence is not an
/// error here — an empty endpoint surfaces as a send failure on the
/// first prediction call, never at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub prediction_endpoint: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("CLINORA_BIND")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                DEFAULT_BIND_ADDR.parse().expect("default bind address is valid")
            });

        let database_path = std::env::var("CLINORA_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let prediction_endpoint = std::env::var("API_URL").unwrap_or_default();

        Self {
            bind_addr,
            database_path,
            prediction_endpoint,
        }
    }
}
