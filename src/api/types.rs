//! Shared state for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::db;
use crate::prediction::PredictionClient;

/// Shared context for all routes: where the records database lives and
/// the configured prediction client. Each request opens its own SQLite
/// connection; cross-request coordination is the store's job.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
    pub predictor: Arc<PredictionClient>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, predictor: PredictionClient) -> Self {
        Self {
            db_path: Arc::new(db_path),
            predictor: Arc::new(predictor),
        }
    }

    /// Open a connection for the current request.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        db::open_database(&self.db_path).map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_migrates_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(dir.path().join("clinora.db"), PredictionClient::new(""));
        let conn = ctx.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 7);
    }
}
