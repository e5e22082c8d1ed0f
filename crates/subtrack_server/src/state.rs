//! Shared handler state and per-operation storage access.

use crate::http::error::ApiError;
use std::path::PathBuf;
use std::sync::Arc;
use subtrack_core::db::open_db;
use subtrack_core::{ServiceResult, SqliteSubscriptionRepository, SubscriptionService};

/// Service bound to one short-lived connection.
pub type ScopedService<'conn> = SubscriptionService<SqliteSubscriptionRepository<'conn>>;

#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
        }
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Runs one service operation on a blocking worker.
    ///
    /// The connection is opened inside the worker and dropped when `f`
    /// returns, on success and on every error path.
    pub async fn with_service<T, F>(&self, operation: &'static str, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&ScopedService<'conn>) -> ServiceResult<T> + Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || {
            let conn =
                open_db(db_path.as_path()).map_err(|err| ApiError::internal(operation, err))?;
            let service = SubscriptionService::new(SqliteSubscriptionRepository::new(&conn));
            let outcome = f(&service);
            outcome.map_err(|err| ApiError::from_service(operation, err))
        })
        .await
        .map_err(|err| ApiError::internal(operation, err))?
    }
}
