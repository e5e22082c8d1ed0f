//! HTTP API for SubTrack.
//!
//! # Responsibility
//! - Expose subscription CRUD as JSON endpoints.
//! - Translate core service outcomes into status codes and error bodies.
//!
//! # Invariants
//! - Every request opens and drops its own SQLite connection.
//! - Internal failure detail is logged, never returned to callers.

#![forbid(unsafe_code)]

pub mod config;
pub mod http;
mod state;

pub use config::{ConfigError, ServerConfig};
pub use http::build_router;
pub use http::error::{ApiError, INTERNAL_ERROR_MESSAGE};
pub use state::AppState;

use log::info;
use subtrack_core::db::open_db;
use subtrack_core::{seed_demo_subscriptions, RepoError, SqliteSubscriptionRepository};

/// Migrates the database and optionally seeds demo rows.
///
/// Runs once before the listener is bound so request handlers never race
/// on the first migration.
pub fn prepare_database(config: &ServerConfig) -> Result<(), RepoError> {
    let conn = open_db(&config.db_path)?;
    if config.seed_demo {
        let inserted = seed_demo_subscriptions(&SqliteSubscriptionRepository::new(&conn))?;
        info!("event=db_prepare module=server status=ok seeded={inserted}");
    } else {
        info!("event=db_prepare module=server status=ok seeded=0");
    }
    Ok(())
}
