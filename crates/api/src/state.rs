use std::sync::Arc;

use tsumi_catalog::Catalogs;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tsumi_db::DbPool,
    /// Server configuration (JWT settings, stats calendar).
    pub config: Arc<ServerConfig>,
    /// External catalog adapters used by search.
    pub catalogs: Catalogs,
}
