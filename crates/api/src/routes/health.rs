//! Root-level liveness endpoint.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub catalogs: CatalogStatus,
    /// Offset of the calendar that `/stats` buckets by, e.g. `+09:00`.
    pub stats_utc_offset: String,
}

/// Which catalog searches can reach their upstream.
///
/// Anime and book catalogs need no credentials; game search is only live
/// with a RAWG key.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub rawg_enabled: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = tsumi_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        catalogs: CatalogStatus {
            rawg_enabled: state.config.catalog.rawg_api_key.is_some(),
        },
        stats_utc_offset: state.config.stats_utc_offset.to_string(),
    })
}

/// `GET /health`, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
