//! Backlog statistics handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tsumi_core::stats::compute_stats;
use tsumi_db::repositories::BacklogItemRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /stats`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    /// RFC 3339 instant to compute "this month" and the trend against.
    pub as_of: Option<String>,
}

/// GET /api/v1/stats
///
/// Aggregate counts, average clear time and the six-month completion
/// trend for the caller. Months follow the configured stats calendar.
pub async fn get_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let offset = state.config.stats_utc_offset;

    let as_of = match params.as_of.as_deref().map(str::trim) {
        None | Some("") => Utc::now().with_timezone(&offset),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| AppError::BadRequest(format!("asOf must be an RFC 3339 timestamp: {e}")))?
            .with_timezone(&offset),
    };

    let snapshots = BacklogItemRepo::snapshots_for_user(&state.pool, &auth.user_id).await?;
    let stats = compute_stats(&snapshots, as_of)?;

    tracing::debug!(user_id = %auth.user_id, items = snapshots.len(), "Stats computed");

    Ok(Json(stats))
}
