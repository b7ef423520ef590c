//! Catalog search handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tsumi_core::item::ItemType;

use crate::error::{AppError, AppResult};
use crate::response::ResultsResponse;
use crate::state::AppState;

/// Query parameters for `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

/// GET /api/v1/search?q=&type=GAME|ANIME|BOOK
///
/// Public. A blank query answers with an empty `results` list before
/// `type` is looked at. Upstream failures also come back empty, never as
/// an error.
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    if params.q.trim().is_empty() {
        return Ok(Json(ResultsResponse {
            results: Vec::new(),
        }));
    }

    let item_type: ItemType = params
        .item_type
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("type is required (GAME, ANIME or BOOK)".into()))?
        .parse()?;

    let results = state.catalogs.search(item_type, &params.q).await;

    tracing::debug!(%item_type, count = results.len(), "Catalog search served");

    Ok(Json(ResultsResponse { results }))
}
