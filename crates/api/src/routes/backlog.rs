//! Route definitions for the backlog.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::backlog;
use crate::state::AppState;

/// Backlog routes mounted at `/backlog`.
///
/// ```text
/// GET    /                  -> list_items
/// POST   /                  -> add_item
/// PATCH  /{id}              -> update_item
/// DELETE /{id}              -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(backlog::list_items).post(backlog::add_item))
        .route(
            "/{id}",
            patch(backlog::update_item).delete(backlog::delete_item),
        )
}
