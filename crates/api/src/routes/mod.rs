pub mod backlog;
pub mod health;
pub mod search;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /search                      catalog search (public)
///
/// /backlog                     list, add (requires auth)
/// /backlog/{id}                update, delete (requires auth)
///
/// /stats                       statistics (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/search", search::router())
        .nest("/backlog", backlog::router())
        .nest("/stats", stats::router())
}
