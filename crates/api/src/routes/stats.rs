use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Stats routes mounted at `/stats`.
///
/// ```text
/// GET    /                  -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(stats::get_stats))
}
