//! Response envelope types for API handlers.
//!
//! Each endpoint family has its own top-level key (`items`, `item`,
//! `results`, `success`); use these instead of ad-hoc `json!` bodies.

use serde::Serialize;

/// `{ "items": [...] }` for collection listings.
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T: Serialize> {
    pub items: Vec<T>,
}

/// `{ "item": ... }` for a single backlog entry.
#[derive(Debug, Serialize)]
pub struct ItemResponse<T: Serialize> {
    pub item: T,
}

/// `{ "results": [...] }` for catalog search.
#[derive(Debug, Serialize)]
pub struct ResultsResponse<T: Serialize> {
    pub results: Vec<T>,
}

/// `{ "success": true }` for deletions.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
