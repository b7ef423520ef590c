//! Handlers for a user's backlog.
//!
//! All endpoints require authentication via [`AuthUser`] and only ever
//! touch rows owned by the caller. A row owned by someone else is reported
//! exactly like a missing one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use tsumi_core::dedup::{AddItemRequest, NewItem};
use tsumi_core::error::CoreError;
use tsumi_core::transition::ItemPatch;
use tsumi_core::types::DbId;
use tsumi_db::models::backlog_item::BacklogListParams;
use tsumi_db::repositories::BacklogItemRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ItemResponse, ItemsResponse, SuccessResponse};
use crate::state::AppState;

const ENTITY: &str = "BacklogItem";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// GET /api/v1/backlog
///
/// List the caller's items, newest-added first. Optional `type` and
/// `status` filters.
pub async fn list_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BacklogListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.parse()?;
    let items = BacklogItemRepo::list_for_user(&state.pool, &auth.user_id, &filter).await?;

    Ok(Json(ItemsResponse { items }))
}

/// POST /api/v1/backlog
///
/// Add an item. Returns 201 with the new row, or 200 with the stored row
/// when the caller already has this `(externalId, type)`.
pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddItemRequest>,
) -> AppResult<impl IntoResponse> {
    let draft = input.into_draft()?;
    let new_item = NewItem::prepare(&auth.user_id, draft, Utc::now());

    let (item, created) = BacklogItemRepo::insert_or_get(&state.pool, &new_item).await?;

    let status = if created {
        tracing::info!(
            item_id = item.id,
            user_id = %auth.user_id,
            item_type = %item.item_type,
            "Backlog item added",
        );
        StatusCode::CREATED
    } else {
        tracing::debug!(
            item_id = item.id,
            user_id = %auth.user_id,
            "Backlog item already present",
        );
        StatusCode::OK
    };

    Ok((status, Json(ItemResponse { item })))
}

/// PATCH /api/v1/backlog/{id}
///
/// Partial update. Absent fields are left alone; explicit `null` clears.
/// Moving to IN_PROGRESS or COMPLETED stamps `startedAt` / `completedAt`
/// the first time.
pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    ApiJson(patch): ApiJson<ItemPatch>,
) -> AppResult<impl IntoResponse> {
    patch.validate()?;

    let item =
        BacklogItemRepo::apply_patch(&state.pool, item_id, &auth.user_id, &patch, Utc::now())
            .await?
            .ok_or_else(|| not_found(item_id))?;

    tracing::info!(item_id, user_id = %auth.user_id, status = %item.status, "Backlog item updated");

    Ok(Json(ItemResponse { item }))
}

/// DELETE /api/v1/backlog/{id}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = BacklogItemRepo::delete_for_user(&state.pool, item_id, &auth.user_id).await?;
    if !deleted {
        return Err(not_found(item_id));
    }

    tracing::info!(item_id, user_id = %auth.user_id, "Backlog item deleted");

    Ok(Json(SuccessResponse { success: true }))
}
