//! Backlog item model and list filters.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use tsumi_core::error::CoreError;
use tsumi_core::item::{ItemStatus, ItemType};
use tsumi_core::stats::ItemSnapshot;
use tsumi_core::transition::ItemProgress;
use tsumi_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `backlog_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogItem {
    pub id: DbId,
    pub user_id: String,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub title: String,
    pub image_url: Option<String>,
    pub external_id: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ItemStatus,
    pub added_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub clear_time_minutes: Option<i32>,
    pub current_episode: Option<i32>,
    pub total_episodes: Option<i32>,
    pub current_page: Option<i32>,
    pub total_pages: Option<i32>,
    /// Opaque catalog-specific document.
    pub metadata: Option<Json<serde_json::Value>>,
}

impl BacklogItem {
    /// The mutable tracking fields, as consumed by the transition engine.
    pub fn progress(&self) -> ItemProgress {
        ItemProgress {
            status: self.status,
            clear_time_minutes: self.clear_time_minutes,
            current_episode: self.current_episode,
            total_episodes: self.total_episodes,
            current_page: self.current_page,
            total_pages: self.total_pages,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    /// The fields the statistics aggregator reads.
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            item_type: self.item_type,
            status: self.status,
            completed_at: self.completed_at,
            clear_time_minutes: self.clear_time_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /backlog`. Both filters are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BacklogListParams {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub status: Option<String>,
}

/// Parsed form of [`BacklogListParams`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacklogFilter {
    pub item_type: Option<ItemType>,
    pub status: Option<ItemStatus>,
}

impl BacklogListParams {
    /// Parse the raw filter strings. Empty strings mean "no filter".
    pub fn parse(&self) -> Result<BacklogFilter, CoreError> {
        Ok(BacklogFilter {
            item_type: parse_filter(self.item_type.as_deref())?,
            status: parse_filter(self.status.as_deref())?,
        })
    }
}

fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, CoreError>
where
    T: std::str::FromStr<Err = CoreError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}
