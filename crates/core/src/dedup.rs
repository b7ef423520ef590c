//! Add-item validation and dedup key derivation.
//!
//! A backlog row is identified for deduplication by the triple
//! `(user_id, external_id, item_type)`. This module turns an incoming add
//! request into a fully-resolved [`NewItem`] whose key the repository can
//! insert-or-get atomically. The uniqueness itself is enforced by the
//! storage layer, never by a check-then-insert here.

use serde::Deserialize;

use crate::error::CoreError;
use crate::item::{ItemStatus, ItemType};
use crate::types::Timestamp;

/// Prefix of synthetic external ids assigned to manually entered items.
pub const MANUAL_EXTERNAL_ID_PREFIX: &str = "manual-";

// ---------------------------------------------------------------------------
// Request DTO
// ---------------------------------------------------------------------------

/// Body of `POST /backlog`.
///
/// Every field is optional at the wire level so missing `type` / `title`
/// surface as a validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub external_id: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub total_episodes: Option<i32>,
    pub total_pages: Option<i32>,
    /// When set, the item has no catalog match and receives a synthetic
    /// external id.
    #[serde(default)]
    pub manual: bool,
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Where an item's external id comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalRef {
    /// Identifier assigned by the source catalog.
    Catalog(String),
    /// No catalog match; a synthetic id is generated on insert.
    Manual,
}

/// A validated add request that has not yet been bound to a user and time.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub item_type: ItemType,
    pub title: String,
    pub external_ref: ExternalRef,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub total_episodes: Option<i32>,
    pub total_pages: Option<i32>,
}

impl AddItemRequest {
    /// Validate the request and convert it into an [`ItemDraft`].
    ///
    /// `type` and a non-blank `title` are required. A catalog request
    /// without an `externalId` falls back to the title as its id.
    pub fn into_draft(self) -> Result<ItemDraft, CoreError> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let (Some(raw_type), Some(title)) = (self.item_type.as_deref(), title) else {
            return Err(CoreError::Validation("type and title are required".into()));
        };
        let item_type: ItemType = raw_type.parse()?;

        validate_non_negative("totalEpisodes", self.total_episodes)?;
        validate_non_negative("totalPages", self.total_pages)?;

        let external_ref = if self.manual {
            ExternalRef::Manual
        } else {
            let id = self
                .external_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| title.clone());
            ExternalRef::Catalog(id)
        };

        Ok(ItemDraft {
            item_type,
            title,
            external_ref,
            image_url: self.image_url,
            description: self.description,
            metadata: self.metadata.filter(|m| !m.is_null()),
            total_episodes: self.total_episodes,
            total_pages: self.total_pages,
        })
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A row ready for insert-or-get, with its dedup key fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub user_id: String,
    pub item_type: ItemType,
    pub title: String,
    pub external_id: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub status: ItemStatus,
    pub added_at: Timestamp,
    pub total_episodes: Option<i32>,
    pub total_pages: Option<i32>,
}

impl NewItem {
    /// Bind a draft to its owner and creation time.
    ///
    /// New rows always start in [`ItemStatus::Backlog`] with no progress.
    pub fn prepare(user_id: &str, draft: ItemDraft, now: Timestamp) -> Self {
        let external_id = match draft.external_ref {
            ExternalRef::Catalog(id) => id,
            ExternalRef::Manual => manual_external_id(now),
        };

        Self {
            user_id: user_id.to_string(),
            item_type: draft.item_type,
            title: draft.title,
            external_id,
            image_url: draft.image_url,
            description: draft.description,
            metadata: draft.metadata,
            status: ItemStatus::Backlog,
            added_at: now,
            total_episodes: draft.total_episodes,
            total_pages: draft.total_pages,
        }
    }
}

/// Build a synthetic external id for a manual entry.
///
/// The millisecond timestamp keeps ids readable and ordered; the random
/// suffix keeps two manual adds in the same millisecond from collapsing
/// into one row.
pub fn manual_external_id(now: Timestamp) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{MANUAL_EXTERNAL_ID_PREFIX}{}-{}",
        now.timestamp_millis(),
        &suffix[..8]
    )
}

pub(crate) fn validate_non_negative(field: &str, value: Option<i32>) -> Result<(), CoreError> {
    match value {
        Some(v) if v < 0 => Err(CoreError::Validation(format!(
            "{field} must not be negative"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn request(item_type: &str, title: &str) -> AddItemRequest {
        AddItemRequest {
            item_type: Some(item_type.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_type_or_title_is_rejected() {
        let no_type = AddItemRequest {
            title: Some("Elden Ring".into()),
            ..Default::default()
        };
        assert_matches!(no_type.into_draft(), Err(CoreError::Validation(_)));

        let no_title = AddItemRequest {
            item_type: Some("GAME".into()),
            ..Default::default()
        };
        assert_matches!(no_title.into_draft(), Err(CoreError::Validation(_)));

        assert_matches!(
            request("GAME", "   ").into_draft(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_matches!(
            request("MOVIE", "Akira").into_draft(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn external_id_defaults_to_title() {
        let draft = request("BOOK", "鬼滅の刃 1巻").into_draft().unwrap();
        assert_eq!(draft.external_ref, ExternalRef::Catalog("鬼滅の刃 1巻".into()));
    }

    #[test]
    fn explicit_external_id_is_kept() {
        let mut req = request("BOOK", "鬼滅の刃 1巻");
        req.external_id = Some("ol123".into());
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.external_ref, ExternalRef::Catalog("ol123".into()));
    }

    #[test]
    fn manual_entries_get_synthetic_ids() {
        let mut req = request("ANIME", "Homebrew Anime");
        req.manual = true;
        req.external_id = Some("ignored".into());
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.external_ref, ExternalRef::Manual);

        let first = NewItem::prepare("user-1", draft.clone(), now());
        let second = NewItem::prepare("user-1", draft, now());

        assert!(first.external_id.starts_with("manual-1710504000000-"));
        assert_ne!(first.external_id, second.external_id);
    }

    #[test]
    fn negative_totals_are_rejected() {
        let mut req = request("BOOK", "Dune");
        req.total_pages = Some(-1);
        assert_matches!(req.into_draft(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn prepared_item_starts_in_backlog() {
        let mut req = request("ANIME", "Frieren");
        req.total_episodes = Some(28);
        req.metadata = Some(serde_json::json!({"score": 9.3}));

        let item = NewItem::prepare("user-1", req.into_draft().unwrap(), now());
        assert_eq!(item.status, ItemStatus::Backlog);
        assert_eq!(item.added_at, now());
        assert_eq!(item.total_episodes, Some(28));
        assert_eq!(item.metadata, Some(serde_json::json!({"score": 9.3})));
    }
}
