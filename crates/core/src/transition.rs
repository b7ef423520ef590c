//! Partial updates and status-driven timestamp derivation.
//!
//! [`apply_patch`] merges an [`ItemPatch`] into the current [`ItemProgress`]
//! of a row. Fields absent from the patch are left untouched; fields present
//! (including explicit `null`) overwrite. After the merge, entering
//! `IN_PROGRESS` stamps `started_at` and entering `COMPLETED` stamps
//! `completed_at`, but only when the stored value was null.
//!
//! Any status may move to any other status.

use serde::{Deserialize, Deserializer};

use crate::dedup::validate_non_negative;
use crate::error::CoreError;
use crate::item::ItemStatus;
use crate::types::Timestamp;

/// The mutable tracking state of a backlog row.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemProgress {
    pub status: ItemStatus,
    pub clear_time_minutes: Option<i32>,
    pub current_episode: Option<i32>,
    pub total_episodes: Option<i32>,
    pub current_page: Option<i32>,
    pub total_pages: Option<i32>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// Body of `PATCH /backlog/{id}`.
///
/// The outer `Option` records whether a field was present in the request,
/// the inner one whether it was `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub status: Option<ItemStatus>,
    #[serde(default, deserialize_with = "present")]
    pub clear_time_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub current_episode: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub total_episodes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub current_page: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub total_pages: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub started_at: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "present")]
    pub completed_at: Option<Option<Timestamp>>,
}

/// Mark a field as present whenever serde visits it, even for `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ItemPatch {
    /// Reject negative progress values. Nothing else is validated: clear
    /// time on a book or pages on a game are accepted as-is.
    pub fn validate(&self) -> Result<(), CoreError> {
        let numeric = [
            ("clearTimeMinutes", self.clear_time_minutes),
            ("currentEpisode", self.current_episode),
            ("totalEpisodes", self.total_episodes),
            ("currentPage", self.current_page),
            ("totalPages", self.total_pages),
        ];
        for (field, value) in numeric {
            validate_non_negative(field, value.flatten())?;
        }
        Ok(())
    }
}

/// Merge `patch` into `existing` and derive timestamps.
///
/// The derivation looks at the *stored* timestamps, so a patch that both
/// enters `IN_PROGRESS` and supplies `startedAt` on a row that was never
/// started still gets `now`.
pub fn apply_patch(existing: &ItemProgress, patch: &ItemPatch, now: Timestamp) -> ItemProgress {
    let mut next = existing.clone();

    if let Some(status) = patch.status {
        next.status = status;
    }
    merge(&mut next.clear_time_minutes, patch.clear_time_minutes);
    merge(&mut next.current_episode, patch.current_episode);
    merge(&mut next.total_episodes, patch.total_episodes);
    merge(&mut next.current_page, patch.current_page);
    merge(&mut next.total_pages, patch.total_pages);
    merge(&mut next.started_at, patch.started_at);
    merge(&mut next.completed_at, patch.completed_at);

    match patch.status {
        Some(ItemStatus::InProgress) if existing.started_at.is_none() => {
            next.started_at = Some(now);
        }
        Some(ItemStatus::Completed) if existing.completed_at.is_none() => {
            next.completed_at = Some(now);
        }
        _ => {}
    }

    next
}

fn merge<T: Copy>(slot: &mut Option<T>, incoming: Option<Option<T>>) {
    if let Some(value) = incoming {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap()
    }

    fn fresh() -> ItemProgress {
        ItemProgress {
            status: ItemStatus::Backlog,
            clear_time_minutes: None,
            current_episode: None,
            total_episodes: Some(12),
            current_page: None,
            total_pages: None,
            started_at: None,
            completed_at: None,
        }
    }

    fn patch(json: serde_json::Value) -> ItemPatch {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn absent_fields_are_untouched() {
        let next = apply_patch(&fresh(), &patch(serde_json::json!({})), t(1));
        assert_eq!(next, fresh());
    }

    #[test]
    fn explicit_null_is_distinguished_from_absent() {
        let p = patch(serde_json::json!({"totalEpisodes": null}));
        assert_eq!(p.total_episodes, Some(None));
        assert_eq!(p.current_episode, None);

        let next = apply_patch(&fresh(), &p, t(1));
        assert_eq!(next.total_episodes, None);
    }

    #[test]
    fn entering_in_progress_stamps_started_at_once() {
        let first = apply_patch(
            &fresh(),
            &patch(serde_json::json!({"status": "IN_PROGRESS"})),
            t(1),
        );
        assert_eq!(first.status, ItemStatus::InProgress);
        assert_eq!(first.started_at, Some(t(1)));

        let again = apply_patch(
            &first,
            &patch(serde_json::json!({"status": "IN_PROGRESS"})),
            t(5),
        );
        assert_eq!(again.started_at, Some(t(1)));
    }

    #[test]
    fn entering_completed_stamps_completed_at_once() {
        let done = apply_patch(
            &fresh(),
            &patch(serde_json::json!({"status": "COMPLETED", "clearTimeMinutes": 125})),
            t(2),
        );
        assert_eq!(done.completed_at, Some(t(2)));
        assert_eq!(done.clear_time_minutes, Some(125));
        assert_eq!(done.started_at, None);

        let reopened = apply_patch(
            &done,
            &patch(serde_json::json!({"status": "BACKLOG"})),
            t(3),
        );
        let redone = apply_patch(
            &reopened,
            &patch(serde_json::json!({"status": "COMPLETED"})),
            t(4),
        );
        assert_eq!(redone.completed_at, Some(t(2)));
    }

    #[test]
    fn clearing_completed_at_re_arms_derivation() {
        let done = apply_patch(
            &fresh(),
            &patch(serde_json::json!({"status": "COMPLETED"})),
            t(2),
        );
        let cleared = apply_patch(
            &done,
            &patch(serde_json::json!({"completedAt": null})),
            t(3),
        );
        assert_eq!(cleared.completed_at, None);

        let redone = apply_patch(
            &cleared,
            &patch(serde_json::json!({"status": "COMPLETED"})),
            t(4),
        );
        assert_eq!(redone.completed_at, Some(t(4)));
    }

    #[test]
    fn explicit_timestamp_is_applied_when_already_started() {
        let started = ItemProgress {
            status: ItemStatus::InProgress,
            started_at: Some(t(1)),
            ..fresh()
        };
        let backdated = t(1) - Duration::days(30);
        let p = patch(serde_json::json!({"startedAt": backdated.to_rfc3339()}));

        let next = apply_patch(&started, &p, t(5));
        assert_eq!(next.started_at, Some(backdated));
    }

    #[test]
    fn any_status_may_follow_any_other() {
        let dropped = ItemProgress {
            status: ItemStatus::Dropped,
            ..fresh()
        };
        let next = apply_patch(
            &dropped,
            &patch(serde_json::json!({"status": "COMPLETED"})),
            t(9),
        );
        assert_eq!(next.status, ItemStatus::Completed);
        assert_eq!(next.completed_at, Some(t(9)));
    }

    #[test]
    fn negative_progress_is_rejected() {
        let p = patch(serde_json::json!({"currentPage": -3}));
        assert_matches!(p.validate(), Err(CoreError::Validation(_)));

        let ok = patch(serde_json::json!({"currentPage": null, "clearTimeMinutes": 0}));
        assert!(ok.validate().is_ok());
    }
}
