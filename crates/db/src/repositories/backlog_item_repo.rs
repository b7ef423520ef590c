//! Repository for the `backlog_items` table.
//!
//! Provides insert-or-get (dedup), owner-scoped lookup, listing with
//! filters, partial updates and deletion. A row that belongs to another
//! user is reported exactly like a missing row.

use sqlx::{Sqlite, SqliteExecutor, SqlitePool};
use tsumi_core::dedup::NewItem;
use tsumi_core::stats::ItemSnapshot;
use tsumi_core::transition::{apply_patch, ItemPatch};
use tsumi_core::types::{DbId, Timestamp};

use crate::models::backlog_item::{BacklogFilter, BacklogItem};

/// Column list for `backlog_items` queries.
const COLUMNS: &str = "\
    id, user_id, item_type, title, image_url, external_id, description, \
    status, added_at, started_at, completed_at, clear_time_minutes, \
    current_episode, total_episodes, current_page, total_pages, metadata";

/// Provides CRUD operations for backlog items.
pub struct BacklogItemRepo;

impl BacklogItemRepo {
    /// Insert a new item, or return the one already stored under the same
    /// `(user_id, external_id, item_type)` key.
    ///
    /// The unique index decides; an existing row is returned unchanged and
    /// the incoming payload is discarded. The flag is `true` when a row was
    /// created.
    pub async fn insert_or_get(
        pool: &SqlitePool,
        item: &NewItem,
    ) -> Result<(BacklogItem, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO backlog_items \
                 (user_id, item_type, title, image_url, external_id, description, \
                  status, added_at, total_episodes, total_pages, metadata) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
             ON CONFLICT (user_id, external_id, item_type) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, BacklogItem>(&query)
            .bind(&item.user_id)
            .bind(item.item_type.as_str())
            .bind(&item.title)
            .bind(item.image_url.as_deref())
            .bind(&item.external_id)
            .bind(item.description.as_deref())
            .bind(item.status.as_str())
            .bind(item.added_at)
            .bind(item.total_episodes)
            .bind(item.total_pages)
            .bind(item.metadata.as_ref().map(|m| m.to_string()))
            .fetch_optional(pool)
            .await?;

        if let Some(row) = inserted {
            return Ok((row, true));
        }

        let query = format!(
            "SELECT {COLUMNS} FROM backlog_items \
             WHERE user_id = ?1 AND external_id = ?2 AND item_type = ?3"
        );
        let existing = sqlx::query_as::<_, BacklogItem>(&query)
            .bind(&item.user_id)
            .bind(&item.external_id)
            .bind(item.item_type.as_str())
            .fetch_one(pool)
            .await?;

        Ok((existing, false))
    }

    /// Find an item by id, only if it belongs to `user_id`.
    ///
    /// Runs on a pool or inside an open transaction.
    pub async fn find_for_user<'e, E>(
        executor: E,
        id: DbId,
        user_id: &str,
    ) -> Result<Option<BacklogItem>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM backlog_items WHERE id = ?1 AND user_id = ?2");
        sqlx::query_as::<Sqlite, BacklogItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// List a user's items, newest-added first, with optional filters.
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: &str,
        filter: &BacklogFilter,
    ) -> Result<Vec<BacklogItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM backlog_items \
             WHERE user_id = ?1 \
               AND (?2 IS NULL OR item_type = ?2) \
               AND (?3 IS NULL OR status = ?3) \
             ORDER BY added_at DESC, id DESC"
        );
        sqlx::query_as::<_, BacklogItem>(&query)
            .bind(user_id)
            .bind(filter.item_type.map(|t| t.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update to a user's item.
    ///
    /// Reads the current row, merges the patch (deriving `started_at` /
    /// `completed_at` from the stored values), and writes it back in one
    /// transaction. Returns `None` if the user owns no such item.
    ///
    /// The write lock is taken at `BEGIN`. A deferred transaction that has
    /// already read cannot upgrade after another writer commits; SQLite
    /// returns `SQLITE_BUSY` there without honoring the busy timeout.
    pub async fn apply_patch(
        pool: &SqlitePool,
        id: DbId,
        user_id: &str,
        patch: &ItemPatch,
        now: Timestamp,
    ) -> Result<Option<BacklogItem>, sqlx::Error> {
        let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

        let Some(existing) = Self::find_for_user(&mut *tx, id, user_id).await? else {
            return Ok(None);
        };

        let next = apply_patch(&existing.progress(), patch, now);

        let query = format!(
            "UPDATE backlog_items SET \
                 status = ?3, \
                 clear_time_minutes = ?4, \
                 current_episode = ?5, \
                 total_episodes = ?6, \
                 current_page = ?7, \
                 total_pages = ?8, \
                 started_at = ?9, \
                 completed_at = ?10 \
             WHERE id = ?1 AND user_id = ?2 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, BacklogItem>(&query)
            .bind(id)
            .bind(user_id)
            .bind(next.status.as_str())
            .bind(next.clear_time_minutes)
            .bind(next.current_episode)
            .bind(next.total_episodes)
            .bind(next.current_page)
            .bind(next.total_pages)
            .bind(next.started_at)
            .bind(next.completed_at)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Hard-delete a user's item. Returns `true` if a row was deleted.
    pub async fn delete_for_user(
        pool: &SqlitePool,
        id: DbId,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM backlog_items WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load the statistics-relevant fields of every item a user owns.
    pub async fn snapshots_for_user(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Vec<ItemSnapshot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM backlog_items WHERE user_id = ?1");
        let rows = sqlx::query_as::<_, BacklogItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(BacklogItem::snapshot).collect())
    }
}
