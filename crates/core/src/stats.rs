//! Collection statistics: status/type counts, completions this month,
//! average game clear time, and a six-month completion trend.
//!
//! [`compute_stats`] is a pure function of the item snapshots and the
//! reference instant `as_of`; no aggregates are stored anywhere.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::calendar::YearMonth;
use crate::error::CoreError;
use crate::item::{ItemStatus, ItemType};
use crate::types::Timestamp;

/// Number of months in the completion trend, current month included.
pub const TREND_MONTHS: u32 = 6;

/// The fields of a backlog row that statistics depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSnapshot {
    pub item_type: ItemType,
    pub status: ItemStatus,
    pub completed_at: Option<Timestamp>,
    pub clear_time_minutes: Option<i32>,
}

/// Item counts per catalog type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    #[serde(rename = "GAME")]
    pub game: i64,
    #[serde(rename = "ANIME")]
    pub anime: i64,
    #[serde(rename = "BOOK")]
    pub book: i64,
}

/// Completions within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub month_label: String,
    pub count: i64,
}

/// Response body of `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogStats {
    pub total_backlog: i64,
    pub total_in_progress: i64,
    pub total_completed: i64,
    pub total_dropped: i64,
    pub by_type: TypeCounts,
    pub this_month_completed: i64,
    /// `None` when no completed game has a clear time; never zero-filled.
    pub avg_clear_time_minutes: Option<i64>,
    /// Oldest month first, always [`TREND_MONTHS`] entries.
    pub monthly_trend: Vec<MonthlyCount>,
}

/// Compute statistics over one user's full collection.
///
/// Month boundaries are taken on the calendar of `as_of`'s offset.
pub fn compute_stats(
    items: &[ItemSnapshot],
    as_of: DateTime<FixedOffset>,
) -> Result<BacklogStats, CoreError> {
    let offset = *as_of.offset();
    let current = YearMonth::containing(&as_of);
    let as_of_utc = as_of.with_timezone(&Utc);
    let this_month_start = current.start(offset)?;

    let oldest = current.minus_months(TREND_MONTHS - 1);
    let mut buckets = Vec::with_capacity(TREND_MONTHS as usize);
    let mut month = oldest;
    for _ in 0..TREND_MONTHS {
        let start = month.start(offset)?;
        let end = month.next().start(offset)?;
        buckets.push((month, start, end, 0_i64));
        month = month.next();
    }

    let mut stats = BacklogStats {
        total_backlog: 0,
        total_in_progress: 0,
        total_completed: 0,
        total_dropped: 0,
        by_type: TypeCounts::default(),
        this_month_completed: 0,
        avg_clear_time_minutes: None,
        monthly_trend: Vec::new(),
    };
    let mut clear_time_sum: i64 = 0;
    let mut clear_time_count: i64 = 0;

    for item in items {
        match item.status {
            ItemStatus::Backlog => stats.total_backlog += 1,
            ItemStatus::InProgress => stats.total_in_progress += 1,
            ItemStatus::Completed => stats.total_completed += 1,
            ItemStatus::Dropped => stats.total_dropped += 1,
        }
        match item.item_type {
            ItemType::Game => stats.by_type.game += 1,
            ItemType::Anime => stats.by_type.anime += 1,
            ItemType::Book => stats.by_type.book += 1,
        }

        if item.status != ItemStatus::Completed {
            continue;
        }

        if item.item_type == ItemType::Game {
            if let Some(minutes) = item.clear_time_minutes {
                clear_time_sum += i64::from(minutes);
                clear_time_count += 1;
            }
        }

        let Some(completed_at) = item.completed_at else {
            continue;
        };
        if completed_at >= this_month_start && completed_at <= as_of_utc {
            stats.this_month_completed += 1;
        }
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|(_, start, end, _)| completed_at >= *start && completed_at < *end)
        {
            bucket.3 += 1;
        }
    }

    if clear_time_count > 0 {
        let mean = clear_time_sum as f64 / clear_time_count as f64;
        stats.avg_clear_time_minutes = Some(mean.round() as i64);
    }

    stats.monthly_trend = buckets
        .into_iter()
        .map(|(month, _, _, count)| MonthlyCount {
            month: month.key(),
            month_label: month.label(),
            count,
        })
        .collect();

    Ok(stats)
}
