//! Calendar-month arithmetic on a fixed local offset.
//!
//! Statistics are bucketed by the calendar month a user lives in, not by
//! UTC. Every month gets its own boundary, so the last day of February and
//! the first day of March never share a bucket regardless of month length.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

use crate::error::CoreError;

/// Default calendar offset (JST, `+09:00`).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// A calendar month, e.g. 2024-02.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl YearMonth {
    /// The month containing `instant` on its own local calendar.
    pub fn containing(instant: &DateTime<FixedOffset>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    /// The month `count` months earlier.
    pub fn minus_months(self, count: u32) -> Self {
        let zero_based = self.year * 12 + (self.month as i32 - 1) - count as i32;
        Self {
            year: zero_based.div_euclid(12),
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }

    /// The following month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Midnight of the first day of this month on `offset`, as a UTC instant.
    pub fn start(self, offset: FixedOffset) -> Result<DateTime<Utc>, CoreError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|naive| offset.from_local_datetime(&naive).single())
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "month {:04}-{:02} is out of range",
                    self.year, self.month
                ))
            })
    }

    /// Machine-readable key, e.g. `2024-02`.
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Display label in Japanese calendar notation, e.g. `2024年2月`.
    pub fn label(self) -> String {
        format!("{}年{}月", self.year, self.month)
    }
}

/// Parse a UTC offset such as `+09:00`, `-05:30`, `+0900` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, CoreError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let invalid = || CoreError::Validation(format!("Invalid UTC offset '{raw}'"));

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
