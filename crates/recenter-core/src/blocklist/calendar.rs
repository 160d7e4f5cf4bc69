//! Calendar-range aggregation over the attempt log.
//!
//! Pure functions: callers supply the rows and the date frame, nothing
//! here touches a clock or a store. Every day in the requested range is
//! present in the output, zero-filled when the log has nothing for it,
//! so a calendar grid renders without gaps.

use std::collections::HashMap;

use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::scoring::focus_score;

use super::model::{BlockedSite, BlockedSiteAttempt};

/// Aggregated distraction data for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub attempts: u32,
    pub bypasses: u32,
    /// Minutes of attempted-site activity.
    pub attempt_minutes: i64,
    /// Summed enabled weekday limit across sites; `None` when nothing is
    /// configured for this weekday.
    pub limit_minutes: Option<i64>,
    /// `attempt_minutes <= limit_minutes`; vacuously true without a limit.
    pub limit_respected: bool,
    /// False for future dates, which are excluded from aggregation.
    pub has_data: bool,
    pub focus_score: Option<u8>,
}

/// Build one entry per calendar day for the `range_days` days ending at
/// `end_date` inclusive.
///
/// Attempt timestamps are mapped to calendar days through `offset`, the
/// user's local date frame. Days after `today` are marked `has_data =
/// false` with zero values and no score; a day with no attempts that is
/// not in the future scores a perfect 100. The `attempts` field is the
/// total including bypasses; the score penalizes each row exactly once,
/// at the bypass rate when it was bypassed.
pub fn build_calendar(
    sites: &[BlockedSite],
    attempts: &[BlockedSiteAttempt],
    end_date: NaiveDate,
    today: NaiveDate,
    range_days: u32,
    offset: FixedOffset,
) -> Vec<CalendarDay> {
    let range_days = range_days.max(1);

    // Bucket the log by local calendar day.
    let mut by_day: HashMap<NaiveDate, (u32, u32, i64)> = HashMap::new();
    for attempt in attempts {
        let date = attempt.session_start.with_timezone(&offset).date_naive();
        let entry = by_day.entry(date).or_default();
        entry.0 += 1;
        if attempt.bypassed {
            entry.1 += 1;
        }
        entry.2 += attempt.duration_secs.unwrap_or(0).max(0);
    }

    let start = end_date - Duration::days(i64::from(range_days) - 1);
    (0..range_days)
        .map(|i| {
            let date = start + Duration::days(i64::from(i));
            if date > today {
                return CalendarDay {
                    date,
                    attempts: 0,
                    bypasses: 0,
                    attempt_minutes: 0,
                    limit_minutes: weekday_limit(sites, date),
                    limit_respected: true,
                    has_data: false,
                    focus_score: None,
                };
            }

            let (attempts, bypasses, secs) = by_day.get(&date).copied().unwrap_or_default();
            let attempt_minutes = secs / 60;
            let limit_minutes = weekday_limit(sites, date);
            let limit_respected = match limit_minutes {
                Some(limit) => attempt_minutes <= limit,
                None => true,
            };
            CalendarDay {
                date,
                attempts,
                bypasses,
                attempt_minutes,
                limit_minutes,
                limit_respected,
                has_data: true,
                focus_score: Some(focus_score(attempts - bypasses, bypasses)),
            }
        })
        .collect()
}

/// The most recent day's score, scanning backward past no-data days.
pub fn current_score(days: &[CalendarDay]) -> Option<u8> {
    days.iter().rev().find(|d| d.has_data)?.focus_score
}

fn weekday_limit(sites: &[BlockedSite], date: NaiveDate) -> Option<i64> {
    let weekday = date.weekday();
    let enabled: Vec<i64> = sites
        .iter()
        .map(|s| s.day_limits.get(weekday))
        .filter(|l| l.enabled)
        .map(|l| i64::from(l.minutes))
        .collect();
    if enabled.is_empty() {
        None
    } else {
        Some(enabled.iter().sum())
    }
}
