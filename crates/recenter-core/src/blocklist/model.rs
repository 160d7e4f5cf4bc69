//! Blocklist models.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-weekday block configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLimit {
    /// Whether blocking is enforced on this weekday.
    pub enabled: bool,
    /// Allowed minutes on this weekday before the limit is exceeded.
    pub minutes: u32,
}

/// Fixed seven-slot weekday configuration, indexed by [`chrono::Weekday`].
///
/// A fixed record rather than a string-keyed map, so every weekday is
/// always present and lookups are exhaustive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLimits {
    days: [DayLimit; 7],
}

impl DayLimits {
    pub fn get(&self, day: Weekday) -> DayLimit {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, limit: DayLimit) {
        self.days[day.num_days_from_monday() as usize] = limit;
    }

    /// Iterate Monday through Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, DayLimit)> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(move |d| (d, self.get(d)))
    }
}

/// A domain the user has chosen to block, with its limits and streak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedSite {
    pub id: Uuid,
    pub user_id: String,
    /// Normalized host string: no scheme, no `www.`, no path.
    pub domain: String,
    /// Visits allowed per day before attempts count against the limit.
    pub max_daily_visits: u32,
    pub day_limits: DayLimits,
    /// Consecutive days the daily limit was respected.
    pub streak_count: u32,
    /// Last day the streak was advanced.
    pub last_streak_date: Option<NaiveDate>,
}

impl BlockedSite {
    pub fn new(user_id: impl Into<String>, domain: impl Into<String>, max_daily_visits: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            domain: domain.into(),
            max_daily_visits,
            day_limits: DayLimits::default(),
            streak_count: 0,
            last_streak_date: None,
        }
    }
}

/// One recorded visit to a blocked domain. Append-only: written by the
/// browsing-enforcement collaborator, never mutated by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedSiteAttempt {
    pub id: Uuid,
    pub user_id: String,
    pub domain: String,
    /// The site row this attempt referenced at creation time. Kept even
    /// after the site is removed, so history still aggregates.
    pub site_id: Option<Uuid>,
    /// True when the user overrode an active block.
    pub bypassed: bool,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub duration_secs: Option<i64>,
}
