//! Distraction ledger.
//!
//! Owns blocked-site configuration and derives statistics from the
//! append-only attempt log. Mutations are single-row writes that either
//! fully succeed or fully fail; the attempt log is never written here.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::clock::{offset_from_hours, Clock};
use crate::error::{CoreError, Result};

use super::calendar::{build_calendar, current_score, CalendarDay};
use super::domain::normalize_domain;
use super::model::{BlockedSite, BlockedSiteAttempt, DayLimit};
use super::store::LedgerStore;

/// Per-site aggregate over the attempt log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteStats {
    pub site: BlockedSite,
    pub total_attempts: u32,
    pub today_attempts: u32,
    pub today_bypasses: u32,
    pub last_attempt: Option<DateTime<Utc>>,
}

/// Manages the blocklist and its derived statistics for one user.
pub struct DistractionLedger<S: LedgerStore, C: Clock> {
    store: S,
    clock: C,
    user_id: String,
    /// The user's local date frame for grouping attempts by calendar day.
    offset: FixedOffset,
}

impl<S: LedgerStore, C: Clock> DistractionLedger<S, C> {
    pub fn new(store: S, clock: C, user_id: impl Into<String>, tz_offset_hours: i32) -> Self {
        Self {
            store,
            clock,
            user_id: user_id.into(),
            offset: offset_from_hours(tz_offset_hours),
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.offset).date_naive()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    // ── Blocklist mutation ───────────────────────────────────────────

    /// Add a domain to the blocklist.
    ///
    /// The input is normalized (scheme, `www.`, path stripped, lowercased)
    /// and validated before anything is written. Re-adding an existing
    /// domain fails with [`CoreError::Duplicate`] and changes nothing.
    pub fn add_blocked_site(&self, raw_domain: &str, max_daily_visits: u32) -> Result<BlockedSite> {
        let domain = normalize_domain(raw_domain)?;
        if self.store.site_by_domain(&self.user_id, &domain)?.is_some() {
            return Err(CoreError::Duplicate { domain });
        }
        let site = BlockedSite::new(self.user_id.clone(), domain, max_daily_visits);
        self.store.insert_site(&site)?;
        debug!(domain = %site.domain, "blocked site added");
        Ok(site)
    }

    /// Remove a site. Attempt history for the domain is retained and
    /// still contributes to historical statistics.
    pub fn remove_blocked_site(&self, id: Uuid) -> Result<bool> {
        Ok(self.store.delete_site(&self.user_id, id)?)
    }

    /// Set the daily visit allowance. Floors at 0.
    pub fn update_max_daily_visits(&self, id: Uuid, new_limit: i64) -> Result<BlockedSite> {
        let mut site = self.require_site(id)?;
        site.max_daily_visits = new_limit.max(0) as u32;
        self.store.update_site(&site)?;
        Ok(site)
    }

    /// Quick-adjust the daily visit allowance by a delta. Floors at 1,
    /// matching the stepper surface which never drops to zero.
    pub fn adjust_max_daily_visits(&self, id: Uuid, delta: i64) -> Result<BlockedSite> {
        let mut site = self.require_site(id)?;
        site.max_daily_visits = (i64::from(site.max_daily_visits) + delta).max(1) as u32;
        self.store.update_site(&site)?;
        Ok(site)
    }

    /// Configure one weekday's limit. Minutes floor at 0.
    pub fn set_day_limit(
        &self,
        id: Uuid,
        day: Weekday,
        enabled: bool,
        minutes: i64,
    ) -> Result<BlockedSite> {
        let mut site = self.require_site(id)?;
        site.day_limits.set(
            day,
            DayLimit {
                enabled,
                minutes: minutes.max(0) as u32,
            },
        );
        self.store.update_site(&site)?;
        Ok(site)
    }

    pub fn blocked_sites(&self) -> Result<Vec<BlockedSite>> {
        Ok(self.store.sites(&self.user_id)?)
    }

    // ── Derived statistics ───────────────────────────────────────────

    /// Per-site aggregates: total attempts, today's attempts and
    /// bypasses, and the most recent attempt, grouped by domain in the
    /// local date frame.
    pub fn site_stats(&self) -> Result<Vec<SiteStats>> {
        let sites = self.store.sites(&self.user_id)?;
        let attempts = self.store.attempts(&self.user_id)?;
        let today = self.today();

        Ok(sites
            .into_iter()
            .map(|site| {
                let mut total = 0u32;
                let mut today_attempts = 0u32;
                let mut today_bypasses = 0u32;
                let mut last: Option<DateTime<Utc>> = None;
                for attempt in attempts.iter().filter(|a| a.domain == site.domain) {
                    total += 1;
                    if self.local_date(attempt.session_start) == today {
                        today_attempts += 1;
                        if attempt.bypassed {
                            today_bypasses += 1;
                        }
                    }
                    if last.map_or(true, |l| attempt.session_start > l) {
                        last = Some(attempt.session_start);
                    }
                }
                SiteStats {
                    site,
                    total_attempts: total,
                    today_attempts,
                    today_bypasses,
                    last_attempt: last,
                }
            })
            .collect())
    }

    /// One entry per calendar day for the trailing `range_days` ending
    /// today, zero-filled so the calendar renders a complete grid.
    pub fn calendar_data(&self, range_days: u32) -> Result<Vec<CalendarDay>> {
        let today = self.today();
        let sites = self.store.sites(&self.user_id)?;
        let attempts = self.range_attempts(range_days)?;
        Ok(build_calendar(
            &sites,
            &attempts,
            today,
            today,
            range_days,
            self.offset,
        ))
    }

    /// The most recent day's focus score within the range.
    pub fn current_score(&self, range_days: u32) -> Result<Option<u8>> {
        Ok(current_score(&self.calendar_data(range_days)?))
    }

    /// Raw bypassed attempts within the trailing window, for time-series
    /// breakdowns.
    pub fn bypass_attempts(&self, days: u32) -> Result<Vec<BlockedSiteAttempt>> {
        Ok(self
            .range_attempts(days)?
            .into_iter()
            .filter(|a| a.bypassed)
            .collect())
    }

    /// Advance or reset each site's streak for `date` (default: today).
    ///
    /// A site whose attempt count for the day stayed within its visit
    /// allowance advances its streak once per calendar day; exceeding the
    /// allowance resets the streak to zero. Safe to run repeatedly.
    pub fn record_streaks(&self, date: Option<NaiveDate>) -> Result<Vec<BlockedSite>> {
        let date = date.unwrap_or_else(|| self.today());
        let attempts = self.store.attempts(&self.user_id)?;
        let mut updated = Vec::new();

        for mut site in self.store.sites(&self.user_id)? {
            let day_count = attempts
                .iter()
                .filter(|a| a.domain == site.domain && self.local_date(a.session_start) == date)
                .count() as u32;

            if day_count <= site.max_daily_visits {
                if site.last_streak_date != Some(date) {
                    site.streak_count += 1;
                    site.last_streak_date = Some(date);
                    self.store.update_site(&site)?;
                }
            } else if site.streak_count != 0 {
                site.streak_count = 0;
                self.store.update_site(&site)?;
            }
            updated.push(site);
        }
        Ok(updated)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require_site(&self, id: Uuid) -> Result<BlockedSite> {
        self.store
            .site_by_id(&self.user_id, id)?
            .ok_or(CoreError::SiteNotFound { id })
    }

    fn range_attempts(&self, range_days: u32) -> Result<Vec<BlockedSiteAttempt>> {
        let start_date = self.today() - Duration::days(i64::from(range_days.max(1)) - 1);
        let start_local = start_date
            .and_time(chrono::NaiveTime::MIN)
            .and_local_timezone(self.offset)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| self.clock.now() - Duration::days(i64::from(range_days)));
        Ok(self.store.attempts_since(&self.user_id, start_local)?)
    }
}
