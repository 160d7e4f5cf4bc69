//! Wellness check-ins.
//!
//! Self-reported 1-5 ratings across five dimensions, at most one entry
//! per user per tracked date. A "skip" writes an all-null entry with the
//! skipped flag set so the day is not re-prompted. Scoring is delegated
//! to [`crate::scoring`].

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError, ValidationError};
use crate::scoring::{wellbeing_score, ScoreTier, WellnessRatings};

/// One day's self-reported check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessEntry {
    pub id: Uuid,
    pub user_id: String,
    pub tracked_date: NaiveDate,
    pub ratings: WellnessRatings,
    pub description: Option<String>,
    /// The user explicitly skipped this day's check-in.
    pub skipped: bool,
}

/// Persistence seam for wellness entries. Upsert keyed on
/// `(user_id, tracked_date)` keeps the one-entry-per-day invariant in a
/// single atomic write.
pub trait WellnessStore {
    fn upsert_entry(&self, entry: &WellnessEntry) -> Result<(), StoreError>;

    fn entry_for(&self, user_id: &str, date: NaiveDate)
        -> Result<Option<WellnessEntry>, StoreError>;

    /// Entries in `[from, to]`, ascending by date.
    fn entries_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WellnessEntry>, StoreError>;
}

// Shared references delegate, so one store can back several consumers.
impl<S: WellnessStore + ?Sized> WellnessStore for &S {
    fn upsert_entry(&self, entry: &WellnessEntry) -> Result<(), StoreError> {
        (**self).upsert_entry(entry)
    }

    fn entry_for(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<WellnessEntry>, StoreError> {
        (**self).entry_for(user_id, date)
    }

    fn entries_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WellnessEntry>, StoreError> {
        (**self).entries_between(user_id, from, to)
    }
}

/// Per-day line of a wellbeing report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellbeingDay {
    pub date: NaiveDate,
    pub score: Option<u8>,
    pub tier: ScoreTier,
    pub skipped: bool,
}

/// Check-in log for one user.
pub struct WellnessLog<S: WellnessStore> {
    store: S,
    user_id: String,
}

impl<S: WellnessStore> WellnessLog<S> {
    pub fn new(store: S, user_id: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
        }
    }

    /// Record (or overwrite) the check-in for a date.
    ///
    /// Every present rating must be in [1, 5]; out-of-range input is
    /// rejected before anything is written.
    pub fn check_in(
        &self,
        date: NaiveDate,
        ratings: WellnessRatings,
        description: Option<String>,
    ) -> Result<WellnessEntry> {
        validate_ratings(&ratings)?;
        let entry = WellnessEntry {
            id: self.existing_id(date)?.unwrap_or_else(Uuid::new_v4),
            user_id: self.user_id.clone(),
            tracked_date: date,
            ratings,
            description,
            skipped: false,
        };
        self.store.upsert_entry(&entry)?;
        Ok(entry)
    }

    /// Mark a date as skipped: all ratings null, skipped flag set.
    pub fn skip(&self, date: NaiveDate) -> Result<WellnessEntry> {
        let entry = WellnessEntry {
            id: self.existing_id(date)?.unwrap_or_else(Uuid::new_v4),
            user_id: self.user_id.clone(),
            tracked_date: date,
            ratings: WellnessRatings::default(),
            description: None,
            skipped: true,
        };
        self.store.upsert_entry(&entry)?;
        Ok(entry)
    }

    /// Whether the date still needs a prompt (no entry, skipped or not).
    pub fn needs_check_in(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.store.entry_for(&self.user_id, date)?.is_none())
    }

    pub fn entry_for(&self, date: NaiveDate) -> Result<Option<WellnessEntry>> {
        Ok(self.store.entry_for(&self.user_id, date)?)
    }

    /// Per-day wellbeing scores for the trailing window ending at `end`.
    /// Days without an entry score `None`.
    pub fn report(&self, end: NaiveDate, range_days: u32) -> Result<Vec<WellbeingDay>> {
        let range_days = range_days.max(1);
        let start = end - Duration::days(i64::from(range_days) - 1);
        let entries = self.store.entries_between(&self.user_id, start, end)?;

        Ok((0..range_days)
            .map(|i| {
                let date = start + Duration::days(i64::from(i));
                let entry = entries.iter().find(|e| e.tracked_date == date);
                let score = entry.and_then(|e| wellbeing_score(&e.ratings));
                WellbeingDay {
                    date,
                    score,
                    tier: ScoreTier::from_score(score),
                    skipped: entry.is_some_and(|e| e.skipped),
                }
            })
            .collect())
    }

    fn existing_id(&self, date: NaiveDate) -> Result<Option<Uuid>> {
        Ok(self.store.entry_for(&self.user_id, date)?.map(|e| e.id))
    }
}

fn validate_ratings(ratings: &WellnessRatings) -> Result<(), ValidationError> {
    for (field, value) in ratings.fields() {
        if let Some(v) = value {
            if !(1..=5).contains(&v) {
                return Err(ValidationError::RatingOutOfRange {
                    field,
                    value: i64::from(v),
                });
            }
        }
    }
    Ok(())
}
