//! Score engine.
//!
//! Pure functions turning raw attempt/bypass counts and self-reported
//! ratings into normalized 0-100 scores with tier labels. Every function
//! here is total and deterministic -- no clock, no randomness, no IO --
//! so chart and report consumers can call them freely.

use serde::{Deserialize, Serialize};

/// Points deducted per blocked-site attempt.
const ATTEMPT_PENALTY: u32 = 2;
/// Points deducted per bypass (overriding an active block).
const BYPASS_PENALTY: u32 = 5;

/// Daily focus score from attempt and bypass counts.
///
/// Starts at 100, subtracts 2 per attempt and 5 per bypass, clamped to
/// [0, 100]. A bypass is already counted in its own column; callers must
/// not additionally count it as a plain attempt.
pub fn focus_score(attempts: u32, bypasses: u32) -> u8 {
    let penalty = attempts
        .saturating_mul(ATTEMPT_PENALTY)
        .saturating_add(bypasses.saturating_mul(BYPASS_PENALTY));
    100u32.saturating_sub(penalty) as u8
}

/// Self-reported 1-5 ratings for one tracked day. Each dimension is
/// independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessRatings {
    pub mood: Option<u8>,
    pub sleep: Option<u8>,
    pub nutrition: Option<u8>,
    pub exercise: Option<u8>,
    pub social: Option<u8>,
}

impl WellnessRatings {
    /// Ratings in a fixed order, paired with their field names.
    pub fn fields(&self) -> [(&'static str, Option<u8>); 5] {
        [
            ("mood", self.mood),
            ("sleep", self.sleep),
            ("nutrition", self.nutrition),
            ("exercise", self.exercise),
            ("social", self.social),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }
}

/// Normalized wellbeing score over up to five 1-5 ratings.
///
/// With `k` ratings present, each contributes `(rating/5) * (100/k)`, so
/// the score is comparable regardless of how many dimensions were filled
/// in. Returns `None` when no rating is present.
pub fn wellbeing_score(ratings: &WellnessRatings) -> Option<u8> {
    let present: Vec<u8> = ratings.fields().iter().filter_map(|(_, v)| *v).collect();
    if present.is_empty() {
        return None;
    }
    let k = present.len() as f64;
    let total: f64 = present
        .iter()
        .map(|&r| (f64::from(r) / 5.0) * (100.0 / k))
        .sum();
    Some(total.round() as u8)
}

/// Labeled score band, shared by every chart/report consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    NotAvailable,
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
    Superior,
}

impl ScoreTier {
    /// Map a 0-100 score (or `None`) to its tier.
    ///
    /// Bands: 0-20 Very Poor, 21-40 Poor, 41-60 Fair, 61-80 Good,
    /// 81-95 Excellent, 96-100 Superior.
    pub fn from_score(score: Option<u8>) -> Self {
        match score {
            None => ScoreTier::NotAvailable,
            Some(s) if s <= 20 => ScoreTier::VeryPoor,
            Some(s) if s <= 40 => ScoreTier::Poor,
            Some(s) if s <= 60 => ScoreTier::Fair,
            Some(s) if s <= 80 => ScoreTier::Good,
            Some(s) if s <= 95 => ScoreTier::Excellent,
            Some(_) => ScoreTier::Superior,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::NotAvailable => "N/A",
            ScoreTier::VeryPoor => "Very Poor",
            ScoreTier::Poor => "Poor",
            ScoreTier::Fair => "Fair",
            ScoreTier::Good => "Good",
            ScoreTier::Excellent => "Excellent",
            ScoreTier::Superior => "Superior",
        }
    }

    /// Display color, consistent across all reporting surfaces.
    pub fn color(&self) -> &'static str {
        match self {
            ScoreTier::NotAvailable => "#9ca3af",
            ScoreTier::VeryPoor => "#ef4444",
            ScoreTier::Poor => "#f97316",
            ScoreTier::Fair => "#eab308",
            ScoreTier::Good => "#22c55e",
            ScoreTier::Excellent => "#10b981",
            ScoreTier::Superior => "#3b82f6",
        }
    }
}
