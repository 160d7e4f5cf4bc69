//! Focus session model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a focus session. Terminal rows are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Abandoned => "abandoned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            "abandoned" => Some(SessionStatus::Abandoned),
            _ => None,
        }
    }
}

/// A single timed focus or break session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: Uuid,
    pub user_id: String,
    /// Free-form activity label, e.g. "focus" or "deep work".
    pub activity: String,
    /// Background sound selection ("" = silence).
    pub sound: String,
    /// Planned duration in seconds. 0 = open-ended.
    pub planned_secs: i64,
    /// Server-persisted duration accumulator, seconds. Monotonically
    /// non-decreasing while the session is active.
    pub actual_secs: i64,
    /// Suppresses periodic prompts while focusing.
    pub flow_mode: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
}

/// Parameters for starting a new session.
#[derive(Debug, Clone)]
pub struct StartSession {
    pub activity: String,
    pub sound: String,
    pub planned_secs: i64,
    pub flow_mode: bool,
}

impl Default for StartSession {
    fn default() -> Self {
        Self {
            activity: "focus".to_string(),
            sound: String::new(),
            planned_secs: 0,
            flow_mode: false,
        }
    }
}
