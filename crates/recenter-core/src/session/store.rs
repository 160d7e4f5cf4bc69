//! Persistence seam for session rows.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;

use super::model::{FocusSession, SessionStatus};

/// Storage operations the tracker needs. Each method is a single atomic
/// row write or a filtered read; the backing store enforces per-user
/// ownership.
pub trait SessionStore {
    /// Insert a new session row, returning nothing; the caller already
    /// holds the full row.
    fn insert_session(&self, session: &FocusSession) -> Result<(), StoreError>;

    /// The user's `active` row, if any.
    fn active_session(&self, user_id: &str) -> Result<Option<FocusSession>, StoreError>;

    /// Overwrite the persisted duration accumulator for an active row.
    fn update_duration(&self, id: Uuid, actual_secs: i64) -> Result<(), StoreError>;

    /// Update the background sound on an active row.
    fn update_sound(&self, id: Uuid, sound: &str) -> Result<(), StoreError>;

    /// Transition a row to a terminal status with its final duration.
    fn close_session(
        &self,
        id: Uuid,
        status: SessionStatus,
        actual_secs: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Force-end every `active` row for the user as `abandoned`, each with
    /// a duration computed from its own `started_at` to `now`. Returns the
    /// number of rows closed.
    fn abandon_active(&self, user_id: &str, now: DateTime<Utc>) -> Result<usize, StoreError>;

    /// Recent terminal sessions, newest first.
    fn recent_sessions(&self, user_id: &str, limit: u32) -> Result<Vec<FocusSession>, StoreError>;
}

// Shared references delegate, so one store can back several consumers.
impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn insert_session(&self, session: &FocusSession) -> Result<(), StoreError> {
        (**self).insert_session(session)
    }

    fn active_session(&self, user_id: &str) -> Result<Option<FocusSession>, StoreError> {
        (**self).active_session(user_id)
    }

    fn update_duration(&self, id: Uuid, actual_secs: i64) -> Result<(), StoreError> {
        (**self).update_duration(id, actual_secs)
    }

    fn update_sound(&self, id: Uuid, sound: &str) -> Result<(), StoreError> {
        (**self).update_sound(id, sound)
    }

    fn close_session(
        &self,
        id: Uuid,
        status: SessionStatus,
        actual_secs: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        (**self).close_session(id, status, actual_secs, ended_at)
    }

    fn abandon_active(&self, user_id: &str, now: DateTime<Utc>) -> Result<usize, StoreError> {
        (**self).abandon_active(user_id, now)
    }

    fn recent_sessions(&self, user_id: &str, limit: u32) -> Result<Vec<FocusSession>, StoreError> {
        (**self).recent_sessions(user_id, limit)
    }
}
