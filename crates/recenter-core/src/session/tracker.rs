//! Session tracker implementation.
//!
//! The tracker is a wall-clock-based state machine. It does not use
//! internal threads -- the caller is responsible for calling `tick()`
//! periodically (the hosting UI's timer, or the CLI watch loop).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Active -> Finishing -> Idle
//! ```
//!
//! In-memory elapsed time (local start instant to now) is authoritative
//! for display; the persisted duration accumulator trails it by at most
//! one heartbeat interval. A session deliberately survives teardown of
//! its host: dropping the tracker abandons nothing, and `adopt()` picks
//! the active row back up after a reload.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::Result;

use super::model::{FocusSession, SessionStatus, StartSession};
use super::store::SessionStore;

/// Tunables for the tracker. Defaults match the production cadence.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Seconds between heartbeat writes of the duration accumulator.
    pub heartbeat_secs: i64,
    /// Sessions shorter than this are never persisted as completed.
    pub min_completed_secs: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: 30,
            min_completed_secs: 60,
        }
    }
}

/// Observable tracker state.
///
/// `Finishing` spans only the terminal write inside `finish()`; since
/// that call is synchronous, callers polling `state()` between calls see
/// `Idle` or `Active`. While the flag is set, `tick()` returns `None`
/// without writing, so a heartbeat never lands after the close write. A
/// failed close drops back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Active,
    Finishing,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    id: Uuid,
    /// Local start instant. Equals the row's `started_at`, including after
    /// adoption, so elapsed time matches an uninterrupted client.
    started_at: DateTime<Utc>,
    /// Last heartbeat write attempt (success or failure).
    last_sync: DateTime<Utc>,
    activity: String,
    sound: String,
    planned_secs: i64,
    flow_mode: bool,
}

/// Maintains the single active timed session for a user.
pub struct SessionTracker<S: SessionStore, C: Clock> {
    store: S,
    clock: C,
    user_id: String,
    config: TrackerConfig,
    active: Option<ActiveSession>,
    finishing: bool,
}

impl<S: SessionStore, C: Clock> SessionTracker<S, C> {
    pub fn new(store: S, clock: C, user_id: impl Into<String>) -> Self {
        Self::with_config(store, clock, user_id, TrackerConfig::default())
    }

    pub fn with_config(
        store: S,
        clock: C,
        user_id: impl Into<String>,
        config: TrackerConfig,
    ) -> Self {
        Self {
            store,
            clock,
            user_id: user_id.into(),
            config,
            active: None,
            finishing: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TrackerState {
        if self.finishing {
            TrackerState::Finishing
        } else if self.active.is_some() {
            TrackerState::Active
        } else {
            TrackerState::Idle
        }
    }

    /// Elapsed seconds of the active session, from the local start
    /// instant. `None` when idle.
    pub fn elapsed_secs(&self) -> Option<i64> {
        self.active
            .as_ref()
            .map(|a| (self.clock.now() - a.started_at).num_seconds().max(0))
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|a| a.id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new session.
    ///
    /// Any pre-existing active session for this user is first force-ended
    /// as `abandoned` (duration computed from its own `started_at`), then
    /// a fresh row is created. On a store failure the tracker stays idle
    /// and the error propagates.
    pub fn start(&mut self, req: StartSession) -> Result<FocusSession> {
        let now = self.clock.now();
        let abandoned = self.store.abandon_active(&self.user_id, now)?;
        if abandoned > 0 {
            debug!(count = abandoned, "abandoned prior active sessions");
        }

        let session = FocusSession {
            id: Uuid::new_v4(),
            user_id: self.user_id.clone(),
            activity: req.activity,
            sound: req.sound,
            planned_secs: req.planned_secs.max(0),
            actual_secs: 0,
            flow_mode: req.flow_mode,
            started_at: now,
            ended_at: None,
            status: SessionStatus::Active,
        };
        self.store.insert_session(&session)?;

        self.active = Some(ActiveSession {
            id: session.id,
            started_at: now,
            last_sync: now,
            activity: session.activity.clone(),
            sound: session.sound.clone(),
            planned_secs: session.planned_secs,
            flow_mode: session.flow_mode,
        });
        self.finishing = false;
        debug!(id = %session.id, activity = %session.activity, "session started");
        Ok(session)
    }

    /// Adopt an existing active row after a reload.
    ///
    /// Sets the local start instant to the row's `started_at` so elapsed
    /// time reproduces what an uninterrupted client would show. Returns
    /// the adopted row, or `None` when there is nothing to recover. A
    /// no-op when a session is already being tracked.
    pub fn adopt(&mut self) -> Result<Option<FocusSession>> {
        if self.active.is_some() {
            return Ok(None);
        }
        let Some(row) = self.store.active_session(&self.user_id)? else {
            return Ok(None);
        };
        self.active = Some(ActiveSession {
            id: row.id,
            started_at: row.started_at,
            last_sync: self.clock.now(),
            activity: row.activity.clone(),
            sound: row.sound.clone(),
            planned_secs: row.planned_secs,
            flow_mode: row.flow_mode,
        });
        self.finishing = false;
        debug!(id = %row.id, "adopted active session");
        Ok(Some(row))
    }

    /// Periodic tick. Returns the in-memory elapsed seconds while active.
    ///
    /// When a heartbeat interval has passed since the last write attempt,
    /// flushes elapsed time to the persisted accumulator. A failed write
    /// is logged and retried on the next heartbeat boundary -- it never
    /// changes state and never propagates. Ticks that arrive while a
    /// `finish()` is in flight are ignored so a heartbeat cannot
    /// resurrect a duration after `ended_at` is set.
    pub fn tick(&mut self) -> Option<i64> {
        if self.finishing {
            return None;
        }
        let active = self.active.as_mut()?;
        let now = self.clock.now();
        let elapsed = (now - active.started_at).num_seconds().max(0);

        if now - active.last_sync >= Duration::seconds(self.config.heartbeat_secs) {
            active.last_sync = now;
            if let Err(err) = self.store.update_duration(active.id, elapsed) {
                warn!(id = %active.id, %err, "heartbeat write failed; will retry next tick");
            }
        }
        Some(elapsed)
    }

    /// Finish the active session.
    ///
    /// Idempotent: finishing while idle is a no-op returning `Ok(None)`.
    /// Sessions shorter than the configured minimum are coerced to
    /// `abandoned` even though the user explicitly finished. On a store
    /// failure the session stays active locally and the error propagates.
    pub fn finish(&mut self) -> Result<Option<FocusSession>> {
        let Some(active) = self.active.clone() else {
            return Ok(None);
        };
        self.finishing = true;

        let now = self.clock.now();
        let elapsed = (now - active.started_at).num_seconds().max(0);
        let status = if elapsed < self.config.min_completed_secs {
            SessionStatus::Abandoned
        } else {
            SessionStatus::Completed
        };

        if let Err(err) = self.store.close_session(active.id, status, elapsed, now) {
            self.finishing = false;
            return Err(err.into());
        }

        self.active = None;
        self.finishing = false;
        debug!(id = %active.id, status = status.as_str(), secs = elapsed, "session finished");

        Ok(Some(FocusSession {
            id: active.id,
            user_id: self.user_id.clone(),
            activity: active.activity,
            sound: active.sound,
            planned_secs: active.planned_secs,
            actual_secs: elapsed,
            flow_mode: active.flow_mode,
            started_at: active.started_at,
            ended_at: Some(now),
            status,
        }))
    }

    /// Update the background sound on the active row.
    ///
    /// Duration accounting is untouched. When no session is active the
    /// store is not written; the caller's display state is its own.
    pub fn update_sound(&mut self, sound: &str) -> Result<()> {
        if let Some(active) = self.active.as_mut() {
            self.store.update_sound(active.id, sound)?;
            active.sound = sound.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::StoreError;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// In-memory store with failure injection for heartbeat tests.
    #[derive(Clone, Default)]
    struct MemoryStore {
        rows: Rc<RefCell<Vec<FocusSession>>>,
        fail_writes: Rc<Cell<bool>>,
    }

    impl MemoryStore {
        fn rows(&self) -> Vec<FocusSession> {
            self.rows.borrow().clone()
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                Err(StoreError::QueryFailed("injected".into()))
            } else {
                Ok(())
            }
        }
    }

    impl SessionStore for MemoryStore {
        fn insert_session(&self, session: &FocusSession) -> Result<(), StoreError> {
            self.check()?;
            self.rows.borrow_mut().push(session.clone());
            Ok(())
        }

        fn active_session(&self, user_id: &str) -> Result<Option<FocusSession>, StoreError> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|r| r.user_id == user_id && r.status == SessionStatus::Active)
                .cloned())
        }

        fn update_duration(&self, id: Uuid, actual_secs: i64) -> Result<(), StoreError> {
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
                row.actual_secs = actual_secs;
            }
            Ok(())
        }

        fn update_sound(&self, id: Uuid, sound: &str) -> Result<(), StoreError> {
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
                row.sound = sound.to_string();
            }
            Ok(())
        }

        fn close_session(
            &self,
            id: Uuid,
            status: SessionStatus,
            actual_secs: i64,
            ended_at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
                row.status = status;
                row.actual_secs = actual_secs;
                row.ended_at = Some(ended_at);
            }
            Ok(())
        }

        fn abandon_active(
            &self,
            user_id: &str,
            now: DateTime<Utc>,
        ) -> Result<usize, StoreError> {
            self.check()?;
            let mut rows = self.rows.borrow_mut();
            let mut count = 0;
            for row in rows
                .iter_mut()
                .filter(|r| r.user_id == user_id && r.status == SessionStatus::Active)
            {
                row.status = SessionStatus::Abandoned;
                row.actual_secs = (now - row.started_at).num_seconds().max(0);
                row.ended_at = Some(now);
                count += 1;
            }
            Ok(count)
        }

        fn recent_sessions(
            &self,
            user_id: &str,
            limit: u32,
        ) -> Result<Vec<FocusSession>, StoreError> {
            let mut rows: Vec<_> = self
                .rows
                .borrow()
                .iter()
                .filter(|r| r.user_id == user_id && r.status != SessionStatus::Active)
                .cloned()
                .collect();
            rows.sort_by_key(|r| std::cmp::Reverse(r.started_at));
            rows.truncate(limit as usize);
            Ok(rows)
        }
    }

    fn tracker(store: MemoryStore, clock: ManualClock) -> SessionTracker<MemoryStore, ManualClock> {
        SessionTracker::new(store, clock, "user-1")
    }

    #[test]
    fn start_creates_single_active_row() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock);

        t.start(StartSession::default()).unwrap();
        assert_eq!(t.state(), TrackerState::Active);

        let active: Vec<_> = store
            .rows()
            .into_iter()
            .filter(|r| r.status == SessionStatus::Active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].actual_secs, 0);
    }

    #[test]
    fn restart_abandons_prior_active_with_its_own_duration() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());

        let first = t.start(StartSession::default()).unwrap();
        clock.advance(Duration::seconds(120));
        t.start(StartSession::default()).unwrap();

        let rows = store.rows();
        let active: Vec<_> = rows
            .iter()
            .filter(|r| r.status == SessionStatus::Active)
            .collect();
        assert_eq!(active.len(), 1);

        let old = rows.iter().find(|r| r.id == first.id).unwrap();
        assert_eq!(old.status, SessionStatus::Abandoned);
        assert_eq!(old.actual_secs, 120);
        assert!(old.ended_at.is_some());
    }

    #[test]
    fn repeated_starts_keep_exactly_one_active() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());

        for _ in 0..5 {
            t.start(StartSession::default()).unwrap();
            clock.advance(Duration::seconds(10));
            let active = store
                .rows()
                .into_iter()
                .filter(|r| r.status == SessionStatus::Active)
                .count();
            assert_eq!(active, 1);
        }
        let abandoned = store
            .rows()
            .into_iter()
            .filter(|r| r.status == SessionStatus::Abandoned)
            .count();
        assert_eq!(abandoned, 4);
        assert!(store.rows().iter().all(|r| r.actual_secs >= 0));
    }

    #[test]
    fn heartbeat_flushes_elapsed_every_interval() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());
        let session = t.start(StartSession::default()).unwrap();

        // Below the interval: no write.
        clock.advance(Duration::seconds(10));
        assert_eq!(t.tick(), Some(10));
        assert_eq!(store.rows()[0].actual_secs, 0);

        // Past the interval: flushed.
        clock.advance(Duration::seconds(25));
        assert_eq!(t.tick(), Some(35));
        assert_eq!(
            store.rows().iter().find(|r| r.id == session.id).unwrap().actual_secs,
            35
        );
    }

    #[test]
    fn failed_heartbeat_is_soft_and_retried_next_interval() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());
        t.start(StartSession::default()).unwrap();

        store.fail_writes.set(true);
        clock.advance(Duration::seconds(31));
        // Write fails; elapsed display is unaffected and no error escapes.
        assert_eq!(t.tick(), Some(31));
        assert_eq!(t.state(), TrackerState::Active);
        assert_eq!(store.rows()[0].actual_secs, 0);

        // Immediately after, no retry until the next interval elapses.
        store.fail_writes.set(false);
        clock.advance(Duration::seconds(1));
        t.tick();
        assert_eq!(store.rows()[0].actual_secs, 0);

        clock.advance(Duration::seconds(30));
        t.tick();
        assert_eq!(store.rows()[0].actual_secs, 62);
    }

    #[test]
    fn finish_under_a_minute_is_coerced_to_abandoned() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());
        t.start(StartSession::default()).unwrap();

        clock.advance(Duration::seconds(59));
        let finished = t.finish().unwrap().unwrap();
        assert_eq!(finished.status, SessionStatus::Abandoned);
        assert_eq!(store.rows()[0].status, SessionStatus::Abandoned);
        assert_eq!(t.state(), TrackerState::Idle);
    }

    #[test]
    fn finish_at_or_over_a_minute_completes() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());
        t.start(StartSession::default()).unwrap();

        clock.advance(Duration::seconds(60));
        let finished = t.finish().unwrap().unwrap();
        assert_eq!(finished.status, SessionStatus::Completed);
        assert_eq!(finished.actual_secs, 60);
    }

    #[test]
    fn finish_is_idempotent_when_idle() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store, clock);
        assert!(t.finish().unwrap().is_none());
        assert!(t.finish().unwrap().is_none());
    }

    #[test]
    fn failed_finish_leaves_session_active() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());
        t.start(StartSession::default()).unwrap();
        clock.advance(Duration::seconds(90));

        store.fail_writes.set(true);
        assert!(t.finish().is_err());
        assert_eq!(t.state(), TrackerState::Active);
        assert_eq!(store.rows()[0].status, SessionStatus::Active);

        store.fail_writes.set(false);
        let finished = t.finish().unwrap().unwrap();
        assert_eq!(finished.status, SessionStatus::Completed);
    }

    #[test]
    fn failed_start_leaves_tracker_idle() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock);
        store.fail_writes.set(true);
        assert!(t.start(StartSession::default()).is_err());
        assert_eq!(t.state(), TrackerState::Idle);
    }

    #[test]
    fn adopt_recovers_elapsed_from_row_start() {
        let store = MemoryStore::default();
        let t0 = Utc::now();
        let clock = ManualClock::new(t0);

        // First client starts a session and is torn down (dropped).
        let mut first = tracker(store.clone(), clock.clone());
        first.start(StartSession::default()).unwrap();
        drop(first);

        // Reload 300 seconds later: elapsed matches wall clock since T0.
        clock.advance(Duration::seconds(300));
        let mut second = tracker(store.clone(), clock.clone());
        let adopted = second.adopt().unwrap().unwrap();
        assert_eq!(adopted.started_at, t0);
        assert_eq!(second.elapsed_secs(), Some(300));
        assert_eq!(second.state(), TrackerState::Active);

        // And keeps heartbeating from there.
        clock.advance(Duration::seconds(31));
        second.tick();
        assert_eq!(store.rows()[0].actual_secs, 331);
    }

    #[test]
    fn adopt_with_no_active_row_is_none() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store, clock);
        assert!(t.adopt().unwrap().is_none());
        assert_eq!(t.state(), TrackerState::Idle);
    }

    #[test]
    fn update_sound_keeps_duration_accounting() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());
        t.start(StartSession::default()).unwrap();

        clock.advance(Duration::seconds(10));
        t.update_sound("rain").unwrap();
        assert_eq!(store.rows()[0].sound, "rain");
        assert_eq!(store.rows()[0].actual_secs, 0);
        assert_eq!(t.elapsed_secs(), Some(10));
    }

    #[test]
    fn update_sound_without_session_is_noop() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock);
        t.update_sound("rain").unwrap();
        assert!(store.rows().is_empty());
    }

    #[test]
    fn ninety_second_session_completes_end_to_end() {
        let store = MemoryStore::default();
        let clock = ManualClock::new(Utc::now());
        let mut t = tracker(store.clone(), clock.clone());

        t.start(StartSession {
            planned_secs: 0,
            ..StartSession::default()
        })
        .unwrap();
        for _ in 0..90 {
            clock.advance(Duration::seconds(1));
            t.tick();
        }
        let finished = t.finish().unwrap().unwrap();
        assert_eq!(finished.status, SessionStatus::Completed);
        assert_eq!(finished.actual_secs, 90);

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, SessionStatus::Completed);
        assert_eq!(rows[0].actual_secs, 90);
    }
}
