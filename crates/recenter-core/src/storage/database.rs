//! SQLite-backed persistence.
//!
//! One database file holds all four entities: focus sessions, blocked
//! sites, the append-only attempt log, and wellness entries. Every row
//! carries its owning user id; timestamps are stored as RFC 3339 text.
//! The [`Database`] implements the store traits consumed by the tracker,
//! the ledger, and the wellness log.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::blocklist::{BlockedSite, BlockedSiteAttempt, DayLimits, LedgerStore};
use crate::error::StoreError;
use crate::scoring::WellnessRatings;
use crate::session::{FocusSession, SessionStatus, SessionStore};
use crate::wellness::{WellnessEntry, WellnessStore};

use super::data_dir;

/// SQLite database for all persisted entities.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/recenter.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::OpenFailed(e.to_string()))?
            .join("recenter.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS focus_sessions (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL,
                activity     TEXT NOT NULL,
                sound        TEXT NOT NULL DEFAULT '',
                planned_secs INTEGER NOT NULL DEFAULT 0,
                actual_secs  INTEGER NOT NULL DEFAULT 0,
                flow_mode    INTEGER NOT NULL DEFAULT 0,
                started_at   TEXT NOT NULL,
                ended_at     TEXT,
                status       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS blocked_sites (
                id               TEXT PRIMARY KEY,
                user_id          TEXT NOT NULL,
                domain           TEXT NOT NULL,
                max_daily_visits INTEGER NOT NULL DEFAULT 0,
                day_limits       TEXT NOT NULL,
                streak_count     INTEGER NOT NULL DEFAULT 0,
                last_streak_date TEXT,
                UNIQUE(user_id, domain)
            );

            CREATE TABLE IF NOT EXISTS site_attempts (
                id            TEXT PRIMARY KEY,
                user_id       TEXT NOT NULL,
                domain        TEXT NOT NULL,
                site_id       TEXT,
                bypassed      INTEGER NOT NULL DEFAULT 0,
                session_start TEXT NOT NULL,
                session_end   TEXT,
                duration_secs INTEGER
            );

            CREATE TABLE IF NOT EXISTS wellness_entries (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL,
                tracked_date TEXT NOT NULL,
                mood         INTEGER,
                sleep        INTEGER,
                nutrition    INTEGER,
                exercise     INTEGER,
                social       INTEGER,
                description  TEXT,
                skipped      INTEGER NOT NULL DEFAULT 0,
                UNIQUE(user_id, tracked_date)
            );

            -- Hot query paths.
            CREATE INDEX IF NOT EXISTS idx_sessions_user_status
                ON focus_sessions(user_id, status);
            CREATE INDEX IF NOT EXISTS idx_sessions_user_started
                ON focus_sessions(user_id, started_at);
            CREATE INDEX IF NOT EXISTS idx_attempts_user_start
                ON site_attempts(user_id, session_start);
            CREATE INDEX IF NOT EXISTS idx_attempts_user_domain
                ON site_attempts(user_id, domain);",
        )?;
        Ok(())
    }
}

// ── Row decoding helpers ─────────────────────────────────────────────

fn conversion_err(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e))
}

fn opt_ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_err(idx, e))
    })
    .transpose()
}

fn uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_err(idx, e))
}

fn opt_uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Uuid::parse_str(&s).map_err(|e| conversion_err(idx, e)))
        .transpose()
}

fn opt_date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| conversion_err(idx, e))
    })
    .transpose()
}

fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_err(idx, e))
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<FocusSession> {
    let status_raw: String = row.get(9)?;
    let status = SessionStatus::parse(&status_raw).ok_or_else(|| {
        conversion_err(
            9,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("unknown status '{status_raw}'"),
            ),
        )
    })?;
    Ok(FocusSession {
        id: uuid_col(row, 0)?,
        user_id: row.get(1)?,
        activity: row.get(2)?,
        sound: row.get(3)?,
        planned_secs: row.get(4)?,
        actual_secs: row.get(5)?,
        flow_mode: row.get(6)?,
        started_at: ts_col(row, 7)?,
        ended_at: opt_ts_col(row, 8)?,
        status,
    })
}

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<BlockedSite> {
    let limits_raw: String = row.get(4)?;
    let day_limits: DayLimits =
        serde_json::from_str(&limits_raw).map_err(|e| conversion_err(4, e))?;
    Ok(BlockedSite {
        id: uuid_col(row, 0)?,
        user_id: row.get(1)?,
        domain: row.get(2)?,
        max_daily_visits: row.get(3)?,
        day_limits,
        streak_count: row.get(5)?,
        last_streak_date: opt_date_col(row, 6)?,
    })
}

fn attempt_from_row(row: &Row<'_>) -> rusqlite::Result<BlockedSiteAttempt> {
    Ok(BlockedSiteAttempt {
        id: uuid_col(row, 0)?,
        user_id: row.get(1)?,
        domain: row.get(2)?,
        site_id: opt_uuid_col(row, 3)?,
        bypassed: row.get(4)?,
        session_start: ts_col(row, 5)?,
        session_end: opt_ts_col(row, 6)?,
        duration_secs: row.get(7)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<WellnessEntry> {
    Ok(WellnessEntry {
        id: uuid_col(row, 0)?,
        user_id: row.get(1)?,
        tracked_date: date_col(row, 2)?,
        ratings: WellnessRatings {
            mood: row.get(3)?,
            sleep: row.get(4)?,
            nutrition: row.get(5)?,
            exercise: row.get(6)?,
            social: row.get(7)?,
        },
        description: row.get(8)?,
        skipped: row.get(9)?,
    })
}

const SESSION_COLS: &str =
    "id, user_id, activity, sound, planned_secs, actual_secs, flow_mode, started_at, ended_at, status";
const SITE_COLS: &str =
    "id, user_id, domain, max_daily_visits, day_limits, streak_count, last_streak_date";
const ATTEMPT_COLS: &str =
    "id, user_id, domain, site_id, bypassed, session_start, session_end, duration_secs";
const ENTRY_COLS: &str =
    "id, user_id, tracked_date, mood, sleep, nutrition, exercise, social, description, skipped";

// ── SessionStore ─────────────────────────────────────────────────────

impl SessionStore for Database {
    fn insert_session(&self, session: &FocusSession) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO focus_sessions
                (id, user_id, activity, sound, planned_secs, actual_secs, flow_mode,
                 started_at, ended_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                session.id.to_string(),
                session.user_id,
                session.activity,
                session.sound,
                session.planned_secs,
                session.actual_secs,
                session.flow_mode,
                session.started_at.to_rfc3339(),
                session.ended_at.map(|t| t.to_rfc3339()),
                session.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn active_session(&self, user_id: &str) -> Result<Option<FocusSession>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLS} FROM focus_sessions
             WHERE user_id = ?1 AND status = 'active'
             ORDER BY started_at DESC LIMIT 1"
        ))?;
        let mut rows = stmt.query_map(params![user_id], session_from_row)?;
        rows.next().transpose().map_err(StoreError::from)
    }

    fn update_duration(&self, id: Uuid, actual_secs: i64) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE focus_sessions SET actual_secs = ?2
             WHERE id = ?1 AND status = 'active'",
            params![id.to_string(), actual_secs],
        )?;
        Ok(())
    }

    fn update_sound(&self, id: Uuid, sound: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE focus_sessions SET sound = ?2
             WHERE id = ?1 AND status = 'active'",
            params![id.to_string(), sound],
        )?;
        Ok(())
    }

    fn close_session(
        &self,
        id: Uuid,
        status: SessionStatus,
        actual_secs: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE focus_sessions
             SET status = ?2, actual_secs = ?3, ended_at = ?4
             WHERE id = ?1 AND status = 'active'",
            params![
                id.to_string(),
                status.as_str(),
                actual_secs,
                ended_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn abandon_active(&self, user_id: &str, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let actives: Vec<FocusSession> = {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {SESSION_COLS} FROM focus_sessions
                 WHERE user_id = ?1 AND status = 'active'"
            ))?;
            let rows = stmt.query_map(params![user_id], session_from_row)?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        for session in &actives {
            let secs = (now - session.started_at).num_seconds().max(0);
            self.close_session(session.id, SessionStatus::Abandoned, secs, now)?;
        }
        Ok(actives.len())
    }

    fn recent_sessions(&self, user_id: &str, limit: u32) -> Result<Vec<FocusSession>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SESSION_COLS} FROM focus_sessions
             WHERE user_id = ?1 AND status != 'active'
             ORDER BY started_at DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![user_id, limit], session_from_row)?;
        rows.collect::<rusqlite::Result<_>>().map_err(StoreError::from)
    }
}

// ── LedgerStore ──────────────────────────────────────────────────────

impl LedgerStore for Database {
    fn insert_site(&self, site: &BlockedSite) -> Result<(), StoreError> {
        let limits = serde_json::to_string(&site.day_limits)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO blocked_sites
                (id, user_id, domain, max_daily_visits, day_limits, streak_count, last_streak_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                site.id.to_string(),
                site.user_id,
                site.domain,
                site.max_daily_visits,
                limits,
                site.streak_count,
                site.last_streak_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    fn delete_site(&self, user_id: &str, id: Uuid) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM blocked_sites WHERE user_id = ?1 AND id = ?2",
            params![user_id, id.to_string()],
        )?;
        Ok(changed > 0)
    }

    fn site_by_id(&self, user_id: &str, id: Uuid) -> Result<Option<BlockedSite>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SITE_COLS} FROM blocked_sites WHERE user_id = ?1 AND id = ?2"
        ))?;
        let mut rows = stmt.query_map(params![user_id, id.to_string()], site_from_row)?;
        rows.next().transpose().map_err(StoreError::from)
    }

    fn site_by_domain(
        &self,
        user_id: &str,
        domain: &str,
    ) -> Result<Option<BlockedSite>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SITE_COLS} FROM blocked_sites WHERE user_id = ?1 AND domain = ?2"
        ))?;
        let mut rows = stmt.query_map(params![user_id, domain], site_from_row)?;
        rows.next().transpose().map_err(StoreError::from)
    }

    fn sites(&self, user_id: &str) -> Result<Vec<BlockedSite>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SITE_COLS} FROM blocked_sites WHERE user_id = ?1 ORDER BY domain"
        ))?;
        let rows = stmt.query_map(params![user_id], site_from_row)?;
        rows.collect::<rusqlite::Result<_>>().map_err(StoreError::from)
    }

    fn update_site(&self, site: &BlockedSite) -> Result<(), StoreError> {
        let limits = serde_json::to_string(&site.day_limits)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.conn.execute(
            "UPDATE blocked_sites
             SET max_daily_visits = ?3, day_limits = ?4, streak_count = ?5, last_streak_date = ?6
             WHERE user_id = ?1 AND id = ?2",
            params![
                site.user_id,
                site.id.to_string(),
                site.max_daily_visits,
                limits,
                site.streak_count,
                site.last_streak_date.map(|d| d.to_string()),
            ],
        )?;
        Ok(())
    }

    fn attempts(&self, user_id: &str) -> Result<Vec<BlockedSiteAttempt>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ATTEMPT_COLS} FROM site_attempts
             WHERE user_id = ?1 ORDER BY session_start"
        ))?;
        let rows = stmt.query_map(params![user_id], attempt_from_row)?;
        rows.collect::<rusqlite::Result<_>>().map_err(StoreError::from)
    }

    fn attempts_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<BlockedSiteAttempt>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ATTEMPT_COLS} FROM site_attempts
             WHERE user_id = ?1 AND session_start >= ?2
             ORDER BY session_start"
        ))?;
        let rows = stmt.query_map(params![user_id, since.to_rfc3339()], attempt_from_row)?;
        rows.collect::<rusqlite::Result<_>>().map_err(StoreError::from)
    }

    fn record_attempt(&self, attempt: &BlockedSiteAttempt) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO site_attempts
                (id, user_id, domain, site_id, bypassed, session_start, session_end, duration_secs)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                attempt.id.to_string(),
                attempt.user_id,
                attempt.domain,
                attempt.site_id.map(|id| id.to_string()),
                attempt.bypassed,
                attempt.session_start.to_rfc3339(),
                attempt.session_end.map(|t| t.to_rfc3339()),
                attempt.duration_secs,
            ],
        )?;
        Ok(())
    }
}

// ── WellnessStore ────────────────────────────────────────────────────

impl WellnessStore for Database {
    fn upsert_entry(&self, entry: &WellnessEntry) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO wellness_entries
                (id, user_id, tracked_date, mood, sleep, nutrition, exercise, social,
                 description, skipped)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                entry.id.to_string(),
                entry.user_id,
                entry.tracked_date.to_string(),
                entry.ratings.mood,
                entry.ratings.sleep,
                entry.ratings.nutrition,
                entry.ratings.exercise,
                entry.ratings.social,
                entry.description,
                entry.skipped,
            ],
        )?;
        Ok(())
    }

    fn entry_for(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<WellnessEntry>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLS} FROM wellness_entries
             WHERE user_id = ?1 AND tracked_date = ?2"
        ))?;
        let mut rows = stmt.query_map(params![user_id, date.to_string()], entry_from_row)?;
        rows.next().transpose().map_err(StoreError::from)
    }

    fn entries_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WellnessEntry>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLS} FROM wellness_entries
             WHERE user_id = ?1 AND tracked_date >= ?2 AND tracked_date <= ?3
             ORDER BY tracked_date"
        ))?;
        let rows = stmt.query_map(
            params![user_id, from.to_string(), to.to_string()],
            entry_from_row,
        )?;
        rows.collect::<rusqlite::Result<_>>().map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(user: &str, started_at: DateTime<Utc>) -> FocusSession {
        FocusSession {
            id: Uuid::new_v4(),
            user_id: user.to_string(),
            activity: "focus".into(),
            sound: String::new(),
            planned_secs: 1500,
            actual_secs: 0,
            flow_mode: false,
            started_at,
            ended_at: None,
            status: SessionStatus::Active,
        }
    }

    #[test]
    fn session_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let s = session("user-1", now);
        db.insert_session(&s).unwrap();

        let loaded = db.active_session("user-1").unwrap().unwrap();
        assert_eq!(loaded.id, s.id);
        assert_eq!(loaded.activity, "focus");
        assert_eq!(loaded.status, SessionStatus::Active);
        // RFC 3339 text keeps sub-second precision.
        assert_eq!(loaded.started_at, now);

        assert!(db.active_session("someone-else").unwrap().is_none());
    }

    #[test]
    fn abandon_active_computes_per_row_duration() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        db.insert_session(&session("user-1", now - Duration::seconds(200))).unwrap();
        db.insert_session(&session("user-1", now - Duration::seconds(50))).unwrap();
        db.insert_session(&session("user-2", now - Duration::seconds(999))).unwrap();

        let closed = db.abandon_active("user-1", now).unwrap();
        assert_eq!(closed, 2);
        assert!(db.active_session("user-1").unwrap().is_none());

        let mut durations: Vec<i64> = db
            .recent_sessions("user-1", 10)
            .unwrap()
            .iter()
            .map(|s| s.actual_secs)
            .collect();
        durations.sort_unstable();
        assert_eq!(durations, vec![50, 200]);

        // Other users untouched.
        assert!(db.active_session("user-2").unwrap().is_some());
    }

    #[test]
    fn closed_sessions_are_not_resurrected_by_stale_writes() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let s = session("user-1", now);
        db.insert_session(&s).unwrap();
        db.close_session(s.id, SessionStatus::Completed, 90, now).unwrap();

        // A stale heartbeat against a terminal row must change nothing.
        db.update_duration(s.id, 5000).unwrap();
        let rows = db.recent_sessions("user-1", 10).unwrap();
        assert_eq!(rows[0].actual_secs, 90);
        assert_eq!(rows[0].status, SessionStatus::Completed);
    }

    #[test]
    fn duplicate_domain_violates_unique_constraint() {
        let db = Database::open_in_memory().unwrap();
        let site = BlockedSite::new("user-1", "example.com", 3);
        db.insert_site(&site).unwrap();
        let dup = BlockedSite::new("user-1", "example.com", 5);
        assert!(db.insert_site(&dup).is_err());
        // Same domain for a different user is fine.
        let other = BlockedSite::new("user-2", "example.com", 5);
        db.insert_site(&other).unwrap();
    }

    #[test]
    fn site_update_round_trips_day_limits() {
        use crate::blocklist::DayLimit;
        use chrono::Weekday;

        let db = Database::open_in_memory().unwrap();
        let mut site = BlockedSite::new("user-1", "example.com", 3);
        db.insert_site(&site).unwrap();

        site.day_limits.set(
            Weekday::Fri,
            DayLimit {
                enabled: true,
                minutes: 30,
            },
        );
        site.streak_count = 4;
        site.last_streak_date = NaiveDate::from_ymd_opt(2026, 8, 27);
        db.update_site(&site).unwrap();

        let loaded = db.site_by_id("user-1", site.id).unwrap().unwrap();
        assert!(loaded.day_limits.get(Weekday::Fri).enabled);
        assert_eq!(loaded.day_limits.get(Weekday::Fri).minutes, 30);
        assert_eq!(loaded.streak_count, 4);
        assert_eq!(loaded.last_streak_date, site.last_streak_date);
    }

    #[test]
    fn deleting_site_keeps_attempt_history() {
        let db = Database::open_in_memory().unwrap();
        let site = BlockedSite::new("user-1", "example.com", 3);
        db.insert_site(&site).unwrap();

        let attempt = BlockedSiteAttempt {
            id: Uuid::new_v4(),
            user_id: "user-1".into(),
            domain: "example.com".into(),
            site_id: Some(site.id),
            bypassed: true,
            session_start: Utc::now(),
            session_end: None,
            duration_secs: Some(120),
        };
        db.record_attempt(&attempt).unwrap();

        assert!(db.delete_site("user-1", site.id).unwrap());
        assert!(db.site_by_id("user-1", site.id).unwrap().is_none());
        let attempts = db.attempts("user-1").unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].site_id, Some(site.id));
    }

    #[test]
    fn attempts_since_filters_by_start() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        for (days_ago, bypassed) in [(10i64, false), (2, true), (0, false)] {
            db.record_attempt(&BlockedSiteAttempt {
                id: Uuid::new_v4(),
                user_id: "user-1".into(),
                domain: "example.com".into(),
                site_id: None,
                bypassed,
                session_start: now - Duration::days(days_ago),
                session_end: None,
                duration_secs: Some(60),
            })
            .unwrap();
        }
        let recent = db.attempts_since("user-1", now - Duration::days(7)).unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].session_start <= recent[1].session_start);
    }

    #[test]
    fn file_backed_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recenter.db");
        let now = Utc::now();
        let s = session("user-1", now);
        {
            let db = Database::open_at(&path).unwrap();
            db.insert_session(&s).unwrap();
            db.close_session(s.id, SessionStatus::Completed, 90, now).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        let rows = db.recent_sessions("user-1", 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, s.id);
        assert_eq!(rows[0].actual_secs, 90);
    }

    #[test]
    fn wellness_upsert_keeps_one_entry_per_day() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        let entry = WellnessEntry {
            id: Uuid::new_v4(),
            user_id: "user-1".into(),
            tracked_date: date,
            ratings: WellnessRatings {
                mood: Some(4),
                ..Default::default()
            },
            description: None,
            skipped: false,
        };
        db.upsert_entry(&entry).unwrap();
        db.upsert_entry(&WellnessEntry {
            ratings: WellnessRatings {
                mood: Some(2),
                ..Default::default()
            },
            ..entry.clone()
        })
        .unwrap();

        let all = db.entries_between("user-1", date, date).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].ratings.mood, Some(2));
    }
}
