//! # Recenter Core Library
//!
//! Core business logic for Recenter: focus-session time accounting,
//! distraction blocking, and wellbeing scoring. The CLI binary (and any
//! GUI shell) is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session tracker**: a wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick()` for heartbeat writes
//! - **Distraction ledger**: blocklist configuration and statistics
//!   derived from the append-only attempt log
//! - **Score engine**: pure 0-100 scoring with tier labels, shared by
//!   every report surface
//! - **Storage**: SQLite entity storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionTracker`]: active-session lifecycle and heartbeats
//! - [`DistractionLedger`]: blocklist management and calendar stats
//! - [`WellnessLog`]: daily check-ins
//! - [`Database`]: persistence for all four entities
//! - [`Config`]: application configuration management

pub mod blocklist;
pub mod clock;
pub mod error;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod wellness;

pub use blocklist::{BlockedSite, BlockedSiteAttempt, CalendarDay, DistractionLedger, SiteStats};
pub use clock::{offset_from_hours, Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use scoring::{focus_score, wellbeing_score, ScoreTier, WellnessRatings};
pub use session::{FocusSession, SessionStatus, SessionTracker, StartSession, TrackerState};
pub use storage::{Config, Database};
pub use wellness::{WellnessEntry, WellnessLog};
