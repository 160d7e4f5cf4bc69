//! Wall-clock seam.
//!
//! The tracker and ledger never read the system time directly; they go
//! through [`Clock`] so tests can drive time deterministically. Durations
//! are computed over spans of minutes to hours -- no leap-second or NTP
//! skew handling is attempted.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};

/// Source of "now" for duration arithmetic.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Fixed offset for a whole-hour UTC offset, as configured in
/// `timezone_offset_hours`. Out-of-range values fall back to UTC, so
/// every consumer of the config value resolves it the same way.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and simulations.
///
/// Clones share the same underlying instant, so a clone handed to a
/// tracker can be advanced from the outside.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
