pub mod block;
pub mod config;
pub mod session;
pub mod wellness;

use chrono::{NaiveDate, Utc};
use recenter_core::clock::offset_from_hours;
use recenter_core::Config;

/// Today's date in the configured local frame. Out-of-range offsets
/// resolve to UTC, same as the ledger.
pub fn local_today(config: &Config) -> NaiveDate {
    Utc::now()
        .with_timezone(&offset_from_hours(config.timezone_offset_hours))
        .date_naive()
}
