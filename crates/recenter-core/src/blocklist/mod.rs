mod calendar;
mod domain;
mod ledger;
mod model;
mod store;

pub use calendar::{build_calendar, current_score, CalendarDay};
pub use domain::normalize_domain;
pub use ledger::{DistractionLedger, SiteStats};
pub use model::{BlockedSite, BlockedSiteAttempt, DayLimit, DayLimits};
pub use store::LedgerStore;
