use chrono::{Duration, Utc, Weekday};
use clap::Subcommand;
use recenter_core::blocklist::LedgerStore;
use recenter_core::{
    BlockedSiteAttempt, Config, Database, DistractionLedger, ScoreTier, SystemClock,
};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum BlockAction {
    /// Add a domain to the blocklist
    Add {
        domain: String,
        /// Visits allowed per day
        #[arg(long, default_value_t = 3)]
        max_daily_visits: u32,
    },
    /// Remove a blocked site (attempt history is kept)
    Remove { id: Uuid },
    /// List blocked sites
    List,
    /// Set the daily visit allowance (floors at 0)
    Limit { id: Uuid, value: i64 },
    /// Adjust the daily visit allowance by a delta (floors at 1)
    Adjust { id: Uuid, delta: i64 },
    /// Configure one weekday's time limit
    DayLimit {
        id: Uuid,
        /// Weekday, e.g. "mon" or "monday"
        day: String,
        #[arg(long)]
        enabled: bool,
        #[arg(long, default_value_t = 0)]
        minutes: i64,
    },
    /// Per-site attempt statistics
    Stats,
    /// Distraction calendar for the trailing range
    Calendar {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Current focus score and tier
    Score,
    /// Bypassed attempts within the trailing window
    Bypasses {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Record an attempt (stand-in for the browser-extension bridge)
    Attempt {
        domain: String,
        #[arg(long)]
        bypassed: bool,
        #[arg(long, default_value_t = 0)]
        duration_secs: i64,
    },
    /// Advance or reset per-site streaks for today
    Streaks,
}

pub fn run(action: BlockAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let ledger = DistractionLedger::new(
        &db,
        SystemClock,
        config.user_id.clone(),
        config.timezone_offset_hours,
    );

    match action {
        BlockAction::Add {
            domain,
            max_daily_visits,
        } => {
            let site = ledger.add_blocked_site(&domain, max_daily_visits)?;
            println!("{}", serde_json::to_string_pretty(&site)?);
        }
        BlockAction::Remove { id } => {
            if ledger.remove_blocked_site(id)? {
                println!("removed {id}");
            } else {
                println!("no blocked site with id {id}");
            }
        }
        BlockAction::List => {
            let sites = ledger.blocked_sites()?;
            println!("{}", serde_json::to_string_pretty(&sites)?);
        }
        BlockAction::Limit { id, value } => {
            let site = ledger.update_max_daily_visits(id, value)?;
            println!("{} -> {} visits/day", site.domain, site.max_daily_visits);
        }
        BlockAction::Adjust { id, delta } => {
            let site = ledger.adjust_max_daily_visits(id, delta)?;
            println!("{} -> {} visits/day", site.domain, site.max_daily_visits);
        }
        BlockAction::DayLimit {
            id,
            day,
            enabled,
            minutes,
        } => {
            let weekday = parse_weekday(&day)?;
            let site = ledger.set_day_limit(id, weekday, enabled, minutes)?;
            println!("{}", serde_json::to_string_pretty(&site)?);
        }
        BlockAction::Stats => {
            let stats = ledger.site_stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        BlockAction::Calendar { days } => {
            let days = days.unwrap_or(config.reports.calendar_range_days);
            let calendar = ledger.calendar_data(days)?;
            println!("{}", serde_json::to_string_pretty(&calendar)?);
        }
        BlockAction::Score => {
            let days = config.reports.calendar_range_days;
            let score = ledger.current_score(days)?;
            let tier = ScoreTier::from_score(score);
            match score {
                Some(s) => println!("{s} ({})", tier.label()),
                None => println!("no data"),
            }
        }
        BlockAction::Bypasses { days } => {
            let attempts = ledger.bypass_attempts(days)?;
            println!("{}", serde_json::to_string_pretty(&attempts)?);
        }
        BlockAction::Attempt {
            domain,
            bypassed,
            duration_secs,
        } => {
            let normalized = recenter_core::blocklist::normalize_domain(&domain)?;
            let site_id = db
                .site_by_domain(&config.user_id, &normalized)?
                .map(|s| s.id);
            let now = Utc::now();
            let attempt = BlockedSiteAttempt {
                id: Uuid::new_v4(),
                user_id: config.user_id.clone(),
                domain: normalized,
                site_id,
                bypassed,
                session_start: now - Duration::seconds(duration_secs.max(0)),
                session_end: Some(now),
                duration_secs: Some(duration_secs.max(0)),
            };
            db.record_attempt(&attempt)?;
            println!("{}", serde_json::to_string_pretty(&attempt)?);
        }
        BlockAction::Streaks => {
            let sites = ledger.record_streaks(None)?;
            for site in sites {
                println!("{}: streak {}", site.domain, site.streak_count);
            }
        }
    }
    Ok(())
}

fn parse_weekday(raw: &str) -> Result<Weekday, Box<dyn std::error::Error>> {
    raw.parse::<Weekday>()
        .map_err(|_| format!("'{raw}' is not a weekday (try mon..sun)").into())
}
