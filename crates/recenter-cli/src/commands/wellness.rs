use chrono::NaiveDate;
use clap::Subcommand;
use recenter_core::{Config, Database, WellnessLog, WellnessRatings};

use super::local_today;

#[derive(Subcommand)]
pub enum WellnessAction {
    /// Record today's (or a given day's) check-in
    Checkin {
        /// Tracked date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        mood: Option<u8>,
        #[arg(long)]
        sleep: Option<u8>,
        #[arg(long)]
        nutrition: Option<u8>,
        #[arg(long)]
        exercise: Option<u8>,
        #[arg(long)]
        social: Option<u8>,
        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },
    /// Skip a day so it is not re-prompted
    Skip {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Per-day wellbeing scores over a trailing window
    Report {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

pub fn run(action: WellnessAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let log = WellnessLog::new(&db, config.user_id.clone());
    let today = local_today(&config);

    match action {
        WellnessAction::Checkin {
            date,
            mood,
            sleep,
            nutrition,
            exercise,
            social,
            note,
        } => {
            let ratings = WellnessRatings {
                mood,
                sleep,
                nutrition,
                exercise,
                social,
            };
            let entry = log.check_in(date.unwrap_or(today), ratings, note)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        WellnessAction::Skip { date } => {
            let entry = log.skip(date.unwrap_or(today))?;
            println!("skipped {}", entry.tracked_date);
        }
        WellnessAction::Report { days } => {
            let report = log.report(today, days)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
