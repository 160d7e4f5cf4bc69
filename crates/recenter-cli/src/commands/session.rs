use clap::Subcommand;
use recenter_core::session::SessionStore;
use recenter_core::{Config, Database, SessionTracker, StartSession, SystemClock};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a focus session (abandons any session already running)
    Start {
        /// Activity label
        #[arg(default_value = "focus")]
        activity: String,
        /// Background sound
        #[arg(long, default_value = "")]
        sound: String,
        /// Planned duration in minutes (0 = open-ended)
        #[arg(long, default_value_t = 0)]
        minutes: i64,
        /// Suppress periodic prompts
        #[arg(long)]
        flow: bool,
    },
    /// Show the active session, if any
    Status,
    /// Attach to the active session and heartbeat until it ends
    Watch,
    /// Finish the active session
    Finish,
    /// Change the background sound on the active session
    Sound { sound: String },
    /// Recently ended sessions
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut tracker = SessionTracker::with_config(
        &db,
        SystemClock,
        config.user_id.clone(),
        config.session.tracker_config(),
    );

    match action {
        SessionAction::Start {
            activity,
            sound,
            minutes,
            flow,
        } => {
            let session = tracker.start(StartSession {
                activity,
                sound,
                planned_secs: minutes.max(0) * 60,
                flow_mode: flow,
            })?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionAction::Status => match tracker.adopt()? {
            Some(session) => {
                let elapsed = tracker.elapsed_secs().unwrap_or(0);
                println!(
                    "{} ({}) running for {}m{}s",
                    session.activity,
                    session.id,
                    elapsed / 60,
                    elapsed % 60
                );
            }
            None => println!("no active session"),
        },
        SessionAction::Watch => {
            let Some(session) = tracker.adopt()? else {
                return Err("no active session".into());
            };
            watch(&mut tracker, session.planned_secs)?;
        }
        SessionAction::Finish => match tracker.adopt()? {
            Some(_) => {
                if let Some(finished) = tracker.finish()? {
                    println!("{}", serde_json::to_string_pretty(&finished)?);
                }
            }
            None => println!("no active session"),
        },
        SessionAction::Sound { sound } => {
            tracker.adopt()?;
            tracker.update_sound(&sound)?;
            println!("sound set to '{sound}'");
        }
        SessionAction::Recent { limit } => {
            let sessions = db.recent_sessions(&config.user_id, limit)?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}

/// Drive the tracker's heartbeat until the planned duration elapses.
///
/// Killing the process does not abandon the session; a later `status`
/// or `watch` adopts it again.
fn watch(
    tracker: &mut SessionTracker<&Database, SystemClock>,
    planned: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        std::thread::sleep(std::time::Duration::from_secs(1));
        let Some(elapsed) = tracker.tick() else {
            return Ok(());
        };
        if planned > 0 && elapsed >= planned {
            if let Some(finished) = tracker.finish()? {
                println!("{}", serde_json::to_string_pretty(&finished)?);
            }
            return Ok(());
        }
    }
}
