use clap::Subcommand;
use serde::{Deserialize, Serialize};
use studyflow_core::focus::{Clock, FocusStatus, SystemClock};
use studyflow_core::{
    Config, Database, FocusSession, FocusSessionConfig, FocusSessionRun, Notification,
    NotificationLog, Ticker,
};

const FOCUS_KEY_PREFIX: &str = "focus_run";

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a new focus run
    Start {
        /// What is being studied (default: focus.topic)
        #[arg(long)]
        topic: Option<String>,
        /// Number of Work intervals, 1-8 (default: focus.total_sessions)
        #[arg(long)]
        sessions: Option<u32>,
        /// Minutes per Work interval, 10-60 (default: focus.session_duration_minutes)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Print the current run as JSON, applying elapsed time first
    Status,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// End the current run without recording it
    End,
    /// List completed runs
    History {
        /// Maximum number of entries
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Aggregate statistics over completed runs
    Stats,
}

/// What survives between CLI invocations.
#[derive(Default, Serialize, Deserialize)]
struct StoredFocus {
    run: Option<FocusSessionRun>,
    #[serde(default)]
    ticker: Ticker,
}

#[derive(Serialize)]
struct FocusOutput {
    #[serde(flatten)]
    status: FocusStatus,
    notifications: Vec<NotificationOutput>,
}

#[derive(Serialize)]
struct NotificationOutput {
    #[serde(flatten)]
    notification: Notification,
    message: String,
}

fn focus_key(user: &str) -> String {
    format!("{FOCUS_KEY_PREFIX}:{user}")
}

fn load_stored(db: &Database, key: &str) -> StoredFocus {
    match db.kv_get(key) {
        Ok(Some(json)) => match serde_json::from_str::<StoredFocus>(&json) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable focus run");
                StoredFocus::default()
            }
        },
        Ok(None) => StoredFocus::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load focus run");
            StoredFocus::default()
        }
    }
}

fn save_stored(
    db: &Database,
    key: &str,
    stored: &StoredFocus,
) -> Result<(), Box<dyn std::error::Error>> {
    if stored.run.is_none() {
        db.kv_delete(key)?;
    } else {
        db.kv_set(key, &serde_json::to_string(stored)?)?;
    }
    Ok(())
}

type Session<'a> = FocusSession<&'a Database, &'a NotificationLog>;

pub fn run(user: &str, action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let clock = SystemClock;
    let key = focus_key(user);
    let stored = load_stored(&db, &key);
    let mut ticker = stored.ticker;
    let log = NotificationLog::new();
    let mut session = FocusSession::from_run(stored.run, &db, &log);

    // Time spent between invocations counts before anything else happens,
    // so a run that finished meanwhile is recorded before history is read.
    session.catch_up(&mut ticker, clock.now());

    let outcome = apply(action, &mut session, &mut ticker, &config, &db, &clock);

    let notifications: Vec<_> = if config.notifications.enabled {
        log.drain()
            .into_iter()
            .map(|notification| NotificationOutput {
                message: notification.message(),
                notification,
            })
            .collect()
    } else {
        Vec::new()
    };
    let printed = match &outcome {
        Ok(Some(report)) => {
            for n in &notifications {
                eprintln!("{}", n.message);
            }
            serde_json::to_string_pretty(report).map(|json| println!("{json}"))
        }
        Ok(None) => {
            let output = FocusOutput {
                status: session.status(),
                notifications,
            };
            serde_json::to_string_pretty(&output).map(|json| println!("{json}"))
        }
        Err(_) => Ok(()),
    };

    // Saved even when the action failed: catching up may have moved the run.
    let stored = StoredFocus {
        run: session.into_run(),
        ticker,
    };
    save_stored(&db, &key, &stored)?;
    outcome?;
    printed?;
    Ok(())
}

/// Perform `action`. `Some(report)` replaces the status output.
fn apply(
    action: FocusAction,
    session: &mut Session<'_>,
    ticker: &mut Ticker,
    config: &Config,
    db: &Database,
    clock: &impl Clock,
) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    match action {
        FocusAction::Start {
            topic,
            sessions,
            minutes,
        } => {
            if session.run().is_some() {
                return Err("a focus run is already active; end it first".into());
            }
            let focus_config = FocusSessionConfig::new(
                topic.unwrap_or_else(|| config.focus.topic.clone()),
                sessions.unwrap_or(config.focus.total_sessions),
                minutes.unwrap_or(config.focus.session_duration_minutes),
            )?;
            session.start(focus_config);
            ticker.arm(clock.now());
        }
        FocusAction::Status => {}
        FocusAction::Pause => {
            if !session.pause() {
                return Err("no active focus run".into());
            }
            ticker.disarm();
        }
        FocusAction::Resume => {
            if !session.resume() {
                return Err("no active focus run".into());
            }
            if !ticker.is_armed() {
                ticker.arm(clock.now());
            }
        }
        FocusAction::End => {
            if session.cancel() {
                ticker.disarm();
            }
        }
        FocusAction::History { limit } => {
            return Ok(Some(serde_json::to_value(db.focus_history(limit)?)?));
        }
        FocusAction::Stats => {
            return Ok(Some(serde_json::to_value(db.focus_stats()?)?));
        }
    }
    Ok(None)
}
