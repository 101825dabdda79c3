mod clock;
mod config;
mod engine;
mod session;

pub use clock::{Clock, FakeClock, SystemClock, Ticker};
pub use config::{
    FocusSessionConfig, MAX_SESSIONS, MAX_SESSION_MINUTES, MIN_SESSIONS, MIN_SESSION_MINUTES,
    REST_MINUTES,
};
pub use engine::{CompletedFocusRecord, FocusMode, FocusSessionRun, TickOutcome};
pub use session::{FocusSession, FocusState, FocusStatus};
