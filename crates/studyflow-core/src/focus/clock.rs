//! Time sources for driving focus runs.
//!
//! Elapsed wall time is converted into whole one-second ticks. A gap of N
//! seconds (a suspended laptop, a CLI invoked minutes later) becomes N
//! sequential ticks, so interval boundaries are never jumped over.

use std::cell::Cell;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests.
#[derive(Debug)]
pub struct FakeClock {
    now: Cell<DateTime<Utc>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Converts wall-clock deltas into whole-second tick counts.
///
/// Sub-second remainders carry over to the next call. Serializable so a
/// caller that persists its run between processes can persist this too.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    #[serde(default)]
    last_tick_at: Option<DateTime<Utc>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `now`.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.last_tick_at = Some(now);
    }

    /// Stop counting. Time that passes while disarmed is never ticked.
    pub fn disarm(&mut self) {
        self.last_tick_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.last_tick_at.is_some()
    }

    /// Whole seconds elapsed since the last call, consuming them.
    pub fn due_ticks(&mut self, now: DateTime<Utc>) -> u64 {
        let Some(last) = self.last_tick_at else {
            return 0;
        };
        let elapsed = now.signed_duration_since(last).num_seconds();
        if elapsed <= 0 {
            if now < last {
                // Clock went backwards; restart from here.
                self.last_tick_at = Some(now);
            }
            return 0;
        }
        self.last_tick_at = Some(last + Duration::seconds(elapsed));
        elapsed as u64
    }
}
