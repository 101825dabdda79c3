//! Focus run state machine.
//!
//! A run is a value. Every operation consumes or borrows it and hands back
//! the next state; nothing here touches a clock, a thread or a disk. The
//! caller is responsible for calling `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Work -> Rest -> Work -> ... -> Work(final) -> Idle
//!          \_______________ cancel ______________/
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut run = FocusSessionRun::start(config);
//! loop {
//!     match run.tick() {
//!         TickOutcome::Continued(next) => run = next,
//!         TickOutcome::Transitioned(next, notice) => { show(notice); run = next }
//!         TickOutcome::Completed(record) => { save(record); break }
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::config::FocusSessionConfig;
use crate::events::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    Work,
    Rest,
}

/// Handed to the history collaborator when the final Work interval ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedFocusRecord {
    pub topic: String,
    pub total_sessions: u32,
    pub session_duration_minutes: u32,
}

/// A focus run in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSessionRun {
    config: FocusSessionConfig,
    mode: FocusMode,
    /// 1-based, never above `config.total_sessions`.
    current_session_index: u32,
    seconds_remaining: u64,
    is_running: bool,
}

/// Result of advancing a run by one second.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No interval boundary was crossed (or the run is paused).
    Continued(FocusSessionRun),
    /// An interval ended and the run carries on in the other mode.
    Transitioned(FocusSessionRun, Notification),
    /// The final Work interval ended. The run no longer exists.
    Completed(CompletedFocusRecord),
}

impl FocusSessionRun {
    /// Begin the first Work interval. `config` is assumed to be validated.
    pub fn start(config: FocusSessionConfig) -> Self {
        let seconds_remaining = config.work_secs();
        Self {
            config,
            mode: FocusMode::Work,
            current_session_index: 1,
            seconds_remaining,
            is_running: true,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &FocusSessionConfig {
        &self.config
    }

    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    pub fn current_session_index(&self) -> u32 {
        self.current_session_index
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Length of the interval the run is currently in.
    pub fn interval_total_secs(&self) -> u64 {
        match self.mode {
            FocusMode::Work => self.config.work_secs(),
            FocusMode::Rest => self.config.rest_secs(),
        }
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.interval_total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.seconds_remaining);
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    fn is_final_session(&self) -> bool {
        self.current_session_index >= self.config.total_sessions
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    pub fn resume(&mut self) {
        self.is_running = true;
    }

    /// Advance the clock by exactly one second.
    pub fn tick(mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Continued(self);
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return TickOutcome::Continued(self);
        }

        match self.mode {
            FocusMode::Work if self.is_final_session() => {
                TickOutcome::Completed(CompletedFocusRecord {
                    topic: self.config.topic,
                    total_sessions: self.config.total_sessions,
                    session_duration_minutes: self.config.session_duration_minutes,
                })
            }
            FocusMode::Work => {
                self.mode = FocusMode::Rest;
                self.seconds_remaining = self.config.rest_secs();
                let notice = Notification::RestStarted {
                    session_index: self.current_session_index,
                    total_sessions: self.config.total_sessions,
                    rest_secs: self.seconds_remaining,
                };
                TickOutcome::Transitioned(self, notice)
            }
            FocusMode::Rest => {
                self.mode = FocusMode::Work;
                self.current_session_index =
                    (self.current_session_index + 1).min(self.config.total_sessions);
                self.seconds_remaining = self.config.work_secs();
                let notice = Notification::BackToWork {
                    session_index: self.current_session_index,
                    total_sessions: self.config.total_sessions,
                };
                TickOutcome::Transitioned(self, notice)
            }
        }
    }
}
