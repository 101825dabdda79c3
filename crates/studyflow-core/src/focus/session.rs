//! Caller-owned holder for the current focus run.
//!
//! Wraps the pure engine with the two collaborators it reports to: a
//! [`FocusHistory`] that receives completed runs and a [`Notifier`] that
//! receives interval notices. Recording failures are logged and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Ticker;
use super::config::FocusSessionConfig;
use super::engine::{FocusMode, FocusSessionRun, TickOutcome};
use crate::events::{Notification, Notifier};
use crate::persistence::FocusHistory;

/// Coarse state of the session holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    Idle,
    Work,
    Rest,
}

/// Serializable view of the holder for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusStatus {
    pub state: FocusState,
    pub topic: Option<String>,
    pub current_session_index: Option<u32>,
    pub total_sessions: Option<u32>,
    pub seconds_remaining: Option<u64>,
    pub is_running: bool,
    pub progress_fraction: f64,
}

pub struct FocusSession<H, N> {
    run: Option<FocusSessionRun>,
    history: H,
    notifier: N,
}

impl<H: FocusHistory, N: Notifier> FocusSession<H, N> {
    pub fn new(history: H, notifier: N) -> Self {
        Self {
            run: None,
            history,
            notifier,
        }
    }

    /// Resume holding a run restored from storage.
    pub fn from_run(run: Option<FocusSessionRun>, history: H, notifier: N) -> Self {
        Self {
            run,
            history,
            notifier,
        }
    }

    pub fn run(&self) -> Option<&FocusSessionRun> {
        self.run.as_ref()
    }

    pub fn into_run(self) -> Option<FocusSessionRun> {
        self.run
    }

    pub fn state(&self) -> FocusState {
        match self.run.as_ref().map(FocusSessionRun::mode) {
            None => FocusState::Idle,
            Some(FocusMode::Work) => FocusState::Work,
            Some(FocusMode::Rest) => FocusState::Rest,
        }
    }

    pub fn progress_fraction(&self) -> Option<f64> {
        self.run.as_ref().map(FocusSessionRun::progress_fraction)
    }

    pub fn status(&self) -> FocusStatus {
        let run = self.run.as_ref();
        FocusStatus {
            state: self.state(),
            topic: run.map(|r| r.config().topic.clone()),
            current_session_index: run.map(FocusSessionRun::current_session_index),
            total_sessions: run.map(|r| r.config().total_sessions),
            seconds_remaining: run.map(FocusSessionRun::seconds_remaining),
            is_running: run.is_some_and(FocusSessionRun::is_running),
            progress_fraction: self.progress_fraction().unwrap_or(0.0),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new run, discarding any current one without recording it.
    pub fn start(&mut self, config: FocusSessionConfig) -> &FocusSessionRun {
        if let Some(previous) = self.run.take() {
            tracing::debug!(topic = %previous.config().topic, "replacing unfinished focus run");
        }
        tracing::debug!(
            topic = %config.topic,
            total_sessions = config.total_sessions,
            minutes = config.session_duration_minutes,
            "focus run started"
        );
        self.run.insert(FocusSessionRun::start(config))
    }

    pub fn pause(&mut self) -> bool {
        match self.run.as_mut() {
            Some(run) => {
                run.pause();
                true
            }
            None => false,
        }
    }

    pub fn resume(&mut self) -> bool {
        match self.run.as_mut() {
            Some(run) => {
                run.resume();
                true
            }
            None => false,
        }
    }

    /// Drop the current run. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.run.take() {
            Some(run) => {
                tracing::debug!(topic = %run.config().topic, "focus run cancelled");
                true
            }
            None => false,
        }
    }

    /// Advance one second. Returns the notice raised by this tick, if any.
    pub fn tick(&mut self) -> Option<Notification> {
        let run = self.run.take()?;
        match run.tick() {
            TickOutcome::Continued(next) => {
                self.run = Some(next);
                None
            }
            TickOutcome::Transitioned(next, notice) => {
                tracing::debug!(
                    mode = ?next.mode(),
                    session = next.current_session_index(),
                    "focus interval changed"
                );
                self.run = Some(next);
                self.notifier.notify(&notice);
                Some(notice)
            }
            TickOutcome::Completed(record) => {
                tracing::info!(
                    topic = %record.topic,
                    total_sessions = record.total_sessions,
                    "focus run completed"
                );
                if let Err(e) = self.history.record(&record) {
                    tracing::warn!(error = %e, "failed to record completed focus run");
                }
                let notice = Notification::SetComplete {
                    topic: record.topic,
                    total_sessions: record.total_sessions,
                };
                self.notifier.notify(&notice);
                Some(notice)
            }
        }
    }

    /// Apply `ticks` one-second ticks in order.
    ///
    /// Stops early once the run is gone; leftover ticks are discarded.
    pub fn advance(&mut self, ticks: u64) -> Vec<Notification> {
        let mut notices = Vec::new();
        for _ in 0..ticks {
            match self.run.as_ref() {
                Some(run) if run.is_running() => {}
                _ => break,
            }
            if let Some(notice) = self.tick() {
                notices.push(notice);
            }
        }
        notices
    }

    /// Tick for the wall time `ticker` has seen pass since it was armed.
    ///
    /// Disarms the ticker once the run is paused or gone.
    pub fn catch_up(&mut self, ticker: &mut Ticker, now: DateTime<Utc>) -> Vec<Notification> {
        let running = self.run.as_ref().is_some_and(FocusSessionRun::is_running);
        if !running {
            ticker.disarm();
            return Vec::new();
        }
        if !ticker.is_armed() {
            ticker.arm(now);
            return Vec::new();
        }
        let due = ticker.due_ticks(now);
        let notices = self.advance(due);
        if self.run.is_none() {
            ticker.disarm();
        }
        notices
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::{CoreError, Result, StorageError};
    use crate::events::NotificationLog;
    use crate::focus::clock::{Clock, FakeClock};
    use crate::focus::CompletedFocusRecord;

    #[derive(Default)]
    struct MemoryHistory {
        records: RefCell<Vec<CompletedFocusRecord>>,
    }

    impl FocusHistory for MemoryHistory {
        fn record(&self, record: &CompletedFocusRecord) -> Result<()> {
            self.records.borrow_mut().push(record.clone());
            Ok(())
        }
    }

    struct FailingHistory;

    impl FocusHistory for FailingHistory {
        fn record(&self, _record: &CompletedFocusRecord) -> Result<()> {
            Err(CoreError::Storage(StorageError::Locked))
        }
    }

    fn algebra(sessions: u32, minutes: u32) -> FocusSessionConfig {
        FocusSessionConfig::new("Algebra", sessions, minutes).unwrap()
    }

    #[test]
    fn idle_until_started() {
        let history = MemoryHistory::default();
        let session = FocusSession::new(&history, NotificationLog::new());
        assert_eq!(session.state(), FocusState::Idle);
        assert!(session.progress_fraction().is_none());
        assert!(!session.status().is_running);
    }

    #[test]
    fn algebra_two_by_ten_walkthrough() {
        let history = MemoryHistory::default();
        let log = NotificationLog::new();
        let mut session = FocusSession::new(&history, &log);
        session.start(algebra(2, 10));

        session.advance(600);
        let run = session.run().unwrap();
        assert_eq!(run.mode(), FocusMode::Rest);
        assert_eq!(run.current_session_index(), 1);
        assert_eq!(run.seconds_remaining(), 300);

        session.advance(300);
        let run = session.run().unwrap();
        assert_eq!(run.mode(), FocusMode::Work);
        assert_eq!(run.current_session_index(), 2);
        assert_eq!(run.seconds_remaining(), 600);

        session.advance(600);
        assert!(session.run().is_none());
        let records = history.records.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "Algebra");
        assert_eq!(records[0].total_sessions, 2);

        let kinds: Vec<_> = log
            .drain()
            .into_iter()
            .map(|n| match n {
                Notification::RestStarted { .. } => "rest",
                Notification::BackToWork { .. } => "work",
                Notification::SetComplete { .. } => "done",
            })
            .collect();
        assert_eq!(kinds, vec!["rest", "work", "done"]);
    }

    #[test]
    fn ticks_to_completion_match_formula() {
        for sessions in 1..=4u32 {
            let history = MemoryHistory::default();
            let mut session = FocusSession::new(&history, NotificationLog::new());
            let config = algebra(sessions, 10);
            let expected = config.total_secs();
            session.start(config);

            let mut ticks = 0u64;
            while session.run().is_some() {
                session.tick();
                ticks += 1;
            }
            assert_eq!(
                ticks,
                u64::from(sessions) * 600 + u64::from(sessions - 1) * 300
            );
            assert_eq!(ticks, expected);
            assert_eq!(history.records.borrow().len(), 1);
        }
    }

    #[test]
    fn mode_sequence_alternates_and_index_is_monotonic() {
        let history = MemoryHistory::default();
        let mut session = FocusSession::new(&history, NotificationLog::new());
        session.start(algebra(4, 10));

        let mut modes = vec![FocusMode::Work];
        let mut last_index = 1;
        while let Some(run) = session.run() {
            let before_mode = run.mode();
            session.tick();
            if let Some(run) = session.run() {
                assert!(run.current_session_index() >= last_index);
                if before_mode == FocusMode::Rest && run.mode() == FocusMode::Work {
                    assert_eq!(run.current_session_index(), last_index + 1);
                }
                last_index = run.current_session_index();
                if run.mode() != before_mode {
                    modes.push(run.mode());
                }
            }
        }
        assert_eq!(last_index, 4);
        let works = modes.iter().filter(|m| **m == FocusMode::Work).count();
        let rests = modes.iter().filter(|m| **m == FocusMode::Rest).count();
        assert_eq!((works, rests), (4, 3));
        assert!(modes.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn cancel_is_idempotent_and_never_records() {
        let history = MemoryHistory::default();
        let mut session = FocusSession::new(&history, NotificationLog::new());
        assert!(!session.cancel());

        session.start(algebra(1, 10));
        assert!(session.cancel());
        assert!(!session.cancel());
        assert!(history.records.borrow().is_empty());

        session.start(algebra(1, 10));
        session.advance(600);
        assert_eq!(history.records.borrow().len(), 1);
        assert!(!session.cancel());
        session.advance(10);
        assert_eq!(history.records.borrow().len(), 1);
    }

    #[test]
    fn paused_session_ignores_ticks() {
        let history = MemoryHistory::default();
        let mut session = FocusSession::new(&history, NotificationLog::new());
        session.start(algebra(2, 10));
        session.advance(10);
        assert!(session.pause());

        assert!(session.tick().is_none());
        assert!(session.advance(1_000).is_empty());
        let run = session.run().unwrap();
        assert_eq!(run.seconds_remaining(), 590);
        assert_eq!(run.mode(), FocusMode::Work);

        assert!(session.resume());
        session.advance(10);
        assert_eq!(session.run().unwrap().seconds_remaining(), 580);
    }

    #[test]
    fn pause_and_resume_without_run_report_false() {
        let history = MemoryHistory::default();
        let mut session = FocusSession::new(&history, NotificationLog::new());
        assert!(!session.pause());
        assert!(!session.resume());
    }

    #[test]
    fn history_failure_does_not_keep_run_alive() {
        let log = NotificationLog::new();
        let mut session = FocusSession::new(FailingHistory, &log);
        session.start(algebra(1, 10));
        let notices = session.advance(600);
        assert!(session.run().is_none());
        assert!(matches!(
            notices.last(),
            Some(Notification::SetComplete { .. })
        ));
    }

    #[test]
    fn catch_up_applies_every_elapsed_second() {
        let history = MemoryHistory::default();
        let clock = FakeClock::default();
        let mut ticker = Ticker::new();
        let mut session = FocusSession::new(&history, NotificationLog::new());
        session.start(algebra(2, 10));
        ticker.arm(clock.now());

        // Asleep across the whole first Work and most of the Rest.
        clock.advance_secs(600 + 200);
        let notices = session.catch_up(&mut ticker, clock.now());
        assert_eq!(notices.len(), 1);
        let run = session.run().unwrap();
        assert_eq!(run.mode(), FocusMode::Rest);
        assert_eq!(run.seconds_remaining(), 100);

        // Far past the end: completes once, extra time is ignored.
        clock.advance_secs(10_000);
        let notices = session.catch_up(&mut ticker, clock.now());
        assert_eq!(notices.len(), 2);
        assert!(session.run().is_none());
        assert!(!ticker.is_armed());
        assert_eq!(history.records.borrow().len(), 1);
    }

    #[test]
    fn catch_up_while_paused_disarms() {
        let history = MemoryHistory::default();
        let clock = FakeClock::default();
        let mut ticker = Ticker::new();
        let mut session = FocusSession::new(&history, NotificationLog::new());
        session.start(algebra(1, 10));
        ticker.arm(clock.now());
        session.pause();

        clock.advance_secs(120);
        assert!(session.catch_up(&mut ticker, clock.now()).is_empty());
        assert!(!ticker.is_armed());
        assert_eq!(session.run().unwrap().seconds_remaining(), 600);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_ticks_match_config(sessions in 1u32..=8, minutes in 10u32..=60) {
                let history = MemoryHistory::default();
                let mut session = FocusSession::new(&history, NotificationLog::new());
                let config = algebra(sessions, minutes);
                let expected = config.total_secs();
                session.start(config);

                session.advance(expected - 1);
                prop_assert!(session.run().is_some());
                session.advance(1);
                prop_assert!(session.run().is_none());
                prop_assert_eq!(history.records.borrow().len(), 1);
            }
        }
    }
}
