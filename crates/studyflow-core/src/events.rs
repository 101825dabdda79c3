use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// User-facing notices raised by the focus session engine.
/// The engine does not care how they are shown; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Notification {
    /// A Work interval ended and a Rest interval began.
    RestStarted {
        session_index: u32,
        total_sessions: u32,
        rest_secs: u64,
    },
    /// A Rest interval ended; the next Work interval began.
    BackToWork {
        session_index: u32,
        total_sessions: u32,
    },
    /// The final Work interval ended and the run was recorded.
    SetComplete { topic: String, total_sessions: u32 },
}

impl Notification {
    /// Short text suitable for a toast or a terminal line.
    pub fn message(&self) -> String {
        match self {
            Notification::RestStarted {
                session_index,
                total_sessions,
                rest_secs,
            } => format!(
                "Session {session_index}/{total_sessions} done. Take a {} minute break.",
                rest_secs / 60
            ),
            Notification::BackToWork {
                session_index,
                total_sessions,
            } => format!("Break's over. Starting session {session_index}/{total_sessions}."),
            Notification::SetComplete {
                topic,
                total_sessions,
            } => format!("Finished {total_sessions} session(s) of {topic}. Nice work!"),
        }
    }
}

/// Receiver for [`Notification`]s.
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification)
    }
}

/// Buffers notifications so the caller can drain and display them later.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything buffered so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: &Notification) {
        self.entries.borrow_mut().push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kebab_case_tag() {
        let n = Notification::BackToWork {
            session_index: 2,
            total_sessions: 3,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "back-to-work");
        assert_eq!(json["session_index"], 2);
    }

    #[test]
    fn rest_message_mentions_minutes() {
        let n = Notification::RestStarted {
            session_index: 1,
            total_sessions: 4,
            rest_secs: 300,
        };
        assert_eq!(n.message(), "Session 1/4 done. Take a 5 minute break.");
    }

    #[test]
    fn log_drains_in_order() {
        let log = NotificationLog::new();
        let first = Notification::SetComplete {
            topic: "Algebra".into(),
            total_sessions: 1,
        };
        log.notify(&first);
        (&log).notify(&first);
        assert_eq!(log.len(), 2);
        assert_eq!(log.drain(), vec![first.clone(), first]);
        assert!(log.is_empty());
    }
}
