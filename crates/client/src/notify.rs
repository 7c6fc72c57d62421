//! Transient user notifications (toasts).
//!
//! Every notice is also written to the log, so a headless front end loses
//! nothing by never draining the queue.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A message shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Shared queue of pending notices. Clones share the queue.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    queue: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => tracing::warn!(notice = %message, "User notice"),
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(notice = %message, "User notice");
            }
        }
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice { level, message });
    }

    /// Take every pending notice, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue_in_order() {
        let notifier = Notifier::new();
        let shared = notifier.clone();
        notifier.success("Saved");
        shared.error("Failed");

        let notices = notifier.drain();
        assert_eq!(
            notices,
            vec![
                Notice {
                    level: NoticeLevel::Success,
                    message: "Saved".to_string()
                },
                Notice {
                    level: NoticeLevel::Error,
                    message: "Failed".to_string()
                },
            ]
        );
        assert!(shared.drain().is_empty());
    }
}
