//! Transient user notifications (toasts).
//!
//! The dashboard shell decides how a toast is shown; the core only says
//! what to show. `TracingNotifier` writes toasts to the log and
//! `RecordingNotifier` keeps them for inspection.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success | Level::Info => tracing::info!(toast = ?level, "{message}"),
            Level::Warning => tracing::warn!(toast = ?level, "{message}"),
            Level::Error => tracing::error!(toast = ?level, "{message}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.shown.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.shown.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.shown.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.shown.lock().push(Notification {
            level,
            message: message.to_string(),
        });
    }
}
