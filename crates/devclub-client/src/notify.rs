//! Transient user notifications
//!
//! Flows never surface errors as panics or propagate them to a top-level
//! handler; they turn them into a [`Notice`] and hand it to a [`Notifier`].
//! Rendering is someone else's job.

use devclub_core::Error;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    /// Something worked
    Success,
    /// Neutral information
    Info,
    /// Something failed
    Error,
}

/// A toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: Level,
    /// Short heading
    pub title: String,
    /// Body text
    pub description: String,
}

impl Notice {
    /// Success notice
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Informational notice
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Error notice
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Error notice carrying the user-facing text of `err`
    pub fn from_error(title: impl Into<String>, err: &Error) -> Self {
        Self::error(title, err.user_message())
    }
}

/// Sink for notices
pub trait Notifier: Send + Sync {
    /// Show `notice`
    fn notify(&self, notice: Notice);
}

/// Notifier that keeps every notice, for tests and batch front ends
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Most recent notice
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            Level::Error => error!(title = %notice.title, "{}", notice.description),
            Level::Success | Level::Info => info!(title = %notice.title, "{}", notice.description),
        }
    }
}
