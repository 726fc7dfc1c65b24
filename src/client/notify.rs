use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// How long a notification of this severity stays on screen.
    pub fn lifetime(self) -> Duration {
        match self {
            Self::Success => Duration::from_secs(3),
            Self::Info => Duration::from_secs(4),
            Self::Warning => Duration::from_secs(5),
            Self::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

/// Holds the single visible notification. Showing a new one replaces the
/// old one; each expires after its severity's lifetime.
#[derive(Debug, Default)]
pub struct Toaster {
    current: Option<(Notification, tokio::time::Instant)>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, notification: Notification) {
        let expires_at = tokio::time::Instant::now() + notification.severity.lifetime();
        self.current = Some((notification, expires_at));
    }

    pub fn visible(&mut self) -> Option<&Notification> {
        if let Some((_, expires_at)) = &self.current {
            if tokio::time::Instant::now() >= *expires_at {
                self.current = None;
            }
        }
        self.current.as_ref().map(|(n, _)| n)
    }
}
