use std::fmt;
use std::time::{Duration, Instant};

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A transient message that auto-expires
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(text: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Self {
            text: text.into(),
            severity,
            expires_at: Instant::now() + duration,
        }
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Queue of live notifications; the newest one is shown on the message line
#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    timeout: Duration,
}

impl Notifications {
    pub fn new(timeout: Duration) -> Self {
        Self {
            items: Vec::new(),
            timeout,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, severity: Severity) {
        self.items.push(Notification::new(text, severity, self.timeout));
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Info);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Warning);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Error);
    }

    /// Turn a failed result into an error notification
    pub fn report<T, E: fmt::Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(error = %e, "operation failed");
                self.error(e.to_string());
                None
            }
        }
    }

    /// Drop expired notifications; called once per frame
    pub fn prune(&mut self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired_at(now));
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }
}
