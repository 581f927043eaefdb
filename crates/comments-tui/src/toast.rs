//! Transient notifications shown in the corner of the screen.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Oldest notifications are dropped beyond this many.
const MAX_TOASTS: usize = 5;
/// Form validation errors clear sooner than request errors.
const VALIDATION_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    pub fn lifetime(self) -> Duration {
        match self {
            ToastLevel::Info => Duration::from_secs(2),
            ToastLevel::Success => Duration::from_secs(3),
            ToastLevel::Error => Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    pub fn push_at(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        self.push_for(level, message, level.lifetime(), now);
    }

    fn push_for(
        &mut self,
        level: ToastLevel,
        message: impl Into<String>,
        lifetime: Duration,
        now: Instant,
    ) {
        let message = message.into();
        tracing::debug!(?level, %message, "toast");

        self.items.push_back(Toast {
            level,
            message,
            expires_at: now + lifetime,
        });
        while self.items.len() > MAX_TOASTS {
            self.items.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// An error toast for a rejected form field.
    pub fn validation_error(&mut self, message: impl Into<String>) {
        self.push_for(ToastLevel::Error, message, VALIDATION_LIFETIME, Instant::now());
    }

    /// Drop everything that has expired by `now`.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|toast| toast.expires_at > now);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
