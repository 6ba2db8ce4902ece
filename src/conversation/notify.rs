//! Transient user notifications ("toasts")
//!
//! The controller pushes, the UI renders whatever has not expired yet.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Keeps the queue bounded if nothing ever renders it
const MAX_NOTIFICATIONS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    pub created: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= NOTIFICATION_TTL
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NotificationLevel, text: impl Into<String>) {
        if self.queue.len() == MAX_NOTIFICATIONS {
            self.queue.pop_front();
        }
        self.queue.push_back(Notification {
            level,
            text: text.into(),
            created: Instant::now(),
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Error, text);
    }

    /// Drop notifications older than the TTL
    pub fn expire(&mut self, now: Instant) {
        self.queue.retain(|n| !n.is_expired(now));
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.queue.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.queue.iter().map(|n| n.text.as_str()).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.queue.iter().any(|n| n.text == text)
    }

    pub fn last(&self) -> Option<&Notification> {
        self.queue.back()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
