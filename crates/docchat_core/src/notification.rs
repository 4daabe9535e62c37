use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// The single transient banner. Expiry is stored on the notification itself,
/// so replacing it also replaces the deadline that hides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl Notification {
    pub(crate) fn new(id: u64, text: impl Into<String>, severity: Severity, now: Instant) -> Self {
        Self {
            id,
            text: text.into(),
            severity,
            expires_at: now + NOTIFICATION_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_at_ttl() {
        let now = Instant::now();
        let note = Notification::new(1, "hello", Severity::Info, now);

        assert!(!note.is_expired(now));
        assert!(!note.is_expired(now + NOTIFICATION_TTL - Duration::from_millis(1)));
        assert!(note.is_expired(now + NOTIFICATION_TTL));
    }
}
