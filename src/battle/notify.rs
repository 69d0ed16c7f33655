//! User-facing notifications.
//!
//! Separate from logging: these are the messages a UI shows the player
//! ("Not enough TP", "Player A wins"). The battle hands each one to a
//! `NotificationSink` and keeps the most recent ones in its history.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How prominently a notification should be shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

/// A message for the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// Turn the notification was raised on.
    pub turn: u32,
}

/// Receiver of notifications. Fire-and-forget.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification);
}

impl<F> NotificationSink for F
where
    F: FnMut(&Notification),
{
    fn notify(&mut self, notification: &Notification) {
        self(notification)
    }
}

/// Default sink: forwards notifications to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notification: &Notification) {
        match notification.severity {
            Severity::Info => info!(turn = notification.turn, "{}", notification.message),
            Severity::Warning => warn!(turn = notification.turn, "{}", notification.message),
        }
    }
}

/// Entries kept in a battle's notification history.
pub const HISTORY_LIMIT: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |n: &Notification| seen.push(n.message.clone());
            sink.notify(&Notification {
                message: "hello".into(),
                severity: Severity::Info,
                turn: 1,
            });
        }
        assert_eq!(seen, vec!["hello".to_string()]);
    }
}
