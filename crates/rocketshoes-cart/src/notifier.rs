//! # Notifier
//!
//! Fire-and-forget delivery of [`Notice`]s to the shopper.
//!
//! ```text
//! ┌──────────────────┬───────────────────────────────────────────────────┐
//! │ TracingNotifier  │ logs every notice at WARN (default)               │
//! │ ChannelNotifier  │ broadcasts to any number of UI subscribers        │
//! │ NoOpNotifier     │ drops everything                                  │
//! └──────────────────┴───────────────────────────────────────────────────┘
//! ```

use rocketshoes_core::Notice;
use tokio::sync::broadcast;
use tracing::warn;

/// Sink for user-facing notices. Must not block.
pub trait Notifier: Send + Sync {
    /// Delivers one notice.
    fn notify(&self, notice: Notice);
}

/// Logs notices through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        warn!(notice = ?notice, message = notice.message(), "Cart notice");
    }
}

/// No-op notifier for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Broadcasts notices to subscribers.
///
/// Notices raised while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: broadcast::Sender<Notice>,
}

impl ChannelNotifier {
    /// Creates a notifier that buffers up to `capacity` notices per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        ChannelNotifier { tx }
    }

    /// Subscribes to notices raised from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        ChannelNotifier::new(16)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_delivers_to_subscribers() {
        let notifier = ChannelNotifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify(Notice::RemoveFailed);

        assert_eq!(first.try_recv().unwrap(), Notice::RemoveFailed);
        assert_eq!(second.try_recv().unwrap(), Notice::RemoveFailed);
    }

    #[test]
    fn test_channel_notifier_without_subscribers() {
        let notifier = ChannelNotifier::new(1);
        notifier.notify(Notice::AddFailed);

        let mut late = notifier.subscribe();
        assert!(late.try_recv().is_err());
    }
}
