//! Live Channel Registry
//!
//! Maps a user identity to at most one open push channel and delivers
//! newly stored messages to connected recipients. Delivery is
//! best-effort and fire-and-forget: a failed push drops the registration
//! and is never reported to the sender path.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::dto::response::MessageResponse;
use crate::infrastructure::metrics;

/// One registered push channel.
///
/// `channel_id` distinguishes this registration from any replacement, so
/// a replaced stream's teardown cannot remove its successor.
struct LiveChannel {
    channel_id: Uuid,
    opened_at: DateTime<Utc>,
    sender: mpsc::Sender<MessageResponse>,
}

/// Handle returned to the transport layer on subscribe.
pub struct LiveSubscription {
    pub channel_id: Uuid,
    pub receiver: mpsc::Receiver<MessageResponse>,
}

/// Registry of live delivery channels, keyed by user id.
///
/// Backed by a sharded concurrent map: register, notify, and unregister
/// are atomic per key without a global lock serializing unrelated users.
pub struct LiveChannelRegistry {
    channels: DashMap<i64, LiveChannel>,
    buffer: usize,
}

impl LiveChannelRegistry {
    pub fn new(buffer: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer,
        }
    }

    /// Register a new channel for `user_id`, replacing any previous one.
    ///
    /// The replaced sender is dropped, which closes the old receiver and
    /// ends its stream; the replaced stream's guard then unsubscribes with
    /// a stale channel id and leaves this registration untouched.
    pub fn subscribe(&self, user_id: i64) -> LiveSubscription {
        let (sender, receiver) = mpsc::channel(self.buffer);
        let channel_id = Uuid::new_v4();

        let previous = self.channels.insert(
            user_id,
            LiveChannel {
                channel_id,
                opened_at: Utc::now(),
                sender,
            },
        );

        if previous.is_none() {
            metrics::LIVE_CHANNELS_ACTIVE.inc();
        }

        tracing::info!(
            user_id,
            channel_id = %channel_id,
            replaced = previous.is_some(),
            "Live channel registered"
        );

        LiveSubscription {
            channel_id,
            receiver,
        }
    }

    /// Push a message to the user's registered channel, if any.
    ///
    /// No registration is a silent no-op; the message is already durable
    /// and retrievable via history. Any send failure (receiver gone or
    /// buffer full) marks the channel dead: the registration is removed
    /// and the error is swallowed.
    pub fn notify(&self, user_id: i64, payload: &MessageResponse) {
        let dead = match self.channels.get(&user_id) {
            None => return,
            Some(channel) => match channel.sender.try_send(payload.clone()) {
                Ok(()) => None,
                Err(_) => Some(channel.channel_id),
            },
        };

        if let Some(channel_id) = dead {
            self.remove(user_id, channel_id);
            tracing::debug!(
                user_id,
                channel_id = %channel_id,
                "Live delivery failed, channel dropped"
            );
        }
    }

    /// Remove the registration if it still points at the given channel.
    ///
    /// Called by the transport on completion, timeout, or error. A stale
    /// channel id (already replaced) is a no-op.
    pub fn unsubscribe(&self, user_id: i64, channel_id: Uuid) {
        if self.remove(user_id, channel_id) {
            tracing::info!(
                user_id,
                channel_id = %channel_id,
                "Live channel unregistered"
            );
        }
    }

    fn remove(&self, user_id: i64, channel_id: Uuid) -> bool {
        let removed = self
            .channels
            .remove_if(&user_id, |_, channel| channel.channel_id == channel_id)
            .is_some();
        if removed {
            metrics::LIVE_CHANNELS_ACTIVE.dec();
        }
        removed
    }

    /// Number of currently registered channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// When the user's current channel was opened, if any.
    pub fn opened_at(&self, user_id: i64) -> Option<DateTime<Utc>> {
        self.channels.get(&user_id).map(|c| c.opened_at)
    }
}

/// Unsubscribes a specific channel when the transport stream is dropped,
/// whether by client disconnect, idle timeout, or replacement.
pub struct SubscriptionGuard {
    registry: Arc<LiveChannelRegistry>,
    user_id: i64,
    channel_id: Uuid,
}

impl SubscriptionGuard {
    pub fn new(registry: Arc<LiveChannelRegistry>, user_id: i64, channel_id: Uuid) -> Self {
        Self {
            registry,
            user_id,
            channel_id,
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.user_id, self.channel_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload(content: &str) -> MessageResponse {
        MessageResponse {
            id: 1,
            sender_id: 1,
            sender_name: "Alice".into(),
            sender_avatar_url: None,
            receiver_id: 2,
            receiver_name: "Bob".into(),
            listing_id: 42,
            listing_name: "Rex".into(),
            content: content.into(),
            is_read: false,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn notify_without_registration_is_a_noop() {
        let registry = LiveChannelRegistry::new(8);
        registry.notify(2, &payload("hello"));
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_pushed_payload() {
        let registry = LiveChannelRegistry::new(8);
        let mut subscription = registry.subscribe(2);

        registry.notify(2, &payload("Also, can you hold him?"));

        let received = subscription.receiver.recv().await.unwrap();
        assert_eq!(received.content, "Also, can you hold him?");
    }

    #[tokio::test]
    async fn resubscribe_replaces_and_closes_previous_channel() {
        let registry = LiveChannelRegistry::new(8);
        let mut first = registry.subscribe(2);
        let mut second = registry.subscribe(2);

        // The old receiver observes closure
        assert!(first.receiver.recv().await.is_none());

        // Only the new channel is registered and receives pushes
        assert_eq!(registry.channel_count(), 1);
        registry.notify(2, &payload("after replace"));
        let received = second.receiver.recv().await.unwrap();
        assert_eq!(received.content, "after replace");
    }

    #[tokio::test]
    async fn failed_delivery_drops_the_registration() {
        let registry = LiveChannelRegistry::new(8);
        let subscription = registry.subscribe(2);
        drop(subscription.receiver);

        registry.notify(2, &payload("into the void"));
        assert_eq!(registry.channel_count(), 0);

        // A later notify is a safe no-op
        registry.notify(2, &payload("still nothing"));
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn full_buffer_counts_as_dead_channel() {
        let registry = LiveChannelRegistry::new(1);
        let _subscription = registry.subscribe(2);

        registry.notify(2, &payload("fits"));
        registry.notify(2, &payload("overflows"));

        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_with_stale_channel_id_keeps_replacement() {
        let registry = LiveChannelRegistry::new(8);
        let first = registry.subscribe(2);
        let _second = registry.subscribe(2);

        registry.unsubscribe(2, first.channel_id);
        assert_eq!(registry.channel_count(), 1);
    }

    #[tokio::test]
    async fn guard_drop_unsubscribes_its_own_channel() {
        let registry = Arc::new(LiveChannelRegistry::new(8));
        let subscription = registry.subscribe(2);
        let guard =
            SubscriptionGuard::new(registry.clone(), 2, subscription.channel_id);

        assert_eq!(registry.channel_count(), 1);
        drop(guard);
        assert_eq!(registry.channel_count(), 0);
    }
}
