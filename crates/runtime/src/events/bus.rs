//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use super::types::{LifecycleEvent, MarketEvent, SettlementEvent, SubmissionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// Arena creation, joins, starts, outcome injection, eviction
    Lifecycle,
    /// Accepted and rejected player submissions
    Submission,
    /// Trading price ticks
    Market,
    /// Settlement and payout delivery
    Settlement,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::Lifecycle,
        Topic::Submission,
        Topic::Market,
        Topic::Settlement,
    ];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Lifecycle(LifecycleEvent),
    Submission(SubmissionEvent),
    Market(MarketEvent),
    Settlement(SettlementEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Submission(_) => Topic::Submission,
            Event::Market(_) => Topic::Market,
            Event::Settlement(_) => Topic::Settlement,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .iter()
            .map(|&topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // Events are best-effort: skip rather than block an arena worker.
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("No subscribers for topic {}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("Failed to acquire event bus lock for topic {}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub async fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic)
            .or_insert_with(|| broadcast::channel(256).0)
            .subscribe()
    }

    /// Subscribe to multiple topics
    pub async fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        let mut receivers = HashMap::with_capacity(topics.len());
        for &topic in topics {
            receivers.insert(topic, self.subscribe(topic).await);
        }
        receivers
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{ArenaId, GameKind};

    #[tokio::test]
    async fn delivers_only_to_matching_topic() {
        let bus = EventBus::with_capacity(8);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle).await;
        let mut market = bus.subscribe(Topic::Market).await;

        bus.publish(Event::Lifecycle(LifecycleEvent::Created {
            arena_id: ArenaId(1),
            kind: GameKind::Trivia,
            title: "Blockchain Trivia".into(),
        }));

        assert!(matches!(
            lifecycle.recv().await.unwrap(),
            Event::Lifecycle(LifecycleEvent::Created { .. })
        ));
        assert!(market.try_recv().is_err());
    }
}
