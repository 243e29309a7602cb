//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{ChallengeEvent, ProgressEvent, ResourceEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Applied and rejected run events, run end
    Progress,
    /// Challenge activation and outcomes
    Challenge,
    /// Lives, insight and research point changes
    Resources,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Progress, Topic::Challenge, Topic::Resources];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Progress(ProgressEvent),
    Challenge(ChallengeEvent),
    Resources(ResourceEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Progress(_) => Topic::Progress,
            Event::Challenge(_) => Topic::Challenge,
            Event::Resources(_) => Topic::Resources,
        }
    }
}

/// Topic-based event bus
///
/// Channels are created once per topic, so publishing never contends on a
/// lock. Delivery is best-effort: lagging receivers lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels: HashMap<Topic, broadcast::Sender<Event>> = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic is registered in `with_capacity`; a detached
            // receiver simply never yields.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
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

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut progress = bus.subscribe(Topic::Progress);
        let mut resources = bus.subscribe(Topic::Resources);

        bus.publish(Event::Progress(ProgressEvent::RunCleared { nonce: 4 }));

        let received = progress.recv().await.unwrap();
        assert!(matches!(
            received,
            Event::Progress(ProgressEvent::RunCleared { nonce: 4 })
        ));
        assert!(resources.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(Event::Progress(ProgressEvent::GameOver { nonce: 1 }));
        assert_eq!(bus.subscribe_multiple(&Topic::ALL).len(), 3);
    }
}
