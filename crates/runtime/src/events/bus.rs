//! Broadcast fan-out of battle events, one channel per topic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use battle_core::{BattleEvent, CombatantId};

use crate::api::InputStage;

/// Channel an [`Event`] is delivered on.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn lifecycle and input prompts
    Turn,
    /// Damage, statuses, defeats and effect instances
    Combat,
    /// Battle start/end
    Battle,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Turn, Topic::Combat, Topic::Battle];
}

/// Event wrapper routed by [`Event::topic`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Event raised by the battle engine.
    Battle(BattleEvent),
    /// A player-controlled turn is waiting for input.
    AwaitingInput {
        actor: CombatantId,
        stage: InputStage,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(event) => match event {
                BattleEvent::TurnStarted { .. }
                | BattleEvent::ActionSelected { .. }
                | BattleEvent::TurnEnded { .. } => Topic::Turn,
                BattleEvent::DamageApplied { .. }
                | BattleEvent::StatusApplied { .. }
                | BattleEvent::CombatantDefeated { .. }
                | BattleEvent::EffectSpawned { .. }
                | BattleEvent::EffectReleased { .. } => Topic::Combat,
                BattleEvent::BattleEnded { .. } => Topic::Battle,
            },
            Event::AwaitingInput { .. } => Topic::Turn,
        }
    }
}

impl From<BattleEvent> for Event {
    fn from(event: BattleEvent) -> Self {
        Event::Battle(event)
    }
}

/// Per-topic broadcast channels shared by every clone.
///
/// The channel map is fixed at construction, so publishing and subscribing
/// need no locking.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Bus with 256 buffered events per topic.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Bus buffering `capacity` events per topic; slow receivers lag past that.
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Sends `event` to the subscribers of its topic.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if let Some(tx) = self.channels.get(&topic) {
            if tx.send(event).is_err() {
                tracing::trace!(target: "runtime::battle", ?topic, "event dropped, no subscribers");
            }
        }
    }

    /// Receiver for events published on `topic` from now on.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[&topic].subscribe()
    }

    /// One receiver per requested topic.
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
    async fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut turn_rx = bus.subscribe(Topic::Turn);
        let mut battle_rx = bus.subscribe(Topic::Battle);

        bus.publish(BattleEvent::TurnEnded {
            actor: CombatantId(2),
        });

        assert_eq!(
            turn_rx.recv().await.unwrap(),
            Event::Battle(BattleEvent::TurnEnded {
                actor: CombatantId(2)
            })
        );
        assert!(battle_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(4);
        bus.publish(Event::AwaitingInput {
            actor: CombatantId(0),
            stage: InputStage::Skill,
        });
    }
}
