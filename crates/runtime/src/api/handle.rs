//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping a turn, feeding player input, or streaming events from specific
//! topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{
    BattleOutcome, BattleSnapshot, CombatantId, EffectInstanceId, ScheduledTurn, SkillSlot,
    TargetRequest, TurnError, TurnOutcome, TurnPlan,
};

use super::errors::{Result, RuntimeError};
use super::providers::PlayerInput;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    input_tx: mpsc::Sender<PlayerInput>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        input_tx: mpsc::Sender<PlayerInput>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            command_tx,
            input_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn turn_request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<std::result::Result<T, TurnError>>) -> Command,
    ) -> Result<T> {
        Ok(self.request(build).await??)
    }

    // ===== engine commands =====

    /// Advance initiative by one tick.
    pub async fn tick(&self) -> Result<Option<ScheduledTurn>> {
        self.turn_request(|reply| Command::Tick { reply }).await
    }

    /// Tick until a combatant is ready to act.
    pub async fn next_turn(&self) -> Result<ScheduledTurn> {
        self.turn_request(|reply| Command::NextTurn { reply }).await
    }

    pub async fn select_action(&self, slot: SkillSlot) -> Result<TargetRequest> {
        self.turn_request(|reply| Command::SelectAction { slot, reply })
            .await
    }

    pub async fn cancel_target_selection(&self) -> Result<()> {
        self.turn_request(|reply| Command::CancelTargetSelection { reply })
            .await
    }

    pub async fn select_target(&self, target: Option<CombatantId>) -> Result<TurnPlan> {
        self.turn_request(|reply| Command::SelectTarget { target, reply })
            .await
    }

    /// Let the engine decide the current enemy turn. `None` means the turn
    /// ended without a target.
    pub async fn auto_select(&self) -> Result<Option<TurnPlan>> {
        self.turn_request(|reply| Command::AutoSelect { reply }).await
    }

    pub async fn apply_effects(&self) -> Result<TurnOutcome> {
        self.turn_request(|reply| Command::ApplyEffects { reply })
            .await
    }

    pub async fn end_turn(&self) -> Result<Option<BattleOutcome>> {
        self.turn_request(|reply| Command::EndTurn { reply }).await
    }

    /// Return a spawned effect instance to its pool.
    pub async fn release_effect(&self, instance: EffectInstanceId) -> Result<()> {
        self.command_tx
            .send(Command::ReleaseEffect { instance })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// End the battle as a loss. Also unblocks a provider waiting for input.
    pub async fn abandon(&self) -> Result<BattleOutcome> {
        let _ = self.input_tx.try_send(PlayerInput::Abandon);
        self.request(|reply| Command::Abandon { reply }).await
    }

    /// Query a read-only copy of the battle.
    pub async fn query_snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    // ===== player input =====

    /// Feed input to a [`super::ChannelActionProvider`].
    pub async fn submit_input(&self, input: PlayerInput) -> Result<()> {
        self.input_tx
            .send(input)
            .await
            .map_err(|_| RuntimeError::ActionProviderChannelClosed)
    }

    pub async fn submit_skill(&self, slot: SkillSlot) -> Result<()> {
        self.submit_input(PlayerInput::Skill(slot)).await
    }

    /// `None` accepts the default target.
    pub async fn submit_target(&self, target: Option<CombatantId>) -> Result<()> {
        self.submit_input(PlayerInput::Target(target)).await
    }

    pub async fn cancel_selection(&self) -> Result<()> {
        self.submit_input(PlayerInput::Cancel).await
    }

    // ===== events =====

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Turn` - Turn lifecycle and input prompts
    /// - `Topic::Combat` - Damage, statuses, defeats and effects
    /// - `Topic::Battle` - Battle end
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
