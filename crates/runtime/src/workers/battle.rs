//! Battle worker that owns the authoritative [`battle_core::Battle`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them against the
//! battle, and publishes every event the engine queued to the
//! [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use battle_core::{
    Battle, BattleError, BattleOutcome, BattleSnapshot, CombatantId, EffectInstanceId,
    ScheduledTurn, SkillSlot, TargetRequest, TurnError, TurnOutcome, TurnPlan,
};

use crate::events::EventBus;

type Reply<T> = oneshot::Sender<Result<T, TurnError>>;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Advance initiative by one tick.
    Tick { reply: Reply<Option<ScheduledTurn>> },
    /// Tick until a combatant is ready to act.
    NextTurn { reply: Reply<ScheduledTurn> },
    SelectAction {
        slot: SkillSlot,
        reply: Reply<TargetRequest>,
    },
    CancelTargetSelection { reply: Reply<()> },
    SelectTarget {
        target: Option<CombatantId>,
        reply: Reply<TurnPlan>,
    },
    /// Run the enemy policy for the current turn.
    AutoSelect { reply: Reply<Option<TurnPlan>> },
    ApplyEffects { reply: Reply<TurnOutcome> },
    EndTurn { reply: Reply<Option<BattleOutcome>> },
    ReleaseEffect { instance: EffectInstanceId },
    Abandon { reply: oneshot::Sender<BattleOutcome> },
    /// Query a read-only copy of the battle.
    QuerySnapshot { reply: oneshot::Sender<BattleSnapshot> },
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    battle: Battle,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl BattleWorker {
    pub fn new(battle: Battle, command_rx: mpsc::Receiver<Command>, event_bus: EventBus) -> Self {
        info!(
            target: "runtime::battle",
            combatants = battle.registry().len(),
            "BattleWorker initialized"
        );
        Self {
            battle,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends when every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::battle", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Tick { reply } => {
                let result = self.battle.tick();
                self.reply(reply, result, "Tick");
            }
            Command::NextTurn { reply } => {
                let result = self.battle.next_turn();
                self.reply(reply, result, "NextTurn");
            }
            Command::SelectAction { slot, reply } => {
                let result = self.battle.select_action(slot);
                self.reply(reply, result, "SelectAction");
            }
            Command::CancelTargetSelection { reply } => {
                let result = self.battle.cancel_target_selection();
                self.reply(reply, result, "CancelTargetSelection");
            }
            Command::SelectTarget { target, reply } => {
                let result = self.battle.select_target(target);
                self.reply(reply, result, "SelectTarget");
            }
            Command::AutoSelect { reply } => {
                let result = self.battle.auto_select();
                self.reply(reply, result, "AutoSelect");
            }
            Command::ApplyEffects { reply } => {
                let result = self.battle.apply_effects();
                self.reply(reply, result, "ApplyEffects");
            }
            Command::EndTurn { reply } => {
                let result = self.battle.end_turn();
                self.reply(reply, result, "EndTurn");
            }
            Command::ReleaseEffect { instance } => {
                self.battle.release_effect(instance);
                self.publish_events();
            }
            Command::Abandon { reply } => {
                let outcome = self.battle.abandon();
                self.publish_events();
                if reply.send(outcome).is_err() {
                    debug!(target: "runtime::battle", "Abandon reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.battle.snapshot()).is_err() {
                    debug!(target: "runtime::battle", "QuerySnapshot reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Publishes the events the command raised, then answers the caller.
    fn reply<T>(&mut self, reply: Reply<T>, result: Result<T, TurnError>, command: &'static str) {
        self.publish_events();
        if let Err(err) = &result {
            if err.severity().is_internal() {
                warn!(target: "runtime::battle", command, code = err.error_code(), %err, "command failed");
            } else {
                debug!(target: "runtime::battle", command, code = err.error_code(), %err, "command rejected");
            }
        }
        if reply.send(result).is_err() {
            debug!(target: "runtime::battle", command, "reply channel closed (caller dropped)");
        }
    }

    fn publish_events(&mut self) {
        for event in self.battle.drain_events() {
            self.event_bus.publish(event);
        }
    }
}
