//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! paces each turn: it waits for the mover to reach its target, for the hit
//! to land, and for the turn to settle before ticking initiative again.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use battle_core::{
    BattleOutcome, CombatantId, EffectInstanceId, ScheduledTurn, TurnError, TurnOutcome, TurnPlan,
};

use crate::api::{
    ActionProvider, ChannelActionProvider, InputStage, Result, RuntimeError, RuntimeHandle,
    SkillChoice, TargetChoice,
};
use crate::events::{Event, EventBus};
use crate::setup::BattleSetup;
use crate::workers::BattleWorker;

/// Delays inserted between turn phases, in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingConfig {
    /// Wait for a melee caster to reach its target.
    pub movement_ms: u64,
    /// Wind-up before the hit lands.
    pub pre_hit_ms: u64,
    /// Hold after the hit so its effects can play.
    pub post_hit_ms: u64,
    /// Gap before initiative ticks again.
    pub post_turn_ms: u64,
    /// Pause between idle ticks. Zero ticks straight to the next turn.
    pub idle_tick_ms: u64,
    /// Shortest time a spawned effect stays out. Zero releases immediately.
    pub min_effect_lifetime_ms: u64,
}

impl PacingConfig {
    pub const DEFAULT_MIN_EFFECT_LIFETIME_MS: u64 = 2_000;

    /// No waiting at all; effects are released as soon as the hit resolves.
    pub fn instant() -> Self {
        Self {
            movement_ms: 0,
            pre_hit_ms: 0,
            post_hit_ms: 0,
            post_turn_ms: 0,
            idle_tick_ms: 0,
            min_effect_lifetime_ms: 0,
        }
    }

    /// Scales every delay by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor.max(0.0)).round() as u64;
        Self {
            movement_ms: scale(self.movement_ms),
            pre_hit_ms: scale(self.pre_hit_ms),
            post_hit_ms: scale(self.post_hit_ms),
            post_turn_ms: scale(self.post_turn_ms),
            idle_tick_ms: scale(self.idle_tick_ms),
            min_effect_lifetime_ms: scale(self.min_effect_lifetime_ms),
        }
    }

    /// How long an effect spawned by a skill with `animation_secs` stays out.
    pub fn effect_lifetime(&self, animation_secs: f64) -> Duration {
        if self.min_effect_lifetime_ms == 0 {
            return Duration::ZERO;
        }
        let minimum = Duration::from_millis(self.min_effect_lifetime_ms);
        Duration::try_from_secs_f64(animation_secs)
            .map_or(minimum, |animation| animation.max(minimum))
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            movement_ms: 400,
            pre_hit_ms: 300,
            post_hit_ms: 500,
            post_turn_ms: 300,
            idle_tick_ms: 0,
            min_effect_lifetime_ms: Self::DEFAULT_MIN_EFFECT_LIFETIME_MS,
        }
    }
}

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub input_buffer_size: usize,
    pub pacing: PacingConfig,
    /// Abandon the battle once this many turns have been played.
    pub max_turns: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            input_buffer_size: 16,
            pacing: PacingConfig::default(),
            max_turns: None,
        }
    }
}

/// Result of one [`Runtime::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    TurnResolved(TurnOutcome),
    /// The actor had no valid target and lost the turn.
    TurnSkipped(CombatantId),
    BattleEnded(BattleOutcome),
}

/// Main runtime that orchestrates a battle
///
/// Design: Runtime owns the worker and the ally provider and paces turns.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    provider: Box<dyn ActionProvider>,
    config: RuntimeConfig,
    turns_played: u32,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Play one turn from initiative to cooldown.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        match self.play_turn().await {
            Ok(step) => Ok(step),
            // Another handle may have abandoned the battle mid-turn.
            Err(err) if err.turn_error().is_some() => {
                let snapshot = self.handle.query_snapshot().await?;
                match snapshot.outcome {
                    Some(outcome) => Ok(StepOutcome::BattleEnded(outcome)),
                    None => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Run the battle to its end.
    pub async fn run(&mut self) -> Result<BattleOutcome> {
        loop {
            if let Some(limit) = self.config.max_turns {
                if self.turns_played >= limit {
                    warn!(target: "runtime::battle", limit, "turn limit reached, abandoning battle");
                    return self.handle.abandon().await;
                }
            }
            match self.step().await? {
                StepOutcome::BattleEnded(outcome) => {
                    info!(
                        target: "runtime::battle",
                        victory = outcome.victory,
                        abandoned = outcome.abandoned,
                        turns = outcome.turn_count,
                        "battle finished"
                    );
                    return Ok(outcome);
                }
                StepOutcome::TurnResolved(_) | StepOutcome::TurnSkipped(_) => {}
            }
        }
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        drop(self.provider);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }

    async fn play_turn(&mut self) -> Result<StepOutcome> {
        let turn = self.wait_for_turn().await?;
        self.turns_played += 1;
        debug!(target: "runtime::battle", actor = %turn.actor, side = ?turn.side, "turn started");

        let plan = if turn.is_ally() {
            match self.choose_ally_plan(turn).await? {
                Some(plan) => plan,
                None => {
                    let outcome = self.handle.abandon().await?;
                    return Ok(StepOutcome::BattleEnded(outcome));
                }
            }
        } else {
            match self.handle.auto_select().await? {
                Some(plan) => plan,
                None => return Ok(StepOutcome::TurnSkipped(turn.actor)),
            }
        };

        let pacing = self.config.pacing.clone();
        if plan.requires_movement {
            pause(pacing.movement_ms).await;
        }
        pause(pacing.pre_hit_ms).await;

        let outcome = self.handle.apply_effects().await?;
        self.release_effects(&outcome.effects, plan.animation_secs)
            .await?;
        pause(pacing.post_hit_ms).await;

        let ended = self.handle.end_turn().await?;
        pause(pacing.post_turn_ms).await;

        Ok(match ended {
            Some(battle) => StepOutcome::BattleEnded(battle),
            None => StepOutcome::TurnResolved(outcome),
        })
    }

    async fn wait_for_turn(&self) -> Result<ScheduledTurn> {
        let idle = self.config.pacing.idle_tick_ms;
        if idle == 0 {
            return self.handle.next_turn().await;
        }
        loop {
            if let Some(turn) = self.handle.tick().await? {
                return Ok(turn);
            }
            pause(idle).await;
        }
    }

    /// Asks the provider until the turn has a plan. `None` means abandon.
    async fn choose_ally_plan(&self, turn: ScheduledTurn) -> Result<Option<TurnPlan>> {
        let bus = self.handle.event_bus();
        loop {
            let snapshot = self.handle.query_snapshot().await?;
            bus.publish(Event::AwaitingInput {
                actor: turn.actor,
                stage: InputStage::Skill,
            });
            let slot = match self.provider.choose_skill(turn, &snapshot).await? {
                SkillChoice::Use(slot) => slot,
                SkillChoice::Abandon => return Ok(None),
            };
            let request = match self.handle.select_action(slot).await {
                Ok(request) => request,
                Err(err) if err.is_recoverable() => {
                    debug!(target: "runtime::battle", actor = %turn.actor, %slot, %err, "skill rejected");
                    continue;
                }
                Err(err) => return Err(err),
            };

            loop {
                bus.publish(Event::AwaitingInput {
                    actor: turn.actor,
                    stage: InputStage::Target,
                });
                match self.provider.choose_target(&request, &snapshot).await? {
                    TargetChoice::Abandon => return Ok(None),
                    TargetChoice::Cancel => {
                        self.handle.cancel_target_selection().await?;
                        break;
                    }
                    TargetChoice::Target(target) => match self.handle.select_target(target).await {
                        Ok(plan) => return Ok(Some(plan)),
                        Err(RuntimeError::Turn(TurnError::InvalidTarget { target })) => {
                            debug!(target: "runtime::battle", actor = %turn.actor, %target, "target rejected");
                        }
                        // The resolver is back in action selection.
                        Err(RuntimeError::Turn(TurnError::NoValidTarget { .. })) => break,
                        Err(err) => return Err(err),
                    },
                }
            }
        }
    }

    async fn release_effects(&self, effects: &[EffectInstanceId], animation_secs: f64) -> Result<()> {
        let lifetime = self.config.pacing.effect_lifetime(animation_secs);
        if lifetime.is_zero() {
            for &instance in effects {
                self.handle.release_effect(instance).await?;
            }
            return Ok(());
        }
        for &instance in effects {
            let handle = self.handle.clone();
            tokio::spawn(async move {
                tokio::time::sleep(lifetime).await;
                if let Err(err) = handle.release_effect(instance).await {
                    debug!(target: "runtime::battle", ?instance, %err, "effect not released");
                }
            });
        }
        Ok(())
    }
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    setup: Option<BattleSetup>,
    provider: Option<Box<dyn ActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            setup: None,
            provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required battle setup
    pub fn setup(mut self, setup: BattleSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Set the ally action provider.
    ///
    /// Without one, allies are driven by input sent through
    /// [`RuntimeHandle::submit_input`].
    pub fn provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let setup = self.setup.ok_or(RuntimeError::MissingSetup)?;
        let battle = setup.build()?;

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (input_tx, input_rx) = mpsc::channel(self.config.input_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, input_tx, event_bus.clone());
        let provider = self
            .provider
            .unwrap_or_else(|| Box::new(ChannelActionProvider::new(input_rx)) as Box<dyn ActionProvider>);

        let worker = BattleWorker::new(battle, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            provider,
            config: self.config,
            turns_played: 0,
            worker_handle,
        })
    }
}
