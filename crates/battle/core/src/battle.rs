//! Battle session: the single owner of all per-battle state.
//!
//! [`Battle`] wires the registry, scheduler, resolver, status engine and
//! effect pool together and enforces the turn-in-flight guard: the scheduler
//! is not ticked until the current turn has reached `Idle` again. A typical
//! driver loop looks like:
//!
//! ```text
//! tick() -> Some(turn)
//!   ally:  select_action(slot) -> select_target(target?) (cancel_target_selection to go back)
//!   enemy: auto_select()
//! apply_effects() -> end_turn()
//! ```

use tracing::{debug, info};

use crate::combat::{BattleHistory, ComboTable};
use crate::config::BattleConfig;
use crate::env::{BattleEnv, RngOracle};
use crate::events::{BattleEvent, DamageTotals};
use crate::pool::{EffectInstanceId, EffectObjectPool};
use crate::registry::{CombatantRegistry, ConfigurationError};
use crate::resolver::{
    CombatResolver, TargetRequest, TurnContext, TurnError, TurnOutcome, TurnPhase, TurnPlan,
};
use crate::scheduler::{ActionValueScheduler, ScheduledTurn};
use crate::state::{CombatantId, CombatantRecord, Side, SkillSlot};

/// Final report of a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    /// True when the allies won.
    pub victory: bool,
    /// True when the battle was abandoned rather than fought out.
    pub abandoned: bool,
    pub turn_count: u32,
    pub damage: DamageTotals,
    pub survivors: Vec<CombatantId>,
}

/// Read-only copy of the battle for observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub phase: TurnPhase,
    pub tick: u64,
    pub turn_count: u32,
    pub current_turn: Option<ScheduledTurn>,
    pub combatants: Vec<CombatantRecord>,
    pub outcome: Option<BattleOutcome>,
}

pub struct Battle {
    config: BattleConfig,
    registry: CombatantRegistry,
    scheduler: ActionValueScheduler,
    resolver: CombatResolver,
    pool: EffectObjectPool,
    history: BattleHistory,
    rng: Box<dyn RngOracle>,
    seed: u64,
    turn_count: u32,
    events: Vec<BattleEvent>,
    outcome: Option<BattleOutcome>,
}

impl Battle {
    /// Builds the combatants, seeds initiative and preallocates the effect
    /// pools for every skill effect in play.
    pub fn setup(
        env: &BattleEnv<'_>,
        config: BattleConfig,
        combos: ComboTable,
        rng: Box<dyn RngOracle>,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        let mut registry = CombatantRegistry::setup_combatants(env)?;
        let mut scheduler = ActionValueScheduler::new(config.turn_threshold);
        scheduler.initialize(&mut registry);

        let mut pool = EffectObjectPool::new();
        for record in registry.iter() {
            for skill in record.skills() {
                if let Some(key) = &skill.effect_key {
                    pool.initialize_pool(key, config.effect_pool_size);
                }
            }
        }

        info!(
            target: "battle::session",
            allies = registry.living_count(Side::Ally),
            enemies = registry.living_count(Side::Enemy),
            seed,
            "battle set up"
        );
        Ok(Self {
            resolver: CombatResolver::new(config.clone(), combos),
            config,
            registry,
            scheduler,
            pool,
            history: BattleHistory::default(),
            rng,
            seed,
            turn_count: 0,
            events: Vec::new(),
            outcome: None,
        })
    }

    // ===== read access =====

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn registry(&self) -> &CombatantRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &CombatResolver {
        &self.resolver
    }

    pub fn pool(&self) -> &EffectObjectPool {
        &self.pool
    }

    pub fn history(&self) -> &BattleHistory {
        &self.history
    }

    pub fn phase(&self) -> TurnPhase {
        self.resolver.phase()
    }

    pub fn current_turn(&self) -> Option<ScheduledTurn> {
        self.resolver.current_turn()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn tick_count(&self) -> u64 {
        self.scheduler.clock()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some() || self.registry.is_battle_over()
    }

    pub fn outcome(&self) -> Option<&BattleOutcome> {
        self.outcome.as_ref()
    }

    pub fn damage_totals(&self) -> DamageTotals {
        DamageTotals {
            allies: self.history.damage_dealt_by(Side::Ally),
            enemies: self.history.damage_dealt_by(Side::Enemy),
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase(),
            tick: self.tick_count(),
            turn_count: self.turn_count,
            current_turn: self.current_turn(),
            combatants: self
                .registry
                .iter()
                .map(|record| {
                    // A None-status shift can dip below zero until the next selection.
                    let mut record = record.clone();
                    if record.action_value() < 0.0 {
                        record.set_action_value(0.0);
                    }
                    record
                })
                .collect(),
            outcome: self.outcome.clone(),
        }
    }

    /// Takes every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== tick loop =====

    /// Advances initiative by one tick.
    ///
    /// Statuses count down after every tick. When a combatant crosses the
    /// threshold its turn starts in `SelectingAction`.
    pub fn tick(&mut self) -> Result<Option<ScheduledTurn>, TurnError> {
        if self.is_over() {
            return Err(TurnError::BattleOver);
        }
        if let Some(turn) = self.resolver.current_turn() {
            return Err(TurnError::TurnInFlight { actor: turn.actor });
        }

        let selected = self.scheduler.process_next_tick(&mut self.registry);
        let engine = *self.resolver.status_engine();
        for record in self.registry.iter_mut().filter(|r| r.is_alive()) {
            engine.update_status(record);
        }

        let Some(turn) = selected else {
            return Ok(None);
        };
        self.turn_count += 1;
        self.resolver.begin_turn(turn, u64::from(self.turn_count))?;
        self.events.push(BattleEvent::TurnStarted {
            actor: turn.actor,
            side: turn.side,
            turn: self.turn_count,
            tick: turn.tick,
        });
        Ok(Some(turn))
    }

    /// Ticks until a combatant is ready to act.
    pub fn next_turn(&mut self) -> Result<ScheduledTurn, TurnError> {
        loop {
            if let Some(turn) = self.tick()? {
                return Ok(turn);
            }
        }
    }

    // ===== turn pipeline =====

    /// Chooses the skill for a player-controlled turn.
    pub fn select_action(&mut self, slot: SkillSlot) -> Result<TargetRequest, TurnError> {
        self.ensure_player_turn()?;
        self.resolver.select_action(&self.registry, slot)
    }

    /// Chooses the skill by raw index as supplied by an input device.
    pub fn select_action_index(&mut self, index: usize) -> Result<TargetRequest, TurnError> {
        let slot = SkillSlot::from_index(index).ok_or(TurnError::UnknownSkill { index })?;
        self.select_action(slot)
    }

    pub fn cancel_target_selection(&mut self) -> Result<(), TurnError> {
        self.resolver.cancel_target_selection()
    }

    /// Chooses the primary target; `None` takes the default target.
    pub fn select_target(&mut self, target: Option<CombatantId>) -> Result<TurnPlan, TurnError> {
        self.resolver.select_target(&self.registry, target)
    }

    /// Runs the enemy policy for an engine-controlled turn.
    ///
    /// Returns `None` when no valid target exists; the turn then ends
    /// silently without consuming anything.
    pub fn auto_select(&mut self) -> Result<Option<TurnPlan>, TurnError> {
        let slot = self
            .resolver
            .enemy_slot(&self.registry, self.rng.as_ref(), self.seed)?;
        self.resolver.select_action(&self.registry, slot)?;
        match self.resolver.select_target(&self.registry, None) {
            Ok(plan) => Ok(Some(plan)),
            Err(TurnError::NoValidTarget { actor }) => {
                debug!(target: "battle::session", %actor, "no valid target, turn skipped");
                self.resolver.abort_turn();
                self.events.push(BattleEvent::TurnEnded { actor });
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Applies the planned action.
    pub fn apply_effects(&mut self) -> Result<TurnOutcome, TurnError> {
        let mut ctx = TurnContext {
            registry: &mut self.registry,
            pool: &mut self.pool,
            history: &mut self.history,
            rng: self.rng.as_ref(),
            seed: self.seed,
            events: &mut self.events,
        };
        self.resolver.apply_effects(&mut ctx)
    }

    /// Closes the turn. Returns the outcome when this turn ended the battle.
    pub fn end_turn(&mut self) -> Result<Option<BattleOutcome>, TurnError> {
        let actor = self.resolver.finish_turn()?;
        self.events.push(BattleEvent::TurnEnded { actor });

        if self.registry.is_battle_over() && self.outcome.is_none() {
            let victory = self.registry.winner() == Some(Side::Ally);
            return Ok(Some(self.finish(victory, false)));
        }
        Ok(None)
    }

    /// Resolves a whole turn for the current actor: explicit choices for
    /// player-controlled actors, the enemy policy otherwise.
    pub fn resolve_turn(
        &mut self,
        slot: SkillSlot,
        target: Option<CombatantId>,
    ) -> Result<Option<TurnOutcome>, TurnError> {
        let turn = self.current_turn().ok_or(TurnError::NoTurnInFlight)?;
        if turn.is_ally() {
            self.select_action(slot)?;
            self.select_target(target)?;
        } else if self.auto_select()?.is_none() {
            return Ok(None);
        }
        let outcome = self.apply_effects()?;
        self.end_turn()?;
        Ok(Some(outcome))
    }

    /// Force-ends the battle as an ally loss.
    ///
    /// A battle already decided by the last hit, whose turn has not been
    /// closed yet, ends with its real result instead.
    pub fn abandon(&mut self) -> BattleOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        self.resolver.abort_turn();
        if let Some(winner) = self.registry.winner() {
            return self.finish(winner == Side::Ally, false);
        }
        info!(target: "battle::session", turn_count = self.turn_count, "battle abandoned");
        self.finish(false, true)
    }

    /// Returns a spawned effect instance to its pool.
    pub fn release_effect(&mut self, instance: EffectInstanceId) {
        if self.pool.is_active(instance) {
            self.events.push(BattleEvent::EffectReleased { instance });
        }
        self.pool.return_object(instance);
    }

    fn finish(&mut self, victory: bool, abandoned: bool) -> BattleOutcome {
        let damage = self.damage_totals();
        let outcome = BattleOutcome {
            victory,
            abandoned,
            turn_count: self.turn_count,
            damage,
            survivors: self
                .registry
                .iter()
                .filter(|r| r.is_alive())
                .map(CombatantRecord::id)
                .collect(),
        };
        info!(
            target: "battle::session",
            victory,
            abandoned,
            turn_count = self.turn_count,
            ally_damage = damage.allies,
            enemy_damage = damage.enemies,
            "battle ended"
        );
        self.events.push(BattleEvent::BattleEnded {
            victory,
            abandoned,
            turn_count: self.turn_count,
            damage,
        });
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn ensure_player_turn(&self) -> Result<(), TurnError> {
        let turn = self.current_turn().ok_or(TurnError::NoTurnInFlight)?;
        if turn.is_ally() {
            Ok(())
        } else {
            Err(TurnError::NotPlayerControlled { actor: turn.actor })
        }
    }
}

impl core::fmt::Debug for Battle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Battle")
            .field("phase", &self.phase())
            .field("turn_count", &self.turn_count)
            .field("tick", &self.tick_count())
            .field("combatants", &self.registry.len())
            .field("outcome", &self.outcome)
            .finish()
    }
}
