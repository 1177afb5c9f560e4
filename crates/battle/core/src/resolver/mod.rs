//! Turn resolution state machine.
//!
//! A turn moves through
//! `Idle → SelectingAction → SelectingTarget → Resolving → ApplyingEffects →
//! Cooldown → Idle`. Only one turn is in flight at a time; every transition
//! checks the current phase so out-of-order calls are rejected instead of
//! corrupting state. Cancelling target selection returns to
//! `SelectingAction` without consuming anything.
mod economy;
mod error;
mod outcome;
mod placement;
mod selection;

use std::collections::HashMap;

use tracing::{debug, warn};

pub use error::{Resource, TurnError};
pub use outcome::{DamageRecord, TargetClass, TargetRequest, TurnOutcome, TurnPlan};
pub use placement::{primary_effect_position, secondary_effect_position};
pub use selection::{check_affordable, enemy_policy};

use crate::combat::{
    AttackerProfile, BattleHistory, ComboTable, DefenderProfile, ElementalAdvantage, HistoryEntry,
    HitContext, calculate_damage, round_damage, targeting,
};
use crate::config::BattleConfig;
use crate::env::{RngOracle, compute_seed};
use crate::events::BattleEvent;
use crate::pool::EffectObjectPool;
use crate::registry::CombatantRegistry;
use crate::scheduler::ScheduledTurn;
use crate::state::{
    AttackType, CombatantId, CombatantRecord, EffectType, Position, Rotation, SkillDefinition,
    SkillSlot, StatusEffectKind,
};
use crate::status::StatusEffectEngine;

/// Phase of the turn currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    #[default]
    Idle,
    SelectingAction,
    SelectingTarget,
    Resolving,
    ApplyingEffects,
    Cooldown,
}

// Roll contexts for compute_seed; crit rolls use CRIT_ROLL + hit index.
const POLICY_ROLL: u32 = 0;
const CRIT_ROLL: u32 = 1;

/// Mutable battle state a turn needs while applying its effects.
pub(crate) struct TurnContext<'a> {
    pub registry: &'a mut CombatantRegistry,
    pub pool: &'a mut EffectObjectPool,
    pub history: &'a mut BattleHistory,
    pub rng: &'a dyn RngOracle,
    pub seed: u64,
    pub events: &'a mut Vec<BattleEvent>,
}

#[derive(Clone, Debug)]
struct ActiveTurn {
    scheduled: ScheduledTurn,
    nonce: u64,
    slot: Option<SkillSlot>,
    plan: Option<TurnPlan>,
}

/// Drives one turn at a time from action selection to cooldown.
#[derive(Clone, Debug)]
pub struct CombatResolver {
    config: BattleConfig,
    combos: ComboTable,
    status: StatusEffectEngine,
    phase: TurnPhase,
    turn: Option<ActiveTurn>,
    /// Last opponent each player-controlled caster picked explicitly.
    remembered_targets: HashMap<CombatantId, CombatantId>,
}

impl CombatResolver {
    pub fn new(config: BattleConfig, combos: ComboTable) -> Self {
        Self {
            status: StatusEffectEngine::new(&config),
            config,
            combos,
            phase: TurnPhase::Idle,
            turn: None,
            remembered_targets: HashMap::new(),
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_turn(&self) -> Option<ScheduledTurn> {
        self.turn.as_ref().map(|t| t.scheduled)
    }

    pub fn pending_slot(&self) -> Option<SkillSlot> {
        self.turn.as_ref().and_then(|t| t.slot)
    }

    pub fn plan(&self) -> Option<&TurnPlan> {
        self.turn.as_ref().and_then(|t| t.plan.as_ref())
    }

    pub fn combos(&self) -> &ComboTable {
        &self.combos
    }

    pub fn status_engine(&self) -> &StatusEffectEngine {
        &self.status
    }

    pub fn remembered_target(&self, actor: CombatantId) -> Option<CombatantId> {
        self.remembered_targets.get(&actor).copied()
    }

    fn expect_phase(&self, expected: TurnPhase) -> Result<(), TurnError> {
        if self.phase == expected {
            Ok(())
        } else if self.phase == TurnPhase::Idle {
            Err(TurnError::NoTurnInFlight)
        } else {
            Err(TurnError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn active(&self) -> Result<&ActiveTurn, TurnError> {
        self.turn.as_ref().ok_or(TurnError::NoTurnInFlight)
    }

    fn active_mut(&mut self) -> Result<&mut ActiveTurn, TurnError> {
        self.turn.as_mut().ok_or(TurnError::NoTurnInFlight)
    }

    // ===== phase transitions =====

    pub(crate) fn begin_turn(&mut self, scheduled: ScheduledTurn, nonce: u64) -> Result<(), TurnError> {
        if let Some(turn) = &self.turn {
            return Err(TurnError::TurnInFlight {
                actor: turn.scheduled.actor,
            });
        }
        self.turn = Some(ActiveTurn {
            scheduled,
            nonce,
            slot: None,
            plan: None,
        });
        self.phase = TurnPhase::SelectingAction;
        Ok(())
    }

    /// Locks in the skill slot and returns the targets it may be aimed at.
    ///
    /// Player-controlled casters must be able to pay for the slot; a rejected
    /// selection leaves the turn in `SelectingAction`.
    pub(crate) fn select_action(
        &mut self,
        registry: &CombatantRegistry,
        slot: SkillSlot,
    ) -> Result<TargetRequest, TurnError> {
        self.expect_phase(TurnPhase::SelectingAction)?;
        let actor_id = self.active()?.scheduled.actor;
        let actor = registry
            .get(actor_id)
            .ok_or(TurnError::UnknownCombatant(actor_id))?;

        if actor.side().is_ally() {
            if let Err(err) = check_affordable(actor, slot) {
                debug!(target: "battle::resolver", actor = %actor_id, %slot, %err, "selection rejected");
                return Err(err);
            }
        }

        let class = target_class(actor.skill(slot));
        let side = class.side_for(actor.side());
        let request = TargetRequest {
            actor: actor_id,
            slot,
            class,
            candidates: registry.living(side).map(CombatantRecord::id).collect(),
            default_target: self.default_target(registry, actor, class),
        };

        self.active_mut()?.slot = Some(slot);
        self.phase = TurnPhase::SelectingTarget;
        Ok(request)
    }

    /// Abandons target selection and reopens action selection.
    pub(crate) fn cancel_target_selection(&mut self) -> Result<(), TurnError> {
        self.expect_phase(TurnPhase::SelectingTarget)?;
        self.active_mut()?.slot = None;
        self.phase = TurnPhase::SelectingAction;
        Ok(())
    }

    /// Fixes the primary target and moves the turn to `Resolving`.
    ///
    /// An explicit target that is dead or on the wrong side is rejected and
    /// the turn stays in `SelectingTarget`. With no explicit target the
    /// default applies; if there is none the turn returns to
    /// `SelectingAction` with nothing consumed.
    pub(crate) fn select_target(
        &mut self,
        registry: &CombatantRegistry,
        explicit: Option<CombatantId>,
    ) -> Result<TurnPlan, TurnError> {
        self.expect_phase(TurnPhase::SelectingTarget)?;
        let turn = self.active()?;
        let actor_id = turn.scheduled.actor;
        let slot = turn.slot.ok_or(TurnError::InvalidPhase {
            expected: TurnPhase::SelectingAction,
            actual: self.phase,
        })?;
        let actor = registry
            .get(actor_id)
            .ok_or(TurnError::UnknownCombatant(actor_id))?;
        let skill = actor.skill(slot);
        let class = target_class(skill);
        let side = class.side_for(actor.side());

        let primary = match explicit {
            Some(target) => {
                let valid = registry
                    .get(target)
                    .is_some_and(|r| r.is_alive() && r.side() == side);
                if !valid {
                    return Err(TurnError::InvalidTarget { target });
                }
                if class == TargetClass::Opponents && actor.side().is_ally() {
                    self.remembered_targets.insert(actor_id, target);
                }
                target
            }
            None => match self.default_target(registry, actor, class) {
                Some(target) => target,
                None => {
                    self.active_mut()?.slot = None;
                    self.phase = TurnPhase::SelectingAction;
                    return Err(TurnError::NoValidTarget { actor: actor_id });
                }
            },
        };

        let plan = TurnPlan {
            actor: actor_id,
            slot,
            skill: skill.name.clone(),
            is_buff: skill.is_buff,
            primary,
            requires_movement: skill.has_movement
                || (!skill.is_buff && actor.attack_type() == AttackType::Melee),
            animation_secs: skill.animation_secs,
        };
        debug!(
            target: "battle::resolver",
            actor = %actor_id,
            %slot,
            skill = %plan.skill,
            target = %primary,
            "turn planned"
        );
        self.active_mut()?.plan = Some(plan.clone());
        self.phase = TurnPhase::Resolving;
        Ok(plan)
    }

    /// Ends the turn in flight without applying anything.
    pub(crate) fn abort_turn(&mut self) {
        self.turn = None;
        self.phase = TurnPhase::Idle;
    }

    /// Picks the slot for an engine-controlled actor.
    pub(crate) fn enemy_slot(
        &self,
        registry: &CombatantRegistry,
        rng: &dyn RngOracle,
        seed: u64,
    ) -> Result<SkillSlot, TurnError> {
        self.expect_phase(TurnPhase::SelectingAction)?;
        let turn = self.active()?;
        let actor = registry
            .get(turn.scheduled.actor)
            .ok_or(TurnError::UnknownCombatant(turn.scheduled.actor))?;
        let roll = rng.roll_unit(compute_seed(seed, turn.nonce, actor.id().0, POLICY_ROLL));
        Ok(enemy_policy(actor, roll))
    }

    /// Applies the planned skill: damage, statuses, effects and the
    /// attacker's resource economy. Leaves the turn in `Cooldown`.
    pub(crate) fn apply_effects(&mut self, ctx: &mut TurnContext<'_>) -> Result<TurnOutcome, TurnError> {
        self.expect_phase(TurnPhase::Resolving)?;
        let turn = self.active()?;
        let nonce = turn.nonce;
        let plan = turn.plan.clone().ok_or(TurnError::NoTurnInFlight)?;
        self.phase = TurnPhase::ApplyingEffects;

        let actor = ctx
            .registry
            .get(plan.actor)
            .ok_or(TurnError::UnknownCombatant(plan.actor))?
            .clone();
        let skill = actor.skill(plan.slot).clone();
        ctx.events.push(BattleEvent::ActionSelected {
            actor: plan.actor,
            slot: plan.slot,
            skill: skill.name.clone(),
            target: plan.primary,
        });

        let mut outcome = TurnOutcome {
            actor: plan.actor,
            slot: plan.slot,
            skill: skill.name.clone(),
            primary: plan.primary,
            secondaries: Vec::new(),
            damage: Vec::new(),
            statuses: Vec::new(),
            effects: Vec::new(),
            combo_multiplier: 1.0,
            defeated: Vec::new(),
        };

        if skill.is_buff {
            self.resolve_support(ctx, &actor, &skill, plan.primary, &mut outcome)?;
        } else {
            self.resolve_offense(ctx, &actor, &skill, plan.primary, nonce, &mut outcome)?;
        }

        if let Some(record) = ctx.registry.get_mut(plan.actor) {
            economy::settle_attacker(record, plan.slot, &self.config);
        }

        self.phase = TurnPhase::Cooldown;
        Ok(outcome)
    }

    /// Closes the turn after its cooldown and returns the actor.
    pub(crate) fn finish_turn(&mut self) -> Result<CombatantId, TurnError> {
        self.expect_phase(TurnPhase::Cooldown)?;
        let actor = self.active()?.scheduled.actor;
        self.turn = None;
        self.phase = TurnPhase::Idle;
        Ok(actor)
    }

    // ===== resolution =====

    fn default_target(
        &self,
        registry: &CombatantRegistry,
        actor: &CombatantRecord,
        class: TargetClass,
    ) -> Option<CombatantId> {
        let side = class.side_for(actor.side());
        if class == TargetClass::Opponents && actor.side().is_ally() {
            let remembered = self
                .remembered_target(actor.id())
                .filter(|id| registry.get(*id).is_some_and(|r| r.is_alive() && r.side() == side));
            if remembered.is_some() {
                return remembered;
            }
        }
        targeting::lowest_hp(registry, side)
    }

    fn resolve_offense(
        &self,
        ctx: &mut TurnContext<'_>,
        actor: &CombatantRecord,
        skill: &SkillDefinition,
        primary: CombatantId,
        nonce: u64,
        outcome: &mut TurnOutcome,
    ) -> Result<(), TurnError> {
        let combo = self
            .combos
            .multiplier(ctx.history.last(), actor.name(), &skill.name);
        outcome.combo_multiplier = combo;

        self.strike(ctx, actor, skill, primary, 0, combo, nonce, outcome)?;
        let position = {
            let target = ctx
                .registry
                .get(primary)
                .ok_or(TurnError::UnknownCombatant(primary))?;
            primary_effect_position(actor, target, skill)
        };
        Self::spawn_effect(ctx, skill, position, primary, outcome);

        let secondaries = targeting::nearest_to(ctx.registry, primary, skill.secondary_target_count());
        for (index, &target) in secondaries.iter().enumerate() {
            self.strike(ctx, actor, skill, target, index + 1, 1.0, nonce, outcome)?;
            if let Some(record) = ctx.registry.get(target) {
                let position = secondary_effect_position(record, skill);
                Self::spawn_effect(ctx, skill, position, target, outcome);
            }
        }
        outcome.secondaries = secondaries;
        Ok(())
    }

    fn resolve_support(
        &self,
        ctx: &mut TurnContext<'_>,
        actor: &CombatantRecord,
        skill: &SkillDefinition,
        primary: CombatantId,
        outcome: &mut TurnOutcome,
    ) -> Result<(), TurnError> {
        self.apply_status(ctx, skill, primary, outcome);
        let position = {
            let target = ctx
                .registry
                .get(primary)
                .ok_or(TurnError::UnknownCombatant(primary))?;
            primary_effect_position(actor, target, skill)
        };
        Self::spawn_effect(ctx, skill, position, primary, outcome);

        let secondaries = targeting::nearest_to(ctx.registry, primary, skill.secondary_target_count());
        for &target in &secondaries {
            self.apply_status(ctx, skill, target, outcome);
            if let Some(record) = ctx.registry.get(target) {
                let position = secondary_effect_position(record, skill);
                Self::spawn_effect(ctx, skill, position, target, outcome);
            }
        }
        outcome.secondaries = secondaries;
        Ok(())
    }

    /// Computes and applies one hit. `index` 0 is the primary target.
    #[allow(clippy::too_many_arguments)]
    fn strike(
        &self,
        ctx: &mut TurnContext<'_>,
        actor: &CombatantRecord,
        skill: &SkillDefinition,
        target_id: CombatantId,
        index: usize,
        combo: f64,
        nonce: u64,
        outcome: &mut TurnOutcome,
    ) -> Result<(), TurnError> {
        let target = ctx
            .registry
            .get(target_id)
            .ok_or(TurnError::UnknownCombatant(target_id))?;
        let hit = HitContext {
            advantage: ElementalAdvantage::of(skill.element, target.element(), &self.config),
            is_primary: index == 0,
            crit_roll: ctx.rng.roll_unit(compute_seed(
                ctx.seed,
                nonce,
                actor.id().0,
                CRIT_ROLL + index as u32,
            )),
        };
        let roll = calculate_damage(
            &AttackerProfile::of(actor, &self.config),
            &DefenderProfile::of(target),
            skill,
            &hit,
            &self.config,
        );
        let amount = if combo == 1.0 {
            roll.amount
        } else {
            round_damage(f64::from(roll.amount) * combo)
        };

        let target = ctx
            .registry
            .get_mut(target_id)
            .ok_or(TurnError::UnknownCombatant(target_id))?;
        let was_alive = target.is_alive();
        target.take_damage(amount);
        economy::settle_target(target, &self.config);
        let hp_after = target.current_hp();
        let side = target.side();
        let defeated = was_alive && !target.is_alive();

        debug!(
            target: "battle::resolver",
            attacker = %actor.id(),
            target = %target_id,
            skill = %skill.name,
            amount,
            is_crit = roll.is_crit,
            hp_after,
            "damage applied"
        );
        ctx.history.record(HistoryEntry {
            attacker: actor.id(),
            attacker_name: actor.name().to_string(),
            side: actor.side(),
            skill: skill.name.clone(),
            target: target_id,
            damage: amount,
        });
        ctx.events.push(BattleEvent::DamageApplied {
            attacker: actor.id(),
            target: target_id,
            skill: skill.name.clone(),
            amount,
            is_crit: roll.is_crit,
            hp_after,
        });
        outcome.damage.push(DamageRecord {
            target: target_id,
            amount,
            is_crit: roll.is_crit,
            branch: roll.branch,
            hp_after,
        });

        if defeated {
            ctx.events.push(BattleEvent::CombatantDefeated {
                combatant: target_id,
                side,
            });
            outcome.defeated.push(target_id);
        } else if skill.status_effect != StatusEffectKind::None {
            self.apply_status(ctx, skill, target_id, outcome);
        }
        Ok(())
    }

    fn apply_status(
        &self,
        ctx: &mut TurnContext<'_>,
        skill: &SkillDefinition,
        target: CombatantId,
        outcome: &mut TurnOutcome,
    ) {
        let Some(record) = ctx.registry.get_mut(target) else {
            return;
        };
        let applied = self.status.apply(
            record,
            skill.status_effect,
            skill.status_duration,
            StatusEffectEngine::amount_for(skill),
        );
        ctx.events.push(BattleEvent::StatusApplied {
            target,
            effect: applied.effect,
            duration: applied.duration,
            hp_restored: applied.hp_restored,
        });
        outcome.statuses.push(applied);
    }

    fn spawn_effect(
        ctx: &mut TurnContext<'_>,
        skill: &SkillDefinition,
        position: Position,
        target: CombatantId,
        outcome: &mut TurnOutcome,
    ) {
        let Some(key) = skill.effect_key.as_deref() else {
            return;
        };
        let parent = (skill.effect_type == EffectType::Static).then_some(target);
        match ctx.pool.get_object(key, position, Rotation::IDENTITY, parent) {
            Ok(instance) => {
                ctx.events.push(BattleEvent::EffectSpawned {
                    instance,
                    key: key.to_string(),
                    position,
                });
                outcome.effects.push(instance);
            }
            Err(err) => {
                warn!(target: "battle::resolver", %err, skill = %skill.name, "effect not spawned");
            }
        }
    }
}

fn target_class(skill: &SkillDefinition) -> TargetClass {
    if skill.is_buff {
        TargetClass::Allies
    } else {
        TargetClass::Opponents
    }
}
