//! Asynchronous abstraction for sourcing ally decisions.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or an autopilot. Enemy turns never
//! reach a provider; the engine's enemy policy decides them.
use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use battle_core::{
    BattleSnapshot, CombatantId, CombatantRecord, ScheduledTurn, SkillSlot, TargetClass,
    TargetRequest, check_affordable,
};

use super::errors::{Result, RuntimeError};

/// Decision for the action-selection stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillChoice {
    Use(SkillSlot),
    Abandon,
}

/// Decision for the target-selection stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetChoice {
    /// `None` accepts the default target.
    Target(Option<CombatantId>),
    /// Back to action selection.
    Cancel,
    Abandon,
}

/// Stage a player-controlled turn is waiting in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InputStage {
    Skill,
    Target,
}

/// Raw input pushed through [`crate::RuntimeHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    Skill(SkillSlot),
    Target(Option<CombatantId>),
    Cancel,
    Abandon,
}

/// Supplies decisions for player-controlled turns.
///
/// Implementations may take as long as they like; the battle worker keeps
/// the turn in flight until a decision arrives.
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Choose the skill slot for `turn`.
    ///
    /// A rejected choice (for example an unaffordable slot) is asked again.
    async fn choose_skill(
        &self,
        turn: ScheduledTurn,
        snapshot: &BattleSnapshot,
    ) -> Result<SkillChoice>;

    /// Choose the primary target for the slot picked in `request`.
    async fn choose_target(
        &self,
        request: &TargetRequest,
        snapshot: &BattleSnapshot,
    ) -> Result<TargetChoice>;
}

/// Plays ally turns without input: the strongest affordable skill on the
/// lowest-HP candidate. Falls back to the default target when the snapshot
/// has no candidate records.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoPilotProvider;

#[async_trait]
impl ActionProvider for AutoPilotProvider {
    async fn choose_skill(
        &self,
        turn: ScheduledTurn,
        snapshot: &BattleSnapshot,
    ) -> Result<SkillChoice> {
        let record = snapshot
            .combatants
            .iter()
            .find(|r| r.id() == turn.actor);
        let slot = [SkillSlot::Ultimate, SkillSlot::Skill]
            .into_iter()
            .find(|slot| record.is_some_and(|r| check_affordable(r, *slot).is_ok()))
            .unwrap_or(SkillSlot::Basic);
        Ok(SkillChoice::Use(slot))
    }

    async fn choose_target(
        &self,
        request: &TargetRequest,
        snapshot: &BattleSnapshot,
    ) -> Result<TargetChoice> {
        let candidates = snapshot
            .combatants
            .iter()
            .filter(|r| request.candidates.contains(&r.id()));
        // Opponents: finish off the weakest. Allies: patch up the most hurt.
        let target = match request.class {
            TargetClass::Opponents => candidates.min_by_key(|r| r.current_hp()),
            TargetClass::Allies => {
                candidates.min_by(|a, b| hp_fraction(a).total_cmp(&hp_fraction(b)))
            }
        };
        Ok(TargetChoice::Target(target.map(CombatantRecord::id)))
    }
}

fn hp_fraction(record: &CombatantRecord) -> f64 {
    f64::from(record.current_hp()) / f64::from(record.max_hp().max(1))
}

/// Provider fed by [`PlayerInput`]s sent through the runtime handle.
///
/// Inputs that do not fit the current stage are dropped.
pub struct ChannelActionProvider {
    input_rx: Mutex<mpsc::Receiver<PlayerInput>>,
}

impl ChannelActionProvider {
    pub fn new(input_rx: mpsc::Receiver<PlayerInput>) -> Self {
        Self {
            input_rx: Mutex::new(input_rx),
        }
    }

    async fn next_input(&self) -> Result<PlayerInput> {
        self.input_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::ActionProviderChannelClosed)
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    async fn choose_skill(
        &self,
        turn: ScheduledTurn,
        _snapshot: &BattleSnapshot,
    ) -> Result<SkillChoice> {
        loop {
            match self.next_input().await? {
                PlayerInput::Skill(slot) => return Ok(SkillChoice::Use(slot)),
                PlayerInput::Abandon => return Ok(SkillChoice::Abandon),
                input => {
                    debug!(target: "runtime::input", actor = %turn.actor, ?input, "ignored while choosing a skill");
                }
            }
        }
    }

    async fn choose_target(
        &self,
        request: &TargetRequest,
        _snapshot: &BattleSnapshot,
    ) -> Result<TargetChoice> {
        loop {
            match self.next_input().await? {
                PlayerInput::Target(target) => return Ok(TargetChoice::Target(target)),
                PlayerInput::Cancel => return Ok(TargetChoice::Cancel),
                PlayerInput::Abandon => return Ok(TargetChoice::Abandon),
                input => {
                    debug!(target: "runtime::input", actor = %request.actor, ?input, "ignored while choosing a target");
                }
            }
        }
    }
}
