//! Speed-weighted initiative.
//!
//! Every living combatant accumulates action value each tick at a rate equal
//! to its speed (scaled while slowed). Whoever first crosses the turn
//! threshold acts, and the accumulator restarts at zero. Over many ticks each
//! combatant's share of turns converges to `speed / total speed`.

use tracing::{debug, warn};

use crate::registry::CombatantRegistry;
use crate::state::{CombatantId, Side};

/// The combatant selected to act on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledTurn {
    pub actor: CombatantId,
    pub side: Side,
    /// Tick on which the actor was selected.
    pub tick: u64,
}

impl ScheduledTurn {
    pub fn is_ally(&self) -> bool {
        self.side.is_ally()
    }
}

/// Advances action values and picks at most one actor per tick.
#[derive(Clone, Debug)]
pub struct ActionValueScheduler {
    threshold: f64,
    clock: u64,
}

impl ActionValueScheduler {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            clock: 0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Ticks processed so far.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Seeds every combatant at `threshold × speed / max_speed`, so the
    /// fastest combatant is ready on the first tick.
    pub fn initialize(&mut self, registry: &mut CombatantRegistry) {
        let max_speed = registry.max_speed();
        if max_speed <= 0.0 {
            return;
        }
        for record in registry.iter_mut() {
            record.set_action_value(self.threshold * record.speed() / max_speed);
        }
        self.clock = 0;
    }

    /// Advances one tick and returns the combatant that acts, if any.
    ///
    /// Candidates are living combatants at or above the threshold; the
    /// highest action value wins, then the higher speed, then the earlier
    /// registration.
    pub fn process_next_tick(&mut self, registry: &mut CombatantRegistry) -> Option<ScheduledTurn> {
        self.clock += 1;

        for record in registry.iter_mut().filter(|r| r.is_alive()) {
            let speed = record.speed();
            record.advance_action_value(speed);
        }

        let mut selected: Option<(CombatantId, Side, f64, f64)> = None;
        for record in registry.iter().filter(|r| r.is_alive()) {
            let av = record.action_value();
            if av < self.threshold {
                continue;
            }
            let better = match selected {
                None => true,
                Some((_, _, best_av, best_speed)) => {
                    av > best_av || (av == best_av && record.speed() > best_speed)
                }
            };
            if better {
                selected = Some((record.id(), record.side(), av, record.speed()));
            }
        }

        let (actor, side, av, _) = selected?;
        if let Some(record) = registry.get_mut(actor) {
            record.set_action_value(0.0);
        }
        for record in registry.iter_mut() {
            if record.action_value() < 0.0 {
                warn!(
                    target: "battle::scheduler",
                    combatant = %record.id(),
                    action_value = record.action_value(),
                    "negative action value clamped to zero"
                );
                record.set_action_value(0.0);
            }
        }

        debug!(
            target: "battle::scheduler",
            tick = self.clock,
            %actor,
            ?side,
            action_value = av,
            "combatant selected to act"
        );
        Some(ScheduledTurn {
            actor,
            side,
            tick: self.clock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BattleEnv, CombatantDefinition, NoEquipment, RosterSnapshot, SpawnLayout};
    use crate::state::BaseStats;

    fn def(name: &str, speed: f64) -> CombatantDefinition {
        CombatantDefinition::new(
            name,
            name,
            BaseStats {
                max_hp: 100,
                speed,
                ..BaseStats::default()
            },
        )
    }

    fn registry(allies: &[f64], enemies: &[f64]) -> CombatantRegistry {
        let roster = RosterSnapshot::new(
            allies.iter().enumerate().map(|(i, s)| def(&format!("a{i}"), *s)).collect(),
            enemies.iter().enumerate().map(|(i, s)| def(&format!("e{i}"), *s)).collect(),
        );
        let spawns = SpawnLayout::lines(4, enemies.len(), 2.0, 10.0);
        let env = BattleEnv::with_all(&roster, &NoEquipment, &spawns);
        CombatantRegistry::setup_combatants(&env).unwrap()
    }

    #[test]
    fn initialize_scales_by_max_speed() {
        let mut reg = registry(&[200.0], &[100.0]);
        let mut scheduler = ActionValueScheduler::new(10_000.0);
        scheduler.initialize(&mut reg);

        assert_eq!(reg.get(CombatantId(0)).unwrap().action_value(), 10_000.0);
        assert_eq!(reg.get(CombatantId(1)).unwrap().action_value(), 5_000.0);
    }

    #[test]
    fn fastest_acts_first_and_resets() {
        let mut reg = registry(&[200.0], &[100.0]);
        let mut scheduler = ActionValueScheduler::new(10_000.0);
        scheduler.initialize(&mut reg);

        let turn = scheduler.process_next_tick(&mut reg).unwrap();
        assert_eq!(turn.actor, CombatantId(0));
        assert!(turn.is_ally());
        assert_eq!(reg.get(CombatantId(0)).unwrap().action_value(), 0.0);
        assert_eq!(reg.get(CombatantId(1)).unwrap().action_value(), 5_100.0);
    }

    #[test]
    fn ties_break_on_speed_then_registration_order() {
        let mut reg = registry(&[100.0, 100.0], &[100.0]);
        let mut scheduler = ActionValueScheduler::new(10_000.0);
        for record in reg.iter_mut() {
            record.set_action_value(9_900.0);
        }
        let turn = scheduler.process_next_tick(&mut reg).unwrap();
        assert_eq!(turn.actor, CombatantId(0));

        let turn = scheduler.process_next_tick(&mut reg).unwrap();
        assert_eq!(turn.actor, CombatantId(1));
    }

    #[test]
    fn no_actor_below_threshold() {
        let mut reg = registry(&[100.0], &[100.0]);
        let mut scheduler = ActionValueScheduler::new(10_000.0);
        assert_eq!(scheduler.process_next_tick(&mut reg), None);
        assert_eq!(scheduler.clock(), 1);
    }

    #[test]
    fn dead_combatants_are_never_selected() {
        let mut reg = registry(&[300.0], &[100.0]);
        let mut scheduler = ActionValueScheduler::new(10_000.0);
        scheduler.initialize(&mut reg);
        reg.get_mut(CombatantId(0)).unwrap().take_damage(100);

        for _ in 0..500 {
            if let Some(turn) = scheduler.process_next_tick(&mut reg) {
                assert_eq!(turn.actor, CombatantId(1));
            }
        }
        assert!(reg.get(CombatantId(0)).unwrap().action_value() >= 10_000.0);
    }

    #[test]
    fn negative_action_values_are_clamped_on_selection() {
        let mut reg = registry(&[100.0], &[100.0]);
        let mut scheduler = ActionValueScheduler::new(10_000.0);
        reg.get_mut(CombatantId(0)).unwrap().set_action_value(9_950.0);
        reg.get_mut(CombatantId(1)).unwrap().set_action_value(-5_000.0);

        scheduler.process_next_tick(&mut reg).unwrap();
        assert_eq!(reg.get(CombatantId(1)).unwrap().action_value(), 0.0);
    }
}
