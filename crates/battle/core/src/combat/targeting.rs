//! Target queries over the registry.

use crate::registry::CombatantRegistry;
use crate::state::{CombatantId, CombatantRecord, Side};

/// Living combatant of `side` with the lowest current HP; ties go to the
/// earlier registration.
pub fn lowest_hp(registry: &CombatantRegistry, side: Side) -> Option<CombatantId> {
    registry
        .living(side)
        .min_by_key(|r| r.current_hp())
        .map(CombatantRecord::id)
}

/// Up to `count` living combatants on the primary target's side, nearest to
/// the primary first, excluding the primary itself.
pub fn nearest_to(registry: &CombatantRegistry, primary: CombatantId, count: usize) -> Vec<CombatantId> {
    let Some(anchor) = registry.get(primary) else {
        return Vec::new();
    };
    let origin = anchor.position();

    let mut candidates: Vec<(f64, CombatantId)> = registry
        .living(anchor.side())
        .filter(|r| r.id() != primary)
        .map(|r| (origin.distance(r.position()), r.id()))
        .collect();
    // Stable sort keeps registration order for equal distances.
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates.into_iter().take(count).map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BattleEnv, CombatantDefinition, NoEquipment, RosterSnapshot, SpawnLayout};
    use crate::state::{BaseStats, Position};

    fn def(name: &str, hp: u32) -> CombatantDefinition {
        CombatantDefinition::new(
            name,
            name,
            BaseStats {
                max_hp: hp,
                speed: 100.0,
                ..BaseStats::default()
            },
        )
    }

    fn registry(enemy_positions: Vec<Position>, enemy_hp: &[u32]) -> CombatantRegistry {
        let roster = RosterSnapshot::new(
            vec![def("hero", 100)],
            enemy_hp.iter().enumerate().map(|(i, hp)| def(&format!("e{i}"), *hp)).collect(),
        );
        let spawns = SpawnLayout::new(vec![Position::ORIGIN; 4], enemy_positions);
        let env = BattleEnv::with_all(&roster, &NoEquipment, &spawns);
        CombatantRegistry::setup_combatants(&env).unwrap()
    }

    #[test]
    fn lowest_hp_prefers_earlier_registration_on_ties() {
        let reg = registry(
            vec![Position::new(0.0, 0.0, 5.0); 3],
            &[80, 60, 60],
        );
        assert_eq!(lowest_hp(&reg, Side::Enemy), Some(CombatantId(2)));
    }

    #[test]
    fn lowest_hp_skips_the_dead() {
        let mut reg = registry(vec![Position::new(0.0, 0.0, 5.0); 2], &[10, 60]);
        reg.get_mut(CombatantId(1)).unwrap().take_damage(10);
        assert_eq!(lowest_hp(&reg, Side::Enemy), Some(CombatantId(2)));

        reg.get_mut(CombatantId(2)).unwrap().take_damage(60);
        assert_eq!(lowest_hp(&reg, Side::Enemy), None);
    }

    #[test]
    fn nearest_orders_by_distance_to_primary() {
        let reg = registry(
            vec![
                Position::new(0.0, 0.0, 0.0),
                Position::new(9.0, 0.0, 0.0),
                Position::new(2.0, 0.0, 0.0),
                Position::new(4.0, 0.0, 0.0),
            ],
            &[50, 50, 50, 50],
        );
        let nearest = nearest_to(&reg, CombatantId(1), 2);
        assert_eq!(nearest, vec![CombatantId(3), CombatantId(4)]);
    }
}
