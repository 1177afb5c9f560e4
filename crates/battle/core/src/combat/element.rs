//! Elemental advantage terms.

use crate::config::BattleConfig;
use crate::state::Element;

/// Damage terms derived from an element matchup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementalAdvantage {
    /// Multiplier for break damage.
    pub modifier: f64,
    /// Added to the bonus-damage and vulnerability terms.
    pub bonus: f64,
    /// Scales the defender's resistance.
    pub resistance_factor: f64,
}

impl ElementalAdvantage {
    pub const NEUTRAL: Self = Self {
        modifier: 1.0,
        bonus: 0.0,
        resistance_factor: 1.0,
    };

    /// Terms for an attack of element `attack` against a defender of element `defense`.
    pub fn of(attack: Element, defense: Element, config: &BattleConfig) -> Self {
        if attack.beats(defense) {
            Self {
                modifier: config.element_modifier,
                bonus: config.element_bonus,
                resistance_factor: config.element_resistance_factor,
            }
        } else {
            Self::NEUTRAL
        }
    }

    pub fn is_advantaged(&self) -> bool {
        *self != Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn advantage_cycle_covers_all_pairs() {
        let config = BattleConfig::default();
        let cycle = [
            (Element::Wind, Element::Ash),
            (Element::Ash, Element::Ice),
            (Element::Ice, Element::Tide),
            (Element::Tide, Element::Wind),
        ];

        for attack in Element::iter() {
            for defense in Element::iter() {
                let advantage = ElementalAdvantage::of(attack, defense, &config);
                let expected = cycle.contains(&(attack, defense));
                assert_eq!(advantage.is_advantaged(), expected, "{attack} vs {defense}");
                if expected {
                    assert_eq!(advantage.modifier, 1.5);
                    assert_eq!(advantage.bonus, 0.5);
                    assert_eq!(advantage.resistance_factor, 0.5);
                } else {
                    assert_eq!(advantage, ElementalAdvantage::NEUTRAL);
                }
            }
        }
    }
}
