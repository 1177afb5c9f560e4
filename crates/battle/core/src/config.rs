/// Battle configuration constants and tunable parameters.
///
/// Values default to the shipped balance; content loaders may override any of
/// them from `config.toml`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Action value a combatant must reach before it may act.
    pub turn_threshold: f64,
    /// Fraction of a full turn a `None` status pushes the target forward.
    pub action_advance_fraction: f64,
    /// Mana granted to any combatant that receives a hit.
    pub target_mana_gain: u32,
    /// Mana granted to an ally after a basic attack or skill.
    pub ally_mana_gain: u32,
    /// Mana granted to an enemy after a basic attack or skill.
    pub enemy_mana_gain: u32,
    /// Energy granted to an enemy after a basic attack or skill.
    pub enemy_energy_gain: u32,
    /// Upper bound for energy.
    pub energy_cap: u32,
    /// Per-level growth of break damage.
    pub break_level_scaling: f64,
    /// Bonus added to damage and vulnerability terms on elemental advantage.
    pub element_bonus: f64,
    /// Resistance scaling on elemental advantage (1.0 otherwise).
    pub element_resistance_factor: f64,
    /// Modifier applied to break damage on elemental advantage.
    pub element_modifier: f64,
    /// Slow amount written by a Freeze status.
    pub freeze_slow_amount: f64,
    /// Crit chance used for enemies.
    pub enemy_crit_rate: f64,
    /// Crit damage bonus used for enemies.
    pub enemy_crit_dmg: f64,
    /// Instances preallocated per effect key at battle start.
    pub effect_pool_size: usize,
}

impl BattleConfig {
    // ===== compile-time constants =====
    /// Maximum number of allies fielded in one battle.
    pub const MAX_ALLIES: usize = 4;
    /// Minimum ally spawn slots a layout must provide.
    pub const MIN_ALLY_SLOTS: usize = 4;
    /// Minimum enemy spawn slots a layout must provide.
    pub const MIN_ENEMY_SLOTS: usize = 1;
    /// Skill charge needed for (and capped at) the ally skill slot.
    pub const SKILL_CHARGE_CAP: u8 = 3;
    /// Placeholder statuses tracked on a single combatant.
    pub const MAX_STATUS_MARKERS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TURN_THRESHOLD: f64 = 10_000.0;
    pub const DEFAULT_ACTION_ADVANCE_FRACTION: f64 = 0.3;
    pub const DEFAULT_TARGET_MANA_GAIN: u32 = 10;
    pub const DEFAULT_ALLY_MANA_GAIN: u32 = 20;
    pub const DEFAULT_ENEMY_MANA_GAIN: u32 = 30;
    pub const DEFAULT_ENEMY_ENERGY_GAIN: u32 = 10;
    pub const DEFAULT_ENERGY_CAP: u32 = 100;
    pub const DEFAULT_BREAK_LEVEL_SCALING: f64 = 0.05;
    pub const DEFAULT_ELEMENT_BONUS: f64 = 0.5;
    pub const DEFAULT_ELEMENT_RESISTANCE_FACTOR: f64 = 0.5;
    pub const DEFAULT_ELEMENT_MODIFIER: f64 = 1.5;
    pub const DEFAULT_FREEZE_SLOW_AMOUNT: f64 = 1.0;
    pub const DEFAULT_ENEMY_CRIT_RATE: f64 = 0.05;
    pub const DEFAULT_ENEMY_CRIT_DMG: f64 = 0.5;
    pub const DEFAULT_EFFECT_POOL_SIZE: usize = 5;

    pub fn new() -> Self {
        Self {
            turn_threshold: Self::DEFAULT_TURN_THRESHOLD,
            action_advance_fraction: Self::DEFAULT_ACTION_ADVANCE_FRACTION,
            target_mana_gain: Self::DEFAULT_TARGET_MANA_GAIN,
            ally_mana_gain: Self::DEFAULT_ALLY_MANA_GAIN,
            enemy_mana_gain: Self::DEFAULT_ENEMY_MANA_GAIN,
            enemy_energy_gain: Self::DEFAULT_ENEMY_ENERGY_GAIN,
            energy_cap: Self::DEFAULT_ENERGY_CAP,
            break_level_scaling: Self::DEFAULT_BREAK_LEVEL_SCALING,
            element_bonus: Self::DEFAULT_ELEMENT_BONUS,
            element_resistance_factor: Self::DEFAULT_ELEMENT_RESISTANCE_FACTOR,
            element_modifier: Self::DEFAULT_ELEMENT_MODIFIER,
            freeze_slow_amount: Self::DEFAULT_FREEZE_SLOW_AMOUNT,
            enemy_crit_rate: Self::DEFAULT_ENEMY_CRIT_RATE,
            enemy_crit_dmg: Self::DEFAULT_ENEMY_CRIT_DMG,
            effect_pool_size: Self::DEFAULT_EFFECT_POOL_SIZE,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
