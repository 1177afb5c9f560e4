use crate::state::Position;

/// Spawn slots that bind combatants to world positions.
///
/// Registration binds the n-th ally to the n-th ally slot and likewise for
/// enemies. Targeting uses these positions for "nearest" queries.
pub trait SpawnOracle: Send + Sync {
    fn ally_slots(&self) -> &[Position];

    fn enemy_slots(&self) -> &[Position];
}

/// In-memory spawn layout.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnLayout {
    pub allies: Vec<Position>,
    pub enemies: Vec<Position>,
}

impl SpawnLayout {
    pub fn new(allies: Vec<Position>, enemies: Vec<Position>) -> Self {
        Self { allies, enemies }
    }

    /// Ally slots in a row along x and enemy slots facing them at `z = depth`.
    pub fn lines(ally_count: usize, enemy_count: usize, spacing: f64, depth: f64) -> Self {
        let row = |count: usize, z: f64| {
            (0..count)
                .map(|i| Position::new(i as f64 * spacing, 0.0, z))
                .collect()
        };
        Self {
            allies: row(ally_count, 0.0),
            enemies: row(enemy_count, depth),
        }
    }
}

impl SpawnOracle for SpawnLayout {
    fn ally_slots(&self) -> &[Position] {
        &self.allies
    }

    fn enemy_slots(&self) -> &[Position] {
        &self.enemies
    }
}
