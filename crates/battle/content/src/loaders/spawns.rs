//! Spawn layout loader.

use std::path::Path;

use battle_core::{BattleConfig, Position, SpawnLayout};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Spawn layout as authored in RON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SpawnSpec {
    /// Every slot spelled out.
    Explicit {
        allies: Vec<Position>,
        enemies: Vec<Position>,
    },
    /// Two facing rows; see [`SpawnLayout::lines`].
    Lines {
        allies: usize,
        enemies: usize,
        spacing: f64,
        depth: f64,
    },
}

impl SpawnSpec {
    pub fn into_layout(self) -> SpawnLayout {
        match self {
            Self::Explicit { allies, enemies } => SpawnLayout::new(allies, enemies),
            Self::Lines {
                allies,
                enemies,
                spacing,
                depth,
            } => SpawnLayout::lines(allies, enemies, spacing, depth),
        }
    }
}

/// Loader for spawn layouts from RON files.
pub struct SpawnLoader;

impl SpawnLoader {
    pub fn load(path: &Path) -> LoadResult<SpawnLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SpawnLayout> {
        let spec: SpawnSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spawn layout RON: {}", e))?;
        let layout = spec.into_layout();

        if layout.allies.len() < BattleConfig::MIN_ALLY_SLOTS {
            anyhow::bail!(
                "spawn layout has {} ally slots, at least {} required",
                layout.allies.len(),
                BattleConfig::MIN_ALLY_SLOTS
            );
        }
        if layout.enemies.len() < BattleConfig::MIN_ENEMY_SLOTS {
            anyhow::bail!("spawn layout has no enemy slots");
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_expand_into_rows() {
        let layout =
            SpawnLoader::parse("Lines(allies: 4, enemies: 3, spacing: 2.0, depth: 8.0)").unwrap();
        assert_eq!(layout.allies.len(), 4);
        assert_eq!(layout.enemies.len(), 3);
        assert_eq!(layout.enemies[2], Position::new(4.0, 0.0, 8.0));
    }

    #[test]
    fn explicit_slots_are_kept_in_order() {
        let layout = SpawnLoader::parse(
            r#"Explicit(
                allies: [(x: 0.0, y: 0.0, z: 0.0), (x: 1.0, y: 0.0, z: 0.0),
                         (x: 2.0, y: 0.0, z: 0.0), (x: 3.0, y: 0.0, z: 0.0)],
                enemies: [(x: 5.0, y: 0.0, z: 9.0)],
            )"#,
        )
        .unwrap();
        assert_eq!(layout.enemies, vec![Position::new(5.0, 0.0, 9.0)]);
    }

    #[test]
    fn too_few_ally_slots_is_rejected() {
        let err = SpawnLoader::parse("Lines(allies: 3, enemies: 3, spacing: 2.0, depth: 8.0)")
            .unwrap_err();
        assert!(err.to_string().contains("3 ally slots"));
    }
}
