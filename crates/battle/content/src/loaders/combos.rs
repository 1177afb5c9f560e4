//! Combo rule loader.

use std::path::Path;

use battle_core::{ComboRule, ComboTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Combo file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboFile {
    pub rules: Vec<ComboRule>,
}

/// Loader for combo rules from RON files.
pub struct ComboLoader;

impl ComboLoader {
    pub fn load(path: &Path) -> LoadResult<ComboTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ComboTable> {
        let file: ComboFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combo RON: {}", e))?;

        if let Some(rule) = file.rules.iter().find(|r| r.multiplier <= 0.0) {
            anyhow::bail!(
                "combo {} -> {} has non-positive multiplier {}",
                rule.previous_skill,
                rule.current_skill,
                rule.multiplier
            );
        }
        Ok(ComboTable::new(file.rules))
    }
}
