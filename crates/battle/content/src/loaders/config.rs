//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.turn_threshold <= 0.0 {
            anyhow::bail!(
                "turn_threshold must be positive, got {}",
                config.turn_threshold
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("turn_threshold = 5000.0\neffect_pool_size = 2\n").unwrap();
        assert_eq!(config.turn_threshold, 5000.0);
        assert_eq!(config.effect_pool_size, 2);
        assert_eq!(config.ally_mana_gain, BattleConfig::DEFAULT_ALLY_MANA_GAIN);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        assert!(ConfigLoader::parse("turn_threshold = 0.0").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(&dir.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
