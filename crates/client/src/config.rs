//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use runtime::{PacingConfig, RuntimeConfig};

/// Settings for one headless battle.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub seed: u64,
    pub pacing: PacingConfig,
    pub max_turns: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../battle/content/data"
            )),
            seed: 0,
            pacing: PacingConfig::instant(),
            max_turns: Some(10_000),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_DATA_DIR` - Content directory (default: the bundled data)
    /// - `BATTLE_SEED` - Battle seed (default: 0)
    /// - `BATTLE_PACING` - Multiplier on the default turn delays (default: 0, no waiting)
    /// - `BATTLE_MAX_TURNS` - Abandon after this many turns; 0 disables the limit (default: 10000)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("BATTLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(seed) = read_env::<u64>("BATTLE_SEED") {
            config.seed = seed;
        }

        if let Some(factor) = read_env::<f64>("BATTLE_PACING") {
            config.pacing = if factor > 0.0 {
                PacingConfig::default().scaled(factor)
            } else {
                PacingConfig::instant()
            };
        }

        if let Some(limit) = read_env::<u32>("BATTLE_MAX_TURNS") {
            config.max_turns = (limit > 0).then_some(limit);
        }

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            pacing: self.pacing.clone(),
            max_turns: self.max_turns,
            ..RuntimeConfig::default()
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
