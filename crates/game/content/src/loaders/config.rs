//! Battle balance loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
///
/// Missing keys fall back to [`BattleConfig::default`], so a partial file only
/// overrides what it names.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;

        if config.watchdog_ms == 0 {
            anyhow::bail!("watchdog_ms must be greater than zero");
        }
        if config.damage.minimum < 1 {
            anyhow::bail!("damage.minimum must be at least 1");
        }
        if config.damage.crit_chance_pct > 100
            || config.damage.special_chance_pct > 100
            || config.enemy_potion.chance_pct > 100
        {
            anyhow::bail!("chance percentages must be within 0..=100");
        }

        Ok(config)
    }
}
