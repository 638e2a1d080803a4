//! Enemy template loader.

use std::collections::HashSet;
use std::path::Path;

use crate::enemies::Bestiary;
use crate::loaders::{LoadResult, read_file};

/// Loader for enemy templates and encounters from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Bestiary> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Bestiary> {
        let bestiary: Bestiary = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy RON: {}", e))?;

        let mut names = HashSet::new();
        for template in &bestiary.templates {
            if !names.insert(template.name.as_str()) {
                anyhow::bail!("Duplicate enemy template: {}", template.name);
            }
            if template.max_health <= 0 {
                anyhow::bail!("Enemy {} must have positive max_health", template.name);
            }
            if template.attack < 0 || template.defense < 0 {
                anyhow::bail!("Enemy {} has negative stats", template.name);
            }
        }

        let missing = bestiary.missing_templates();
        if !missing.is_empty() {
            anyhow::bail!("Encounters reference unknown enemies: {}", missing.join(", "));
        }
        for encounter in &bestiary.encounters {
            if encounter.enemies.is_empty() {
                anyhow::bail!("Encounter {} has no enemies", encounter.name);
            }
            if encounter.enemies.len() > battle_core::BattleConfig::MAX_ENEMIES {
                anyhow::bail!(
                    "Encounter {} exceeds {} enemies",
                    encounter.name,
                    battle_core::BattleConfig::MAX_ENEMIES
                );
            }
        }

        tracing::debug!(
            templates = bestiary.templates.len(),
            encounters = bestiary.encounters.len(),
            "loaded bestiary"
        );
        Ok(bestiary)
    }
}
