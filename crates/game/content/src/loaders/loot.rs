//! Loot table loader.

use std::path::Path;

use battle_core::{LootTable, RewardGenerator};

use crate::loaders::{LoadResult, read_file};

/// Loader for mob and boss loot tables from RON files.
pub struct LootLoader;

impl LootLoader {
    pub fn load(path: &Path) -> LoadResult<RewardGenerator> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RewardGenerator> {
        let rewards: RewardGenerator = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse loot RON: {}", e))?;

        check_table("mob", &rewards.mob)?;
        check_table("boss", &rewards.boss)?;
        Ok(rewards)
    }
}

fn check_table(label: &str, table: &LootTable) -> LoadResult<()> {
    for entry in &table.entries {
        if entry.min == 0 || entry.min > entry.max {
            anyhow::bail!(
                "{} loot entry {} has an invalid quantity range {}..={}",
                label,
                entry.item,
                entry.min,
                entry.max
            );
        }
        if entry.chance_pct > 100 {
            anyhow::bail!("{} loot entry {} has chance above 100", label, entry.item);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_and_quantities_default_to_one() {
        let rewards = LootLoader::parse(
            r#"(
                mob: (entries: [(item: "Bone", chance_pct: 50)]),
                boss: (rolls: 2, entries: [(item: "Crown", chance_pct: 100)]),
            )"#,
        )
        .unwrap();

        assert_eq!(rewards.mob.rolls, 1);
        assert_eq!(rewards.mob.entries[0].min, 1);
        assert_eq!(rewards.mob.entries[0].max, 1);
        assert_eq!(rewards.boss.rolls, 2);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let result = LootLoader::parse(
            r#"(mob: (entries: [(item: "Bone", min: 3, max: 1, chance_pct: 50)]), boss: (entries: []))"#,
        );
        assert!(result.is_err());
    }
}
