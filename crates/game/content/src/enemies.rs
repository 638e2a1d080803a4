//! Enemy templates and encounter groups.
//!
//! Templates are immutable stat blocks. Every battle spawns fresh
//! [`Combatant`]s from them, so damage and statuses never leak between
//! encounters.

use battle_core::Combatant;

/// Stat block for one kind of enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub name: String,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    /// Boss flag; any hero in an encounter makes it a boss battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hero: bool,
}

impl EnemyTemplate {
    pub fn new(name: impl Into<String>, max_health: i32, attack: i32, defense: i32) -> Self {
        Self {
            name: name.into(),
            max_health,
            attack,
            defense,
            hero: false,
        }
    }

    pub fn as_hero(mut self) -> Self {
        self.hero = true;
        self
    }

    /// A fresh combatant at full health.
    pub fn spawn(&self) -> Combatant {
        let enemy = Combatant::new(self.name.clone(), self.max_health, self.attack, self.defense);
        if self.hero { enemy.as_hero() } else { enemy }
    }
}

/// A named group of enemies fought together.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub name: String,
    /// Template names, in roster order.
    pub enemies: Vec<String>,
}

/// Enemy templates plus the encounters built from them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bestiary {
    pub templates: Vec<EnemyTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub encounters: Vec<Encounter>,
}

impl Bestiary {
    pub fn new(templates: Vec<EnemyTemplate>, encounters: Vec<Encounter>) -> Self {
        Self {
            templates,
            encounters,
        }
    }

    pub fn template(&self, name: &str) -> Option<&EnemyTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn encounter(&self, name: &str) -> Option<&Encounter> {
        self.encounters.iter().find(|e| e.name == name)
    }

    pub fn spawn(&self, name: &str) -> Option<Combatant> {
        self.template(name).map(EnemyTemplate::spawn)
    }

    /// Spawns every enemy of an encounter, or `None` if the encounter or
    /// one of its templates is unknown.
    pub fn spawn_encounter(&self, name: &str) -> Option<Vec<Combatant>> {
        self.encounter(name)?
            .enemies
            .iter()
            .map(|enemy| self.spawn(enemy))
            .collect()
    }

    /// Names referenced by encounters that have no template.
    pub fn missing_templates(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .encounters
            .iter()
            .flat_map(|e| e.enemies.iter())
            .filter(|name| self.template(name).is_none())
            .map(String::as_str)
            .collect();
        missing.dedup();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bestiary() -> Bestiary {
        Bestiary::new(
            vec![
                EnemyTemplate::new("Goblin", 50, 10, 5),
                EnemyTemplate::new("Warlord", 140, 18, 8).as_hero(),
            ],
            vec![
                Encounter {
                    name: "camp".into(),
                    enemies: vec!["Goblin".into(), "Warlord".into()],
                },
                Encounter {
                    name: "broken".into(),
                    enemies: vec!["Dragon".into()],
                },
            ],
        )
    }

    #[test]
    fn spawned_enemies_are_independent() {
        let bestiary = bestiary();
        let mut first = bestiary.spawn("Goblin").unwrap();
        first.set_health(1);
        let second = bestiary.spawn("Goblin").unwrap();
        assert_eq!(second.current_health(), 50);
    }

    #[test]
    fn encounter_spawns_in_roster_order() {
        let roster = bestiary().spawn_encounter("camp").unwrap();
        assert_eq!(roster.len(), 2);
        assert!(!roster[0].is_hero);
        assert!(roster[1].is_hero);
    }

    #[test]
    fn unknown_templates_fail_the_encounter() {
        let bestiary = bestiary();
        assert!(bestiary.spawn_encounter("broken").is_none());
        assert_eq!(bestiary.missing_templates(), vec!["Dragon"]);
    }
}
