//! Turns battle events into terminal lines.
use battle_core::{BattleEvent, BattleSnapshot, Combatant};

pub fn describe(event: &BattleEvent) -> String {
    match event {
        BattleEvent::BattleStarted { enemies, boss } => {
            let kind = if *boss { "boss battle" } else { "battle" };
            format!("A {kind} begins against {enemies} enemies!")
        }
        BattleEvent::TurnStarted { turn } => format!("-- turn {} --", turn + 1),
        BattleEvent::Attack {
            attacker,
            target,
            damage,
            critical,
            special,
        } => {
            let flourish = match (critical, special) {
                (_, true) => " with a special attack",
                (true, false) => " (critical!)",
                _ => "",
            };
            format!("{attacker} hits {target} for {damage}{flourish}")
        }
        BattleEvent::ItemUsed { item, target } => match target {
            Some(target) => format!("Used {item} on {target}"),
            None => format!("Used {item}"),
        },
        BattleEvent::ItemDamage {
            item,
            target,
            damage,
        } => format!("{item} deals {damage} to {target}"),
        BattleEvent::Healed { target, amount } => format!("{target} recovers {amount} health"),
        BattleEvent::BuffApplied {
            target,
            kind,
            magnitude,
            turns,
        } => {
            if *magnitude == 0 {
                format!("{target} is affected by {kind} for {turns} turns")
            } else {
                format!("{target} gains +{magnitude} {kind} for {turns} turns")
            }
        }
        BattleEvent::BuffExpired { target, kind } => format!("{target}'s {kind} wears off"),
        BattleEvent::Poisoned { target, damage } => {
            format!("{target} is poisoned ({damage} per round)")
        }
        BattleEvent::PoisonCured { target } => format!("{target} is cured of poison"),
        BattleEvent::PoisonTick { target, damage } => {
            format!("{target} takes {damage} poison damage")
        }
        BattleEvent::Stunned { target } => format!("{target} is stunned and cannot act"),
        BattleEvent::EnemyPotion { enemy } => format!("{enemy} drinks a potion"),
        BattleEvent::Defeated { name } => format!("{name} is defeated"),
        BattleEvent::WatchdogFired => "(animation timed out)".to_string(),
        BattleEvent::TurnForced => "(turn returned to the player)".to_string(),
        BattleEvent::BattleEnded { result, aborted } => {
            if *aborted {
                format!("The battle was aborted: {result}")
            } else {
                format!("The battle is over: {result}")
            }
        }
        BattleEvent::RewardsApplied { stacks } => format!("Collected {stacks} reward stacks"),
    }
}

fn health_bar(combatant: &Combatant) -> String {
    const WIDTH: i32 = 20;
    let filled = if combatant.max_health() == 0 {
        0
    } else {
        combatant.current_health() * WIDTH / combatant.max_health()
    };
    format!(
        "[{}{}] {:>3}/{:<3}",
        "#".repeat(filled as usize),
        ".".repeat((WIDTH - filled) as usize),
        combatant.current_health(),
        combatant.max_health()
    )
}

/// Multi-line status block: player first, then every enemy.
pub fn status(snapshot: &BattleSnapshot) -> String {
    let mut lines = vec![format!(
        "{:<16} {}",
        snapshot.player.name,
        health_bar(&snapshot.player)
    )];
    for (index, enemy) in snapshot.enemies.iter().enumerate() {
        let marker = if snapshot.selected_enemy == Some(index) { ">" } else { " " };
        let tag = if enemy.is_defeated { " (down)" } else { "" };
        lines.push(format!(
            "{marker}{:<15} {}{tag}",
            enemy.name,
            health_bar(enemy)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use battle_core::{BattleResult, BuffKind};

    use super::*;

    #[test]
    fn critical_and_special_hits_are_called_out() {
        let crit = BattleEvent::Attack {
            attacker: "Hero".into(),
            target: "Goblin".into(),
            damage: 22,
            critical: true,
            special: false,
        };
        assert_eq!(describe(&crit), "Hero hits Goblin for 22 (critical!)");

        let special = BattleEvent::Attack {
            attacker: "Orc".into(),
            target: "Hero".into(),
            damage: 30,
            critical: false,
            special: true,
        };
        assert!(describe(&special).ends_with("with a special attack"));
    }

    #[test]
    fn stun_reads_as_an_effect_not_a_bonus() {
        let stun = BattleEvent::BuffApplied {
            target: "Goblin".into(),
            kind: BuffKind::Stun,
            magnitude: 0,
            turns: 1,
        };
        assert_eq!(describe(&stun), "Goblin is affected by stun for 1 turns");
    }

    #[test]
    fn endings_name_the_result() {
        let won = BattleEvent::BattleEnded {
            result: BattleResult::Won,
            aborted: false,
        };
        assert_eq!(describe(&won), "The battle is over: won");
    }

    #[test]
    fn health_bar_scales_to_width() {
        let hero = Combatant::player("Hero", 100, 10, 5).with_health(50);
        assert!(health_bar(&hero).starts_with("[##########.........."));
    }
}
