use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use battle_content::ContentFactory;
use battle_core::env::testing::FixedRng;
use battle_core::{
    ActionOutcome, BattleConfig, BattleEvent, BattleResult, Combatant, CombatantRef,
    ConsumableEffect, Inventory, ItemCatalog, ItemDefinition, LootEntry, LootTable, RejectReason,
    RewardGenerator,
};
use battle_runtime::{BattleSession, RuntimeError, SessionConfig, SessionEvent};

fn catalog() -> ItemCatalog {
    ItemCatalog::new(vec![
        ItemDefinition::consumable("Healing Potion", ConsumableEffect::Heal(30)),
        ItemDefinition::material("Bone"),
    ])
}

fn hero() -> Combatant {
    Combatant::player("Hero", 100, 20, 5)
}

async fn session(
    enemies: Vec<Combatant>,
    inventory: Inventory,
    rng: FixedRng,
) -> BattleSession {
    BattleSession::builder()
        .config(SessionConfig::default().with_seed(7).with_watchdog_ms(1_000))
        .battle_config(BattleConfig::new())
        .items(Arc::new(catalog()))
        .rng(Arc::new(rng))
        .player(hero())
        .enemies(enemies)
        .inventory(inventory)
        .build()
        .await
        .unwrap()
}

fn drain(events: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn watchdog_releases_a_stuck_enemy_turn() {
    let session = session(
        vec![Combatant::new("Goblin", 500, 10, 5)],
        Inventory::default(),
        FixedRng::NEVER,
    )
    .await;
    let mut events = session.subscribe_events();

    assert_eq!(session.attack().await.unwrap(), ActionOutcome::TurnEnded);
    assert!(!session.snapshot().await.unwrap().is_player_turn);

    // The host never reports completion.
    tokio::time::sleep(Duration::from_millis(1_100)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.is_player_turn);
    assert_eq!(snapshot.turn_counter, 1);
    assert_eq!(snapshot.player.current_health(), 95);
    assert!(session.log().await.unwrap().contains(&BattleEvent::WatchdogFired));

    let seen = drain(&mut events);
    assert!(seen.contains(&SessionEvent::AnimationsStopped));
    assert!(seen.contains(&SessionEvent::EnemyPhaseResolved(
        ActionOutcome::EnemyTurnResolved
    )));
}

#[tokio::test(start_paused = true)]
async fn completion_signal_beats_the_watchdog() {
    let session = session(
        vec![Combatant::new("Goblin", 500, 10, 5)],
        Inventory::default(),
        FixedRng::NEVER,
    )
    .await;

    session.attack().await.unwrap();
    assert_eq!(
        session.animation_completed().await.unwrap(),
        Some(ActionOutcome::EnemyTurnResolved)
    );

    // Enemy strike animation still playing blocks the next attack.
    let err = session.attack().await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectReason::Animating));
    assert_eq!(session.animation_completed().await.unwrap(), None);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(!session.log().await.unwrap().contains(&BattleEvent::WatchdogFired));
    assert_eq!(session.attack().await.unwrap(), ActionOutcome::TurnEnded);
}

#[tokio::test(start_paused = true)]
async fn item_cooldown_follows_tokio_time() {
    let items = catalog();
    let mut inventory = Inventory::default();
    inventory.add_item("Healing Potion", 2, &items).unwrap();

    let session = BattleSession::builder()
        .config(SessionConfig::default().with_seed(1))
        .items(Arc::new(items))
        .rng(Arc::new(FixedRng::NEVER))
        .player(hero().with_health(40))
        .enemies(vec![Combatant::new("Goblin", 50, 10, 5)])
        .inventory(inventory)
        .build()
        .await
        .unwrap();

    assert_eq!(session.use_item(0).await.unwrap(), ActionOutcome::Continue);
    session.animation_completed().await.unwrap();

    let err = session.use_item(0).await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectReason::ItemCooldown));

    tokio::time::advance(Duration::from_millis(500)).await;
    assert_eq!(session.use_item(0).await.unwrap(), ActionOutcome::Continue);
    assert_eq!(session.snapshot().await.unwrap().player.current_health(), 100);
}

#[tokio::test(start_paused = true)]
async fn victory_rewards_are_claimed_once_and_carried_out() {
    let loot = RewardGenerator::new(
        LootTable::new(1, vec![LootEntry::new("Bone", 2, 2, 100)]),
        LootTable::default(),
    );
    let session = BattleSession::builder()
        .config(SessionConfig::default().with_seed(3))
        .items(Arc::new(catalog()))
        .rng(Arc::new(FixedRng::ALWAYS))
        .loot(loot)
        .player(hero().with_health(60))
        .enemies(vec![Combatant::new("Rat", 10, 1, 0).with_health(1)])
        .build()
        .await
        .unwrap();

    assert_eq!(
        session.attack().await.unwrap(),
        ActionOutcome::BattleOver(BattleResult::Won)
    );
    let stacks = session.claim_rewards().await.unwrap().unwrap();
    assert_eq!(stacks.len(), 1);
    assert_eq!(stacks[0].quantity, 2);
    assert_eq!(session.claim_rewards().await.unwrap(), None);

    let outcome = session.finish().await.unwrap();
    assert_eq!(outcome.result, Some(BattleResult::Won));
    assert_eq!(outcome.player.current_health(), 60);
    assert_eq!(outcome.inventory.count_of("Bone"), 2);
    assert!(outcome.unclaimed_rewards.is_empty());
}

#[tokio::test(start_paused = true)]
async fn events_carry_animations_and_log_entries() {
    let session = session(
        vec![Combatant::new("Goblin", 500, 10, 5)],
        Inventory::default(),
        FixedRng::NEVER,
    )
    .await;
    let mut events = session.subscribe_events();

    session.attack().await.unwrap();
    let seen = drain(&mut events);

    assert!(seen.iter().any(|event| matches!(
        event,
        SessionEvent::AttackAnimation(animation)
            if animation.attacker == CombatantRef::Player && animation.damage == 15
    )));
    assert!(seen.iter().any(|event| matches!(
        event,
        SessionEvent::Battle(BattleEvent::Attack { damage: 15, .. })
    )));
    for event in &seen {
        assert!(serde_json::to_string(event).is_ok());
    }
}

#[tokio::test]
async fn builder_reports_missing_pieces_and_declines() {
    let missing = BattleSession::builder().player(hero()).build().await;
    assert!(matches!(missing, Err(RuntimeError::MissingComponent(_))));

    let no_enemies = BattleSession::builder()
        .items(Arc::new(catalog()))
        .player(hero())
        .build()
        .await;
    assert!(matches!(no_enemies, Err(RuntimeError::Setup(_))));

    let session = session(
        vec![Combatant::new("Goblin", 50, 10, 5)],
        Inventory::default(),
        FixedRng::NEVER,
    )
    .await;
    let err = session.use_item(0).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Rejected(RejectReason::EmptySlot { slot: 0 })
    ));
    let err = session.cancel_target_selection().await.unwrap_err();
    assert_eq!(err.rejection(), Some(&RejectReason::NotSelectingTarget));
}

fn shipped_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

async fn play_out(session: &BattleSession) -> Vec<BattleEvent> {
    for _ in 0..500 {
        let snapshot = session.snapshot().await.unwrap();
        if snapshot.is_battle_over {
            break;
        }
        if snapshot.is_player_turn && !snapshot.is_animating {
            session.attack().await.unwrap();
        } else {
            session.animation_completed().await.unwrap();
        }
    }
    session.log().await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn same_seed_replays_the_same_battle() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();

    let mut logs = Vec::new();
    for _ in 0..2 {
        let session = BattleSession::builder()
            .config(SessionConfig::default().with_seed(0x5EED))
            .content(&content)
            .encounter(&content.bestiary, "goblin_scouts")
            .unwrap()
            .player(Combatant::player("Hero", 200, 25, 8))
            .build()
            .await
            .unwrap();
        logs.push(play_out(&session).await);
        assert!(session.finish().await.unwrap().result.is_some());
    }

    assert_eq!(logs[0], logs[1]);
    assert!(matches!(logs[0].last(), Some(BattleEvent::BattleEnded { .. })));
}
