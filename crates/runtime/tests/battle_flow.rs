//! Runtime-level battle flows: providers, pacing-free stepping, abandon and
//! event fan-out.

use std::sync::Arc;

use battle_content::ContentFactory;
use battle_core::{
    BaseStats, BattleEvent, CombatantDefinition, CombatantId, RngOracle, RosterSnapshot,
    SkillDefinition, SkillSlot, SpawnLayout,
};
use runtime::{
    AutoPilotProvider, BattleSetup, Event, PacingConfig, PlayerInput, Runtime, RuntimeConfig,
    RuntimeError, StepOutcome, Topic,
};

/// Never crits; enemies always use their basic attack.
struct FixedRng;

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        u32::MAX
    }
}

fn fighter(name: &str, hp: u32, attack: f64, defense: f64, speed: f64) -> CombatantDefinition {
    CombatantDefinition::new(
        name.to_lowercase(),
        name,
        BaseStats {
            max_hp: hp,
            attack,
            defense,
            speed,
            ..BaseStats::default()
        },
    )
}

fn duel(ally: CombatantDefinition, enemy: CombatantDefinition) -> BattleSetup {
    BattleSetup::new(
        Arc::new(RosterSnapshot::new(vec![ally], vec![enemy])),
        Arc::new(SpawnLayout::lines(4, 1, 2.0, 10.0)),
    )
    .with_rng(Box::new(FixedRng))
}

fn instant() -> RuntimeConfig {
    RuntimeConfig {
        pacing: PacingConfig::instant(),
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn channel_input_drives_an_ally_turn() {
    let mut runtime = Runtime::builder()
        .config(instant())
        .setup(duel(
            fighter("Hugo", 100, 50.0, 0.0, 100.0),
            fighter("Slime", 100, 10.0, 10.0, 50.0),
        ))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    // Unaffordable first, then a cancelled pick, then the real one.
    handle.submit_skill(SkillSlot::Ultimate).await.unwrap();
    handle.submit_skill(SkillSlot::Basic).await.unwrap();
    handle.cancel_selection().await.unwrap();
    handle.submit_skill(SkillSlot::Basic).await.unwrap();
    handle.submit_target(Some(CombatantId(1))).await.unwrap();

    let step = runtime.step().await.unwrap();
    let StepOutcome::TurnResolved(outcome) = step else {
        panic!("expected a resolved turn, got {step:?}");
    };
    assert_eq!(outcome.actor, CombatantId(0));
    assert_eq!(outcome.slot, SkillSlot::Basic);
    assert_eq!(outcome.damage[0].amount, 42);
    assert_eq!(outcome.damage[0].hp_after, 58);

    let snapshot = handle.query_snapshot().await.unwrap();
    assert_eq!(snapshot.turn_count, 1);
    assert!(snapshot.current_turn.is_none());
}

#[tokio::test]
async fn invalid_target_is_asked_again() {
    let mut runtime = Runtime::builder()
        .config(instant())
        .setup(duel(
            fighter("Hugo", 100, 50.0, 0.0, 100.0),
            fighter("Slime", 100, 10.0, 10.0, 50.0),
        ))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.submit_skill(SkillSlot::Basic).await.unwrap();
    handle.submit_target(Some(CombatantId(0))).await.unwrap();
    handle.submit_input(PlayerInput::Target(None)).await.unwrap();

    let step = runtime.step().await.unwrap();
    assert!(matches!(
        step,
        StepOutcome::TurnResolved(ref outcome) if outcome.primary == CombatantId(1)
    ));
}

#[tokio::test]
async fn enemy_turns_need_no_input() {
    let mut runtime = Runtime::builder()
        .config(instant())
        .setup(duel(
            fighter("Hugo", 100, 50.0, 0.0, 50.0),
            fighter("Wolf", 100, 20.0, 0.0, 100.0),
        ))
        .build()
        .await
        .unwrap();

    let step = runtime.step().await.unwrap();
    let StepOutcome::TurnResolved(outcome) = step else {
        panic!("expected a resolved turn, got {step:?}");
    };
    assert_eq!(outcome.actor, CombatantId(1));
    assert_eq!(outcome.primary, CombatantId(0));
    assert_eq!(outcome.slot, SkillSlot::Basic);
}

#[tokio::test]
async fn autopilot_targets_the_weakest_opponent() {
    let roster = RosterSnapshot::new(
        vec![fighter("Hugo", 100, 50.0, 0.0, 300.0)],
        vec![
            fighter("Ogre", 500, 20.0, 0.0, 10.0),
            fighter("Imp", 80, 20.0, 0.0, 10.0),
        ],
    );
    let setup = BattleSetup::new(Arc::new(roster), Arc::new(SpawnLayout::lines(4, 2, 2.0, 10.0)))
        .with_rng(Box::new(FixedRng));
    let mut runtime = Runtime::builder()
        .config(instant())
        .setup(setup)
        .provider(AutoPilotProvider)
        .build()
        .await
        .unwrap();

    let step = runtime.step().await.unwrap();
    let StepOutcome::TurnResolved(outcome) = step else {
        panic!("expected a resolved turn, got {step:?}");
    };
    assert_eq!(outcome.actor, CombatantId(0));
    assert_eq!(outcome.primary, CombatantId(2));
}

#[tokio::test]
async fn events_fan_out_by_topic() {
    let slash = SkillDefinition {
        effect_key: Some("slash".to_string()),
        ..SkillDefinition::new("Slash")
    };
    let hugo = CombatantDefinition {
        skills: [slash, SkillDefinition::new("Skill"), SkillDefinition::new("Ultimate")],
        ..fighter("Hugo", 100, 50.0, 0.0, 100.0)
    };
    let mut runtime = Runtime::builder()
        .config(instant())
        .setup(duel(hugo, fighter("Slime", 100, 10.0, 10.0, 50.0)))
        .provider(AutoPilotProvider)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut turn_rx = handle.subscribe(Topic::Turn);
    let mut combat_rx = handle.subscribe(Topic::Combat);

    runtime.step().await.unwrap();

    let mut combat = Vec::new();
    while let Ok(event) = combat_rx.try_recv() {
        combat.push(event);
    }
    assert!(matches!(
        combat.as_slice(),
        [
            Event::Battle(BattleEvent::DamageApplied { amount: 42, .. }),
            Event::Battle(BattleEvent::EffectSpawned { .. }),
            Event::Battle(BattleEvent::EffectReleased { .. }),
        ]
    ));

    let mut turn = Vec::new();
    while let Ok(event) = turn_rx.try_recv() {
        turn.push(event);
    }
    assert!(matches!(
        turn.first(),
        Some(Event::Battle(BattleEvent::TurnStarted { turn: 1, .. }))
    ));
    assert!(turn.iter().any(|e| matches!(e, Event::AwaitingInput { .. })));
    assert!(matches!(
        turn.last(),
        Some(Event::Battle(BattleEvent::TurnEnded { .. }))
    ));
}

#[tokio::test]
async fn abandon_unblocks_a_waiting_runtime() {
    let mut runtime = Runtime::builder()
        .config(instant())
        .setup(duel(
            fighter("Hugo", 100, 50.0, 0.0, 100.0),
            fighter("Slime", 100, 10.0, 10.0, 50.0),
        ))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut battle_rx = handle.subscribe(Topic::Battle);

    let task = tokio::spawn(async move { runtime.run().await });
    let outcome = handle.abandon().await.unwrap();
    assert!(outcome.abandoned);
    assert!(!outcome.victory);

    let finished = task.await.unwrap().unwrap();
    assert_eq!(finished, outcome);
    assert!(matches!(
        battle_rx.recv().await.unwrap(),
        Event::Battle(BattleEvent::BattleEnded { abandoned: true, .. })
    ));
}

#[tokio::test]
async fn turn_limit_abandons_the_battle() {
    let config = RuntimeConfig {
        max_turns: Some(3),
        ..instant()
    };
    let mut runtime = Runtime::builder()
        .config(config)
        .setup(duel(
            fighter("Hugo", 10_000, 5.0, 0.0, 100.0),
            fighter("Golem", 10_000, 5.0, 0.0, 100.0),
        ))
        .provider(AutoPilotProvider)
        .build()
        .await
        .unwrap();

    let outcome = runtime.run().await.unwrap();
    assert!(outcome.abandoned);
    assert_eq!(outcome.turn_count, 3);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shipped_content_plays_to_the_end() {
    let bundle = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../battle/content/data"))
        .load_bundle()
        .unwrap();
    let setup = BattleSetup::new(Arc::new(bundle.roster), Arc::new(bundle.spawns))
        .with_equipment(Arc::new(bundle.equipment))
        .with_config(bundle.config)
        .with_combos(bundle.combos)
        .with_seed(42);
    let config = RuntimeConfig {
        max_turns: Some(2_000),
        ..instant()
    };
    let mut runtime = Runtime::builder()
        .config(config)
        .setup(setup)
        .provider(AutoPilotProvider)
        .build()
        .await
        .unwrap();

    let outcome = runtime.run().await.unwrap();
    assert!(outcome.turn_count > 0);
    assert!(outcome.damage.allies > 0);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn building_requires_a_valid_setup() {
    let missing = Runtime::builder().build().await;
    assert!(matches!(missing, Err(RuntimeError::MissingSetup)));

    let no_enemies = BattleSetup::new(
        Arc::new(RosterSnapshot::new(
            vec![fighter("Hugo", 100, 10.0, 0.0, 100.0)],
            Vec::new(),
        )),
        Arc::new(SpawnLayout::lines(4, 1, 2.0, 10.0)),
    );
    let err = Runtime::builder().setup(no_enemies).build().await;
    assert!(matches!(err, Err(RuntimeError::Setup(_))));
}
