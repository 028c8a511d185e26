use rand::rngs::StdRng;
use rand::SeedableRng;

use taco_invasion::compute::init_world;
use taco_invasion::config::Tunables;
use taco_invasion::entities::*;
use taco_invasion::error::ConfigError;
use taco_invasion::spawn::*;
use taco_invasion::waves::{ActiveWave, WaveRecord, WaveTable};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn two_wave_table(kill_target: u32) -> WaveTable {
    WaveTable::new(vec![
        WaveRecord {
            name: "One".to_string(),
            kill_target,
            enemy_types: vec![EnemyKind::Taco],
            weights: vec![1.0],
        },
        WaveRecord {
            name: "Endless".to_string(),
            kill_target: 1,
            enemy_types: vec![EnemyKind::Burger],
            weights: vec![1.0],
        },
    ])
    .unwrap()
}

// ── Roster ────────────────────────────────────────────────────────────────────

#[test]
fn weighted_pick_converges_to_ratio() {
    let roster = Roster::new(1, &[EnemyKind::Taco, EnemyKind::Burger], &[1.0, 3.0]).unwrap();
    let mut rng = seeded_rng();
    let n = 20_000;
    let burgers = (0..n)
        .filter(|_| roster.pick(&mut rng) == EnemyKind::Burger)
        .count();
    let share = burgers as f64 / n as f64;
    assert!((share - 0.75).abs() < 0.02, "burger share {share}");
}

#[test]
fn single_kind_roster_always_picks_it() {
    let roster = Roster::new(1, &[EnemyKind::Chips], &[0.5]).unwrap();
    let mut rng = seeded_rng();
    assert!((0..100).all(|_| roster.pick(&mut rng) == EnemyKind::Chips));
}

#[test]
fn roster_rejects_bad_weights() {
    assert!(matches!(
        Roster::new(4, &[EnemyKind::Taco], &[1.0, 2.0]),
        Err(ConfigError::WeightCountMismatch { wave: 4, .. })
    ));
    assert!(matches!(
        Roster::new(4, &[EnemyKind::Taco], &[-1.0]),
        Err(ConfigError::InvalidWeight { wave: 4, .. })
    ));
    assert!(matches!(
        Roster::new(4, &[], &[]),
        Err(ConfigError::EmptyRoster { wave: 4 })
    ));
}

// ── Factory ───────────────────────────────────────────────────────────────────

#[test]
fn factory_uses_archetype_stats() {
    let burger = new_enemy(EnemyKind::Burger, EnemyId(3), Vec2::new(1.0, 2.0), 0);
    assert_eq!(burger.id, EnemyId(3));
    assert_eq!(burger.health, 2);
    assert_eq!(burger.max_health, 2);
    assert_eq!(burger.damage, 2);
    assert_eq!(burger.behavior, Behavior::Pursue);

    let chips = new_enemy(EnemyKind::Chips, EnemyId(4), Vec2::ZERO, 1000);
    match chips.behavior {
        Behavior::Standoff(r) => {
            assert!(r.can_move);
            assert!(!r.can_shoot);
            assert_eq!(r.engagement_range, 500.0);
            assert!(!r.shoot_cooldown.ready(3499));
            assert!(r.shoot_cooldown.ready(3500));
        }
        Behavior::Pursue => panic!("chips should stand off"),
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[test]
fn spawn_positions_sit_just_off_screen() {
    let mut rng = seeded_rng();
    let (w, h) = (1920.0, 1080.0);
    let mut edges = [0usize; 4];
    for _ in 0..400 {
        let p = spawn_position(&mut rng, w, h);
        if p.y == -SPAWN_MARGIN_VERTICAL || p.y == h + SPAWN_MARGIN_VERTICAL {
            assert!((0.0..=w).contains(&p.x), "{p:?}");
            edges[if p.y < 0.0 { 0 } else { 1 }] += 1;
        } else {
            assert!(
                p.x == -SPAWN_MARGIN_HORIZONTAL || p.x == w + SPAWN_MARGIN_HORIZONTAL,
                "{p:?}"
            );
            assert!((0.0..=h).contains(&p.y), "{p:?}");
            edges[if p.x < 0.0 { 2 } else { 3 }] += 1;
        }
    }
    assert!(edges.iter().all(|&n| n > 0), "{edges:?}");
}

// ── Director ──────────────────────────────────────────────────────────────────

#[test]
fn director_waits_for_cooldown() {
    let table = two_wave_table(5);
    let wave = ActiveWave::load(&table, 1).unwrap();
    let mut world = init_world(&Tunables::default(), 0);
    let mut rng = seeded_rng();

    assert!(run(&mut world, &wave, 2, &mut rng, 1499).is_none());
    let (id, kind) = run(&mut world, &wave, 2, &mut rng, 1500).unwrap();
    assert_eq!(kind, EnemyKind::Taco);
    assert_eq!(world.enemy(id).unwrap().kind, EnemyKind::Taco);
    assert!(run(&mut world, &wave, 2, &mut rng, 2999).is_none());
    assert!(run(&mut world, &wave, 2, &mut rng, 3000).is_some());
}

#[test]
fn scripted_wave_spawns_exactly_its_budget() {
    let table = two_wave_table(5);
    let wave = ActiveWave::load(&table, 1).unwrap();
    let mut world = init_world(&Tunables::default(), 0);
    let mut rng = seeded_rng();

    let spawned = (1..=20u64)
        .filter(|k| run(&mut world, &wave, 2, &mut rng, k * 1500).is_some())
        .count();
    assert_eq!(spawned, 5);
    assert_eq!(world.enemies.len(), 5);
    assert_eq!(world.player.wave.enemies_spawned, 5);
}

#[test]
fn endless_wave_keeps_spawning() {
    let table = two_wave_table(5);
    let wave = ActiveWave::load(&table, 2).unwrap();
    let mut world = init_world(&Tunables::default(), 0);
    world.player.wave.number = 2;
    let mut rng = seeded_rng();

    let spawned = (1..=20u64)
        .filter(|k| run(&mut world, &wave, 2, &mut rng, k * 1500).is_some())
        .count();
    assert_eq!(spawned, 20);
    assert!(world.enemies.iter().all(|e| e.kind == EnemyKind::Burger));
}
