use std::io::Write;

use taco_invasion::entities::EnemyKind;
use taco_invasion::error::ConfigError;
use taco_invasion::waves::*;

const TWO_WAVES: &str = r#"{
  "WaveData": [
    {
      "WaveName": "Opening",
      "EnemiesToKill": 5,
      "EnemyTypes": ["TacoEnemy"],
      "EnemyTypesWeights": [1]
    },
    {
      "WaveName": "Endless",
      "EnemiesToKill": 1,
      "EnemyTypes": ["TacoEnemy", "BurgerEnemy", "ChipsEnemy"],
      "EnemyTypesWeights": [1, 2.5, 1]
    }
  ]
}"#;

fn record(kill_target: u32, types: Vec<EnemyKind>, weights: Vec<f64>) -> WaveRecord {
    WaveRecord {
        name: "Test".to_string(),
        kill_target,
        enemy_types: types,
        weights,
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[test]
fn parses_wave_file() {
    let table = WaveTable::from_json(TWO_WAVES).unwrap();
    assert_eq!(table.wave_count(), 2);

    let first = table.wave(1).unwrap();
    assert_eq!(first.name, "Opening");
    assert_eq!(first.kill_target, 5);
    assert_eq!(first.enemy_types, vec![EnemyKind::Taco]);

    let last = table.wave(2).unwrap();
    assert_eq!(last.enemy_types.len(), 3);
    assert_eq!(last.weights, vec![1.0, 2.5, 1.0]);
}

#[test]
fn wave_numbers_are_one_based() {
    let table = WaveTable::from_json(TWO_WAVES).unwrap();
    assert!(matches!(
        table.wave(0),
        Err(ConfigError::WaveOutOfRange { wave: 0, count: 2 })
    ));
    assert!(matches!(
        table.wave(3),
        Err(ConfigError::WaveOutOfRange { wave: 3, count: 2 })
    ));
}

#[test]
fn unknown_enemy_tag_is_a_parse_error() {
    let json = TWO_WAVES.replace("\"TacoEnemy\"]", "\"PizzaEnemy\"]");
    assert!(matches!(
        WaveTable::from_json(&json),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn empty_table_is_rejected() {
    assert!(matches!(
        WaveTable::from_json(r#"{"WaveData": []}"#),
        Err(ConfigError::NoWaves)
    ));
}

#[test]
fn invalid_records_are_rejected() {
    let err = WaveTable::new(vec![record(0, vec![EnemyKind::Taco], vec![1.0])]).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroKillTarget { wave: 1 }));

    let err = WaveTable::new(vec![
        record(3, vec![EnemyKind::Taco], vec![1.0]),
        record(3, vec![], vec![]),
    ])
    .unwrap_err();
    assert!(matches!(err, ConfigError::EmptyRoster { wave: 2 }));

    let err = WaveTable::new(vec![record(3, vec![EnemyKind::Taco, EnemyKind::Chips], vec![1.0])])
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::WeightCountMismatch {
            wave: 1,
            types: 2,
            weights: 1
        }
    ));

    let err = WaveTable::new(vec![record(3, vec![EnemyKind::Taco], vec![0.0])]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidWeight { wave: 1, .. }));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_WAVES.as_bytes()).unwrap();
    let table = WaveTable::from_path(file.path()).unwrap();
    assert_eq!(table.wave_count(), 2);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WaveTable::from_path(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn bundled_wave_data_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/WaveData.json");
    let table = WaveTable::from_path(path).unwrap();
    assert!(table.wave_count() >= 2);
}

// ── ActiveWave ────────────────────────────────────────────────────────────────

#[test]
fn active_wave_reloads_only_on_change() {
    let table = WaveTable::from_json(TWO_WAVES).unwrap();
    let mut active = ActiveWave::load(&table, 1).unwrap();
    assert_eq!(active.record.name, "Opening");
    assert!(!active.refresh(&table, 1).unwrap());
    assert!(active.refresh(&table, 2).unwrap());
    assert_eq!(active.number, 2);
    assert_eq!(active.roster.kinds().len(), 3);
}

// ── WaveProgress ──────────────────────────────────────────────────────────────

#[test]
fn completion_then_strict_pause() {
    let mut p = WaveProgress::new();
    p.enemies_spawned = 5;
    p.enemies_killed = 5;

    assert_eq!(
        p.update(5, 3, 1000, 100),
        Some(WaveTransition::Completed { wave: 1 })
    );
    assert!(p.completed);
    assert_eq!(p.completed_at, Some(100));

    assert_eq!(p.update(5, 3, 1000, 1100), None);
    assert_eq!(
        p.update(5, 3, 1000, 1101),
        Some(WaveTransition::Advanced { from: 1, to: 2 })
    );
    assert_eq!(p.number, 2);
    assert_eq!(p.enemies_spawned, 0);
    assert_eq!(p.enemies_killed, 0);
    assert!(!p.completed);
    assert_eq!(p.completed_at, None);
}

#[test]
fn completion_latches_once() {
    let mut p = WaveProgress::new();
    p.enemies_killed = 5;
    p.update(5, 3, 1000, 100);
    assert_eq!(p.update(5, 3, 1000, 500), None);
    assert_eq!(p.completed_at, Some(100));
}

#[test]
fn unfinished_wave_does_not_advance() {
    let mut p = WaveProgress::new();
    p.enemies_killed = 4;
    assert_eq!(p.update(5, 3, 1000, 100_000), None);
    assert_eq!(p.number, 1);
}

#[test]
fn spawn_budget_matches_kill_target() {
    let mut p = WaveProgress::new();
    p.enemies_spawned = 4;
    assert!(p.may_spawn(5, 3));
    p.enemies_spawned = 5;
    assert!(!p.may_spawn(5, 3));
}

#[test]
fn last_wave_is_endless() {
    let mut p = WaveProgress::new();
    p.number = 3;
    p.enemies_spawned = 1000;
    p.enemies_killed = 1000;
    assert!(p.is_endless(3));
    assert_eq!(p.phase(3), WavePhase::Endless);
    assert!(p.may_spawn(5, 3));
    assert_eq!(p.update(5, 3, 1000, 100_000), None);
    assert_eq!(p.fraction(5, 3), 1.0);
}

#[test]
fn progress_fraction() {
    let mut p = WaveProgress::new();
    assert_eq!(p.phase(3), WavePhase::InWave(1));
    p.enemies_killed = 2;
    assert!((p.fraction(8, 3) - 0.25).abs() < 1e-6);
    p.enemies_killed = 9;
    assert_eq!(p.fraction(8, 3), 1.0);
}
