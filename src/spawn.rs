//! Spawn director: weighted enemy choice, off-screen placement and the
//! per-wave spawn budget.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::entities::{
    Behavior, Enemy, EnemyFacing, EnemyId, EnemyKind, RangedState, Vec2, World,
    RANGED_ENGAGEMENT_RANGE, RANGED_SHOOT_COOLDOWN_MS,
};
use crate::error::ConfigError;
use crate::timing::Cooldown;
use crate::waves::{validate_record, ActiveWave, WaveRecord};

/// Spawn just above / below the play area.
pub const SPAWN_MARGIN_VERTICAL: f32 = 50.0;
/// Spawn just left / right of the play area.
pub const SPAWN_MARGIN_HORIZONTAL: f32 = 90.0;

// ── Weighted roster ───────────────────────────────────────────────────────────

/// The enemy kinds a wave may spawn, with their relative weights.
#[derive(Clone, Debug)]
pub struct Roster {
    kinds: Vec<EnemyKind>,
    dist: WeightedIndex<f64>,
}

impl Roster {
    pub fn new(wave: usize, kinds: &[EnemyKind], weights: &[f64]) -> Result<Self, ConfigError> {
        validate_record(
            wave,
            &WaveRecord {
                name: String::new(),
                kill_target: 1,
                enemy_types: kinds.to_vec(),
                weights: weights.to_vec(),
            },
        )?;
        let dist = WeightedIndex::new(weights.iter().copied()).map_err(|_| {
            ConfigError::InvalidWeight {
                wave,
                weight: weights.iter().copied().fold(0.0, f64::max),
            }
        })?;
        Ok(Self {
            kinds: kinds.to_vec(),
            dist,
        })
    }

    pub fn kinds(&self) -> &[EnemyKind] {
        &self.kinds
    }

    pub fn pick(&self, rng: &mut impl Rng) -> EnemyKind {
        self.kinds[self.dist.sample(rng)]
    }
}

// ── Enemy factory ─────────────────────────────────────────────────────────────

/// Build an enemy of `kind` with its archetype stats.
pub fn new_enemy(kind: EnemyKind, id: EnemyId, pos: Vec2, now_ms: u64) -> Enemy {
    let p = kind.params();
    let behavior = match kind {
        EnemyKind::Taco | EnemyKind::Burger => Behavior::Pursue,
        EnemyKind::Chips => Behavior::Standoff(RangedState {
            can_move: true,
            can_shoot: false,
            shoot_cooldown: Cooldown::armed(RANGED_SHOOT_COOLDOWN_MS, now_ms),
            engagement_range: RANGED_ENGAGEMENT_RANGE,
        }),
    };
    Enemy {
        id,
        kind,
        pos,
        width: p.width,
        height: p.height,
        facing: EnemyFacing::Right,
        max_health: p.max_health,
        health: p.max_health,
        speed: p.speed,
        damage: p.damage,
        score_value: p.score_value,
        behavior,
        death_ticks: 0,
        death_anim_finished: false,
    }
}

/// Pick a point just outside one of the four screen edges.
///
/// First coin: top/bottom edge (random x) or left/right edge (random y).
/// Second coin: which of the two.
pub fn spawn_position(rng: &mut impl Rng, width: f32, height: f32) -> Vec2 {
    let horizontal_edge = rng.gen_bool(0.5);
    let first_side = rng.gen_bool(0.5);
    if horizontal_edge {
        let x = rng.gen_range(0..=width as i32) as f32;
        let y = if first_side {
            -SPAWN_MARGIN_VERTICAL
        } else {
            height + SPAWN_MARGIN_VERTICAL
        };
        Vec2::new(x, y)
    } else {
        let y = rng.gen_range(0..=height as i32) as f32;
        let x = if first_side {
            -SPAWN_MARGIN_HORIZONTAL
        } else {
            width + SPAWN_MARGIN_HORIZONTAL
        };
        Vec2::new(x, y)
    }
}

// ── Director ──────────────────────────────────────────────────────────────────

/// Spawn one enemy if the cooldown has elapsed and the wave allows it.
pub fn run(
    world: &mut World,
    wave: &ActiveWave,
    wave_count: usize,
    rng: &mut impl Rng,
    now_ms: u64,
) -> Option<(EnemyId, EnemyKind)> {
    let progress = &world.player.wave;
    if !progress.may_spawn(wave.record.kill_target, wave_count) {
        return None;
    }
    if !world.spawn_cooldown.try_trigger(now_ms) {
        return None;
    }

    let kind = wave.roster.pick(rng);
    let pos = spawn_position(rng, world.width, world.height);
    let id = world.alloc_enemy_id();
    world.enemies.push(new_enemy(kind, id, pos, now_ms));
    world.player.wave.enemies_spawned += 1;
    Some((id, kind))
}
