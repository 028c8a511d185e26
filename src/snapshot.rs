//! Read-only view of a tick, for whatever draws the game.
//!
//! Built fresh on request; holds copies, never references into the world.

use crate::config::Tunables;
use crate::entities::{
    Enemy, EnemyFacing, EnemyId, EnemyKind, Facing, Vec2, World,
};
use crate::waves::{ActiveWave, WavePhase};

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing: Facing,
    /// Drawn faded while the hit flash is on.
    pub translucent: bool,
    pub dead: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthTier {
    Full,
    Damaged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemySprite {
    Alive { tier: HealthTier, facing: EnemyFacing },
    /// Index into the 9-frame death strip.
    Dying { frame: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub sprite: EnemySprite,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBulletView {
    pub pos: Vec2,
    pub angle_deg: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveView {
    pub number: usize,
    pub count: usize,
    pub name: String,
    /// 0.0..=1.0; always 1.0 in the endless wave.
    pub progress: f32,
    pub completed: bool,
    pub endless: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeathScreen {
    Hidden,
    /// Dead, but the screen's delay has not run out yet.
    Pending,
    Shown { score: u32, highscore: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<Vec2>,
    pub enemy_bullets: Vec<EnemyBulletView>,
    pub score: u32,
    pub health: i32,
    pub max_health: i32,
    pub wave: WaveView,
    pub death_screen: DeathScreen,
}

fn enemy_view(e: &Enemy) -> EnemyView {
    let sprite = if e.is_alive() {
        EnemySprite::Alive {
            tier: if e.health == e.max_health {
                HealthTier::Full
            } else {
                HealthTier::Damaged
            },
            facing: e.facing,
        }
    } else {
        EnemySprite::Dying {
            frame: e.death_frame(),
        }
    };
    EnemyView {
        id: e.id,
        kind: e.kind,
        pos: e.pos,
        width: e.width,
        height: e.height,
        sprite,
    }
}

pub fn build(
    world: &World,
    wave: &ActiveWave,
    wave_count: usize,
    highscore: u32,
    tunables: &Tunables,
    now_ms: u64,
) -> RenderSnapshot {
    let p = &world.player;

    let death_screen = match p.died_at {
        _ if !p.dead => DeathScreen::Hidden,
        Some(t) if now_ms.saturating_sub(t) > tunables.death_screen_delay_ms => {
            DeathScreen::Shown {
                score: p.score,
                highscore: highscore.max(p.score),
            }
        }
        _ => DeathScreen::Pending,
    };

    RenderSnapshot {
        frame: world.frame,
        width: world.width,
        height: world.height,
        player: PlayerView {
            pos: p.pos,
            facing: p.facing,
            translucent: !p.dead && p.flash.translucent(),
            dead: p.dead,
        },
        enemies: world
            .enemies
            .iter()
            .filter(|e| !e.death_anim_finished)
            .map(enemy_view)
            .collect(),
        bullets: world.bullets.iter().map(|b| b.pos).collect(),
        enemy_bullets: world
            .enemy_bullets
            .iter()
            .map(|b| EnemyBulletView {
                pos: b.pos,
                angle_deg: b.angle_deg,
            })
            .collect(),
        score: p.score,
        health: p.health,
        max_health: p.max_health,
        wave: WaveView {
            number: p.wave.number,
            count: wave_count,
            name: wave.record.name.clone(),
            progress: p.wave.fraction(wave.record.kill_target, wave_count),
            completed: p.wave.completed,
            endless: p.wave.phase(wave_count) == WavePhase::Endless,
        },
        death_screen,
    }
}
