//! Per-tick movement: player input resolution, enemy steering, projectiles.

use std::f32::consts::SQRT_2;

use crate::config::BulletAim;
use crate::entities::{
    Behavior, Bullet, DirFlags, Enemy, EnemyBullet, EnemyFacing, Facing, Player, Vec2, World,
    BULLET_SPEED, ENEMY_BULLET_DAMAGE, ENEMY_BULLET_SPEED, PLAYER_HEIGHT, PLAYER_WIDTH,
    RANGED_ONSCREEN_INSET,
};

// ── Player ────────────────────────────────────────────────────────────────────

/// Velocity and facing for the held keys.
///
/// Opposing keys on an axis cancel.  A wall flag blocks motion toward that
/// wall.  When both axes move each component is `speed / √2`.  Facing is
/// `None` when the player stands still, meaning "keep the old facing".
pub fn resolve_velocity(pressed: DirFlags, collided: DirFlags, speed: f32) -> (Vec2, Option<Facing>) {
    let h: i8 = if pressed.left && !pressed.right && !collided.left {
        -1
    } else if pressed.right && !pressed.left && !collided.right {
        1
    } else {
        0
    };
    let v: i8 = if pressed.up && !pressed.down && !collided.up {
        -1
    } else if pressed.down && !pressed.up && !collided.down {
        1
    } else {
        0
    };

    let facing = match (h, v) {
        (-1, -1) => Some(Facing::UpLeft),
        (1, -1) => Some(Facing::UpRight),
        (-1, 1) => Some(Facing::DownLeft),
        (1, 1) => Some(Facing::DownRight),
        (-1, 0) => Some(Facing::Left),
        (1, 0) => Some(Facing::Right),
        (0, -1) => Some(Facing::Up),
        (0, 1) => Some(Facing::Down),
        _ => None,
    };

    let step = if h != 0 && v != 0 { speed / SQRT_2 } else { speed };
    (Vec2::new(h as f32 * step, v as f32 * step), facing)
}

/// Wall contact for a sprite at `pos`.  Right wins over left, down over up.
pub fn wall_flags(pos: Vec2, width: f32, height: f32) -> DirFlags {
    let right = pos.x > width - PLAYER_WIDTH;
    let down = pos.y > height - PLAYER_HEIGHT;
    DirFlags {
        right,
        left: !right && pos.x < 0.0,
        down,
        up: !down && pos.y < 0.0,
    }
}

pub fn move_player(player: &mut Player, width: f32, height: f32) {
    let (velocity, facing) = resolve_velocity(player.pressed, player.collided, player.speed);
    player.velocity = velocity;
    if let Some(facing) = facing {
        player.facing = facing;
    }
    player.pos += velocity;
    player.collided = wall_flags(player.pos, width, height);
}

// ── Player bullets ────────────────────────────────────────────────────────────

/// Strictly inside the play area.  Projectiles outside it are dropped.
pub fn inside(p: Vec2, width: f32, height: f32) -> bool {
    p.x > 0.0 && p.x < width && p.y > 0.0 && p.y < height
}

/// Any facing with a sideways component fires horizontally, diagonals included.
pub fn travels_horizontally(facing: Facing) -> bool {
    !matches!(facing, Facing::Up | Facing::Down)
}

pub fn bullet_speed(facing: Facing) -> f32 {
    match facing {
        Facing::Left | Facing::Up | Facing::UpLeft | Facing::DownLeft => -BULLET_SPEED,
        Facing::Right | Facing::Down | Facing::UpRight | Facing::DownRight => BULLET_SPEED,
    }
}

/// Bullet leaving the centre of the player sprite.
pub fn new_bullet(player: &Player) -> Bullet {
    let c = player.center();
    Bullet {
        pos: Vec2::new(c.x.trunc(), c.y.trunc()),
        facing: player.facing,
        speed: bullet_speed(player.facing),
    }
}

pub fn move_bullets(world: &mut World) {
    for b in &mut world.bullets {
        if travels_horizontally(b.facing) {
            b.pos.x += b.speed;
        } else {
            b.pos.y += b.speed;
        }
    }
    let (w, h) = (world.width, world.height);
    world.bullets.retain(|b| inside(b.pos, w, h));
}

// ── Enemies ───────────────────────────────────────────────────────────────────

fn on_screen(pos: Vec2, width: f32, height: f32) -> bool {
    pos.x >= RANGED_ONSCREEN_INSET
        && pos.x <= width - RANGED_ONSCREEN_INSET
        && pos.y >= RANGED_ONSCREEN_INSET
        && pos.y <= height - RANGED_ONSCREEN_INSET
}

/// Chips-style shot from `owner`'s centre toward `target`.
pub fn new_enemy_bullet(owner: &Enemy, target: Vec2) -> EnemyBullet {
    let origin = owner.center();
    let rel = target.minus(origin);
    EnemyBullet {
        pos: origin,
        owner: owner.id,
        direction: rel.normalized().unwrap_or(Vec2::ZERO),
        speed: ENEMY_BULLET_SPEED,
        damage: ENEMY_BULLET_DAMAGE,
        angle_deg: rel.x.atan2(rel.y).to_degrees(),
    }
}

/// Move one enemy toward the player.  Returns a bullet if a ranged enemy fired.
pub fn steer_enemy(
    enemy: &mut Enemy,
    player: &Player,
    width: f32,
    height: f32,
    now_ms: u64,
) -> Option<EnemyBullet> {
    if !enemy.is_alive() {
        return None;
    }

    let delta = player.pos.minus(enemy.pos);
    let distance = delta.length();
    let step = delta.normalized().map(|dir| dir.scaled(enemy.speed));

    let mut fire = false;
    match &mut enemy.behavior {
        Behavior::Pursue => {
            if let Some(step) = step {
                enemy.pos += step;
            }
        }
        Behavior::Standoff(ranged) => {
            if distance <= ranged.engagement_range && on_screen(enemy.pos, width, height) {
                ranged.can_move = false;
                ranged.can_shoot = true;
            } else if ranged.can_move {
                if let Some(step) = step {
                    enemy.pos += step;
                }
            }
            fire = ranged.can_shoot && ranged.shoot_cooldown.try_trigger(now_ms);
        }
    }

    enemy.facing = if player.pos.x > enemy.pos.x {
        EnemyFacing::Right
    } else {
        EnemyFacing::Left
    };

    fire.then(|| new_enemy_bullet(enemy, player.center()))
}

pub fn steer_enemies(world: &mut World, now_ms: u64) -> usize {
    let (w, h) = (world.width, world.height);
    let player = &world.player;
    let mut fired = Vec::new();
    for enemy in &mut world.enemies {
        if let Some(bullet) = steer_enemy(enemy, player, w, h, now_ms) {
            fired.push(bullet);
        }
    }
    let count = fired.len();
    world.enemy_bullets.extend(fired);
    count
}

pub fn move_enemy_bullets(world: &mut World, aim: BulletAim) {
    let target = world.player.center();
    for b in &mut world.enemy_bullets {
        if aim == BulletAim::Homing {
            if let Some(dir) = target.minus(b.pos).normalized() {
                b.direction = dir;
            }
        }
        b.pos += b.direction.scaled(b.speed);
    }
    let (w, h) = (world.width, world.height);
    world.enemy_bullets.retain(|b| inside(b.pos, w, h));
}
