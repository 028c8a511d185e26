//! Collision and damage resolution.
//!
//! Every pairing is re-tested from scratch each tick with AABB overlap.
//! Entities hit during a scan are only flagged; the collections are
//! compacted once the scan is over.

use crate::compute::FrameEvent;
use crate::entities::{Enemy, Player, World, BULLET_DAMAGE, DEATH_ANIM_TICKS};

// ── Damage ────────────────────────────────────────────────────────────────────

/// Apply damage to an enemy.  On the hit that takes it to zero the player is
/// credited the score and the kill; returns `true` on that hit only.
pub fn damage_enemy(enemy: &mut Enemy, amount: i32, player: &mut Player) -> bool {
    if !enemy.is_alive() {
        return false;
    }
    enemy.health = (enemy.health - amount).max(0);
    if enemy.is_alive() {
        return false;
    }
    player.score += enemy.score_value;
    player.wave.enemies_killed += 1;
    true
}

/// Health never drops below zero.  Every hit arms the flash.
pub fn damage_player(player: &mut Player, amount: i32) {
    player.health = (player.health - amount).max(0);
    player.flash.arm();
}

/// Damage gated by the shared invulnerability cooldown.  The first source to
/// land in a window wins; the timestamp moves immediately so later sources in
/// the same tick are refused.
fn try_hit_player(player: &mut Player, amount: i32, now_ms: u64) -> bool {
    if !player.hit_cooldown.try_trigger(now_ms) {
        return false;
    }
    damage_player(player, amount);
    true
}

// ── Pair scans ────────────────────────────────────────────────────────────────

/// Player bullets against live enemies.  A bullet is spent on the first
/// live enemy it overlaps.
pub fn bullets_vs_enemies(world: &mut World) -> Vec<FrameEvent> {
    let mut events = Vec::new();
    let mut spent = vec![false; world.bullets.len()];

    for (bi, bullet) in world.bullets.iter().enumerate() {
        let hitbox = bullet.bounds();
        let Some(enemy) = world
            .enemies
            .iter_mut()
            .find(|e| e.is_alive() && e.bounds().overlaps(&hitbox))
        else {
            continue;
        };
        spent[bi] = true;
        if damage_enemy(enemy, BULLET_DAMAGE, &mut world.player) {
            events.push(FrameEvent::EnemyKilled {
                id: enemy.id,
                kind: enemy.kind,
                score: enemy.score_value,
            });
        }
    }

    world.bullets = std::mem::take(&mut world.bullets)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent[*i])
        .map(|(_, b)| b)
        .collect();
    events
}

/// Contact damage from live enemies.
pub fn enemies_vs_player(world: &mut World, now_ms: u64) -> Vec<FrameEvent> {
    let mut events = Vec::new();
    let player_box = world.player.bounds();
    for enemy in &world.enemies {
        if !enemy.is_alive() || !enemy.bounds().overlaps(&player_box) {
            continue;
        }
        if try_hit_player(&mut world.player, enemy.damage, now_ms) {
            events.push(FrameEvent::PlayerDamaged {
                amount: enemy.damage,
                health: world.player.health,
            });
        }
    }
    events
}

/// Enemy bullets against the player.  A bullet is only consumed when its hit
/// gets through the invulnerability window.
pub fn enemy_bullets_vs_player(world: &mut World, now_ms: u64) -> Vec<FrameEvent> {
    let mut events = Vec::new();
    let player_box = world.player.bounds();
    let mut spent = vec![false; world.enemy_bullets.len()];

    for (bi, bullet) in world.enemy_bullets.iter().enumerate() {
        if !bullet.bounds().overlaps(&player_box) {
            continue;
        }
        if try_hit_player(&mut world.player, bullet.damage, now_ms) {
            spent[bi] = true;
            events.push(FrameEvent::PlayerDamaged {
                amount: bullet.damage,
                health: world.player.health,
            });
        }
    }

    world.enemy_bullets = std::mem::take(&mut world.enemy_bullets)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent[*i])
        .map(|(_, b)| b)
        .collect();
    events
}

// ── Death animation & purge ───────────────────────────────────────────────────

/// Advance every dying enemy's animation by one tick, then drop those whose
/// animation has run its full length.  Returns how many were removed.
pub fn advance_death_animations(world: &mut World) -> usize {
    for enemy in world.enemies.iter_mut().filter(|e| !e.is_alive()) {
        if enemy.death_anim_finished {
            continue;
        }
        enemy.death_ticks += 1;
        if enemy.death_ticks >= DEATH_ANIM_TICKS {
            enemy.death_anim_finished = true;
        }
    }
    let before = world.enemies.len();
    world.enemies.retain(|e| e.is_alive() || !e.death_anim_finished);
    before - world.enemies.len()
}
