use taco_invasion::collision::*;
use taco_invasion::compute::{init_world, FrameEvent};
use taco_invasion::config::Tunables;
use taco_invasion::entities::*;
use taco_invasion::spawn::new_enemy;

fn make_world() -> World {
    init_world(&Tunables::default(), 0)
}

fn add_enemy(w: &mut World, kind: EnemyKind, x: f32, y: f32) -> EnemyId {
    let id = w.alloc_enemy_id();
    w.enemies.push(new_enemy(kind, id, Vec2::new(x, y), 0));
    id
}

fn add_bullet(w: &mut World, x: f32, y: f32) {
    w.bullets.push(Bullet {
        pos: Vec2::new(x, y),
        facing: Facing::Right,
        speed: BULLET_SPEED,
    });
}

// ── damage_enemy ──────────────────────────────────────────────────────────────

#[test]
fn killing_hit_credits_score_and_kill() {
    let mut w = make_world();
    let mut taco = new_enemy(EnemyKind::Taco, EnemyId(0), Vec2::ZERO, 0);
    assert!(damage_enemy(&mut taco, 1, &mut w.player));
    assert_eq!(w.player.score, 1);
    assert_eq!(w.player.wave.enemies_killed, 1);

    // Already dead: nothing more.
    assert!(!damage_enemy(&mut taco, 1, &mut w.player));
    assert_eq!(w.player.score, 1);
    assert_eq!(taco.health, 0);
}

#[test]
fn overkill_clamps_health_at_zero() {
    let mut w = make_world();
    let mut burger = new_enemy(EnemyKind::Burger, EnemyId(0), Vec2::ZERO, 0);
    assert!(damage_enemy(&mut burger, 5, &mut w.player));
    assert_eq!(burger.health, 0);
    assert_eq!(w.player.score, 2);
}

// ── bullets_vs_enemies ────────────────────────────────────────────────────────

#[test]
fn burger_takes_two_bullets() {
    let mut w = make_world();
    let id = add_enemy(&mut w, EnemyKind::Burger, 1000.0, 500.0);

    add_bullet(&mut w, 1010.0, 510.0);
    let events = bullets_vs_enemies(&mut w);
    assert!(events.is_empty());
    assert!(w.bullets.is_empty());
    assert_eq!(w.enemy(id).unwrap().health, 1);
    assert_eq!(w.player.score, 0);

    add_bullet(&mut w, 1010.0, 510.0);
    let events = bullets_vs_enemies(&mut w);
    assert_eq!(
        events,
        vec![FrameEvent::EnemyKilled {
            id,
            kind: EnemyKind::Burger,
            score: 2
        }]
    );
    assert_eq!(w.player.score, 2);
    assert_eq!(w.player.wave.enemies_killed, 1);
}

#[test]
fn bullet_is_spent_on_one_enemy() {
    let mut w = make_world();
    let first = add_enemy(&mut w, EnemyKind::Taco, 1000.0, 500.0);
    let second = add_enemy(&mut w, EnemyKind::Taco, 1005.0, 505.0);
    add_bullet(&mut w, 1010.0, 510.0);

    bullets_vs_enemies(&mut w);
    assert!(!w.enemy(first).unwrap().is_alive());
    assert!(w.enemy(second).unwrap().is_alive());
    assert_eq!(w.player.score, 1);
}

#[test]
fn missed_bullets_survive() {
    let mut w = make_world();
    add_enemy(&mut w, EnemyKind::Taco, 1000.0, 500.0);
    add_bullet(&mut w, 100.0, 100.0);
    add_bullet(&mut w, 1010.0, 510.0);
    bullets_vs_enemies(&mut w);
    assert_eq!(w.bullets.len(), 1);
    assert_eq!(w.bullets[0].pos, Vec2::new(100.0, 100.0));
}

#[test]
fn dead_enemies_absorb_nothing() {
    let mut w = make_world();
    let id = add_enemy(&mut w, EnemyKind::Taco, 1000.0, 500.0);
    w.enemies[0].health = 0;
    add_bullet(&mut w, 1010.0, 510.0);
    let events = bullets_vs_enemies(&mut w);
    assert!(events.is_empty());
    assert_eq!(w.bullets.len(), 1);
    assert_eq!(w.enemy(id).unwrap().health, 0);
}

// ── Player damage ─────────────────────────────────────────────────────────────

#[test]
fn contact_damage_respects_invulnerability() {
    let mut w = make_world();
    let pos = w.player.pos;
    add_enemy(&mut w, EnemyKind::Taco, pos.x, pos.y);

    let events = enemies_vs_player(&mut w, 1000);
    assert_eq!(
        events,
        vec![FrameEvent::PlayerDamaged {
            amount: 1,
            health: 2
        }]
    );
    assert!(enemies_vs_player(&mut w, 1010).is_empty());
    assert!(enemies_vs_player(&mut w, 1749).is_empty());
    assert_eq!(w.player.health, 2);

    enemies_vs_player(&mut w, 1750);
    assert_eq!(w.player.health, 1);
}

#[test]
fn two_sources_in_one_tick_hit_once() {
    let mut w = make_world();
    let pos = w.player.pos;
    add_enemy(&mut w, EnemyKind::Taco, pos.x, pos.y);
    add_enemy(&mut w, EnemyKind::Burger, pos.x, pos.y);
    let chips = new_enemy(EnemyKind::Chips, EnemyId(99), Vec2::ZERO, 0);
    let mut shot = taco_invasion::movement::new_enemy_bullet(&chips, w.player.center());
    shot.pos = w.player.center();
    w.enemy_bullets.push(shot);

    let hits = enemies_vs_player(&mut w, 1000).len() + enemy_bullets_vs_player(&mut w, 1000).len();
    assert_eq!(hits, 1);
    assert_eq!(w.player.health, 2);
    // The bullet was refused, so it is still in flight.
    assert_eq!(w.enemy_bullets.len(), 1);
}

#[test]
fn enemy_bullet_is_consumed_on_hit() {
    let mut w = make_world();
    let chips = new_enemy(EnemyKind::Chips, EnemyId(0), Vec2::ZERO, 0);
    let mut shot = taco_invasion::movement::new_enemy_bullet(&chips, w.player.center());
    shot.pos = w.player.center();
    w.enemy_bullets.push(shot);

    let events = enemy_bullets_vs_player(&mut w, 0);
    assert_eq!(events.len(), 1);
    assert!(w.enemy_bullets.is_empty());
    assert_eq!(w.player.health, 2);
}

#[test]
fn player_health_never_goes_negative() {
    let mut w = make_world();
    w.player.health = 1;
    damage_player(&mut w.player, 2);
    assert_eq!(w.player.health, 0);
    assert!(w.player.flash.can_flash);
}

// ── Death animation ───────────────────────────────────────────────────────────

#[test]
fn dead_enemy_removed_after_full_animation() {
    let mut w = make_world();
    add_enemy(&mut w, EnemyKind::Taco, 100.0, 100.0);
    w.enemies[0].health = 0;

    for _ in 0..DEATH_ANIM_TICKS - 1 {
        assert_eq!(advance_death_animations(&mut w), 0);
    }
    assert_eq!(w.enemies.len(), 1);
    assert_eq!(w.enemies[0].death_frame(), DEATH_ANIM_FRAMES - 1);

    assert_eq!(advance_death_animations(&mut w), 1);
    assert!(w.enemies.is_empty());
}

#[test]
fn live_enemies_do_not_animate() {
    let mut w = make_world();
    add_enemy(&mut w, EnemyKind::Taco, 100.0, 100.0);
    for _ in 0..50 {
        advance_death_animations(&mut w);
    }
    assert_eq!(w.enemies.len(), 1);
    assert_eq!(w.enemies[0].death_ticks, 0);
}
