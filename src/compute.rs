//! Frame orchestration.
//!
//! `Game` owns the `World` and its collaborators (wave source, highscore
//! store, RNG).  `Game::tick` runs one frame in a fixed phase order:
//! input, movement, firing, spawning, collisions, death animations, player
//! death, wave progression.  All randomness comes through the injected RNG
//! and all timing through the `now_ms` argument, so a seeded RNG and a list
//! of timestamps replay a game exactly.

use rand::Rng;

use crate::collision;
use crate::config::Tunables;
use crate::entities::{
    DirFlags, EnemyId, EnemyKind, Facing, Player, Vec2, World, PLAYER_HEIGHT, PLAYER_MAX_HEALTH,
    PLAYER_SPEED, PLAYER_WIDTH,
};
use crate::error::ConfigError;
use crate::highscore::HighscoreStore;
use crate::movement;
use crate::snapshot::{self, RenderSnapshot};
use crate::spawn;
use crate::timing::{Cooldown, Flash};
use crate::waves::{ActiveWave, WaveProgress, WaveSource, WaveTransition};

/// Held keys for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

/// Something that happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    PlayerFired,
    EnemySpawned { id: EnemyId, kind: EnemyKind },
    EnemyFired { count: usize },
    EnemyKilled { id: EnemyId, kind: EnemyKind, score: u32 },
    PlayerDamaged { amount: i32, health: i32 },
    PlayerDied { score: u32 },
    NewHighscore { score: u32 },
    WaveCompleted { wave: usize },
    WaveStarted { wave: usize, name: String },
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Top-left corner that centres the player sprite in the play area.
pub fn centered_position(width: f32, height: f32) -> Vec2 {
    Vec2::new(width / 2.0 - PLAYER_WIDTH / 2.0, height / 2.0 - PLAYER_HEIGHT / 2.0)
}

pub fn new_player(tunables: &Tunables) -> Player {
    Player {
        pos: centered_position(tunables.width, tunables.height),
        velocity: Vec2::ZERO,
        pressed: DirFlags::default(),
        collided: DirFlags::default(),
        facing: Facing::Right,
        speed: PLAYER_SPEED,
        max_health: PLAYER_MAX_HEALTH,
        health: PLAYER_MAX_HEALTH,
        dead: false,
        died_at: None,
        hit_cooldown: Cooldown::new(tunables.hit_cooldown_ms),
        fire_cooldown: Cooldown::new(tunables.fire_cooldown_ms),
        flash: Flash::new(tunables.flash_toggle_ms),
        score: 0,
        wave: WaveProgress::new(),
    }
}

/// Fresh world.  The spawn cooldown starts at `now_ms`, so the first enemy
/// arrives one full cooldown into the game.
pub fn init_world(tunables: &Tunables, now_ms: u64) -> World {
    World {
        player: new_player(tunables),
        enemies: Vec::new(),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        spawn_cooldown: Cooldown::armed(tunables.spawn_cooldown_ms, now_ms),
        width: tunables.width,
        height: tunables.height,
        frame: 0,
        next_enemy_id: 0,
    }
}

fn apply_input(player: &mut Player, input: &InputSnapshot) {
    player.pressed = DirFlags {
        left: input.left,
        right: input.right,
        up: input.up,
        down: input.down,
    };
}

// ── Game ──────────────────────────────────────────────────────────────────────

pub struct Game<S, H, R> {
    world: World,
    waves: S,
    highscore: H,
    rng: R,
    tunables: Tunables,
    active: ActiveWave,
    /// Highscore as last read from or written to the store.
    best: u32,
}

impl<S, H, R> Game<S, H, R>
where
    S: WaveSource,
    H: HighscoreStore,
    R: Rng,
{
    /// Every wave is loaded once up front so bad configuration fails here
    /// rather than mid-game.
    pub fn new(
        waves: S,
        highscore: H,
        rng: R,
        tunables: Tunables,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        if waves.wave_count() == 0 {
            return Err(ConfigError::NoWaves);
        }
        for number in 1..=waves.wave_count() {
            ActiveWave::load(&waves, number)?;
        }
        let active = ActiveWave::load(&waves, 1)?;
        let best = highscore.read();
        Ok(Self {
            world: init_world(&tunables, now_ms),
            waves,
            highscore,
            rng,
            tunables,
            active,
            best,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for scripted scenarios and tests.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn active_wave(&self) -> &ActiveWave {
        &self.active
    }

    pub fn wave_count(&self) -> usize {
        self.waves.wave_count()
    }

    pub fn highscore(&self) -> &H {
        &self.highscore
    }

    pub fn best_score(&self) -> u32 {
        self.best
    }

    pub fn snapshot(&self, now_ms: u64) -> RenderSnapshot {
        snapshot::build(
            &self.world,
            &self.active,
            self.waves.wave_count(),
            self.best,
            &self.tunables,
            now_ms,
        )
    }

    /// Back to wave 1 with full health, zero score, centred, facing right.
    pub fn respawn(&mut self, now_ms: u64) -> Result<(), ConfigError> {
        let p = &mut self.world.player;
        p.health = p.max_health;
        p.dead = false;
        p.died_at = None;
        p.score = 0;
        p.pos = centered_position(self.world.width, self.world.height);
        p.velocity = Vec2::ZERO;
        p.facing = Facing::Right;
        p.pressed = DirFlags::default();
        p.collided = DirFlags::default();
        p.flash.reset();
        p.wave.reset();

        self.world.enemies.clear();
        self.world.bullets.clear();
        self.world.enemy_bullets.clear();
        self.world.spawn_cooldown = Cooldown::armed(self.tunables.spawn_cooldown_ms, now_ms);

        self.active.refresh(&self.waves, 1)?;
        self.best = self.highscore.read();
        tracing::info!("player respawned");
        Ok(())
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self, input: &InputSnapshot, now_ms: u64) -> Result<Vec<FrameEvent>, ConfigError> {
        let mut events = Vec::new();
        self.world.frame += 1;
        self.active
            .refresh(&self.waves, self.world.player.wave.number)?;

        if !self.world.player.dead {
            self.step_alive(input, now_ms, &mut events);
        }

        collision::advance_death_animations(&mut self.world);

        if !self.world.player.dead && self.world.player.health <= 0 {
            self.on_player_death(now_ms, &mut events);
        }
        if self.world.player.dead {
            self.clear_battlefield();
        } else {
            self.advance_wave(now_ms, &mut events)?;
        }

        Ok(events)
    }

    fn step_alive(&mut self, input: &InputSnapshot, now_ms: u64, events: &mut Vec<FrameEvent>) {
        let world = &mut self.world;

        // ── 1. Movement ──────────────────────────────────────────────────────
        apply_input(&mut world.player, input);
        movement::move_player(&mut world.player, world.width, world.height);
        movement::move_bullets(world);
        let shots = movement::steer_enemies(world, now_ms);
        if shots > 0 {
            events.push(FrameEvent::EnemyFired { count: shots });
        }
        movement::move_enemy_bullets(world, self.tunables.enemy_bullet_aim);

        // ── 2. Player fire ───────────────────────────────────────────────────
        if input.fire && world.player.fire_cooldown.try_trigger(now_ms) {
            let bullet = movement::new_bullet(&world.player);
            world.bullets.push(bullet);
            events.push(FrameEvent::PlayerFired);
        }

        // ── 3. Spawn ─────────────────────────────────────────────────────────
        let wave_count = self.waves.wave_count();
        if let Some((id, kind)) = spawn::run(world, &self.active, wave_count, &mut self.rng, now_ms) {
            tracing::debug!(id = id.0, ?kind, "enemy spawned");
            events.push(FrameEvent::EnemySpawned { id, kind });
        }

        // ── 4. Collisions ────────────────────────────────────────────────────
        events.extend(collision::bullets_vs_enemies(world));
        events.extend(collision::enemies_vs_player(world, now_ms));
        events.extend(collision::enemy_bullets_vs_player(world, now_ms));

        // ── 5. Hit flash ─────────────────────────────────────────────────────
        let since_hit = world.player.hit_cooldown.elapsed(now_ms);
        let window = self.tunables.flash_window_ms();
        world.player.flash.update(since_hit, window, now_ms);
    }

    /// Runs once, on the first tick with health at zero.
    fn on_player_death(&mut self, now_ms: u64, events: &mut Vec<FrameEvent>) {
        let p = &mut self.world.player;
        p.dead = true;
        p.died_at = Some(now_ms);
        let score = p.score;
        tracing::info!(score, wave = p.wave.number, "player died");
        events.push(FrameEvent::PlayerDied { score });

        let stored = self.highscore.read();
        if score > stored {
            match self.highscore.write(score) {
                Ok(()) => {
                    tracing::info!(score, previous = stored, "new highscore");
                    events.push(FrameEvent::NewHighscore { score });
                }
                Err(e) => tracing::warn!(score, error = %e, "failed to save highscore"),
            }
            self.best = score;
        } else {
            self.best = stored;
        }
    }

    /// While the player is dead: enemies play out their deaths, projectiles
    /// vanish, and held keys are forgotten.
    fn clear_battlefield(&mut self) {
        for enemy in &mut self.world.enemies {
            enemy.health = 0;
        }
        self.world.bullets.clear();
        self.world.enemy_bullets.clear();
        let p = &mut self.world.player;
        p.velocity = Vec2::ZERO;
        p.pressed = DirFlags::default();
    }

    fn advance_wave(&mut self, now_ms: u64, events: &mut Vec<FrameEvent>) -> Result<(), ConfigError> {
        let wave_count = self.waves.wave_count();
        let transition = self.world.player.wave.update(
            self.active.record.kill_target,
            wave_count,
            self.tunables.wave_pause_ms,
            now_ms,
        );
        match transition {
            Some(WaveTransition::Completed { wave }) => {
                tracing::info!(wave, "wave completed");
                events.push(FrameEvent::WaveCompleted { wave });
            }
            Some(WaveTransition::Advanced { to, .. }) => {
                self.active.refresh(&self.waves, to)?;
                let name = self.active.record.name.clone();
                tracing::info!(wave = to, %name, endless = to == wave_count, "wave started");
                events.push(FrameEvent::WaveStarted { wave: to, name });
            }
            None => {}
        }
        Ok(())
    }
}
