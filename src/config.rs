//! Tunable timings and play-area size.
//!
//! `Tunables::default()` gives the standard arcade timings.  `from_env` lets a
//! player or a test harness override single values without a config file.

use std::env;

pub const DEFAULT_WIDTH: f32 = 1920.0;
pub const DEFAULT_HEIGHT: f32 = 1080.0;
pub const TICKS_PER_SECOND: u32 = 120;

const DEFAULT_FIRE_COOLDOWN_MS: u64 = 500;
const DEFAULT_SPAWN_COOLDOWN_MS: u64 = 1500;
const DEFAULT_HIT_COOLDOWN_MS: u64 = 750;
const DEFAULT_FLASH_TOGGLE_MS: u64 = 75;
const DEFAULT_FLASH_MARGIN_MS: u64 = 150;
const DEFAULT_WAVE_PAUSE_MS: u64 = 1000;
const DEFAULT_DEATH_SCREEN_DELAY_MS: u64 = 1250;

/// How enemy bullets pick their heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletAim {
    /// Heading toward the player's centre is computed once, at spawn.
    FixedAtSpawn,
    /// Heading is recomputed every tick toward the player's current centre.
    Homing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tunables {
    pub width: f32,
    pub height: f32,
    pub fire_cooldown_ms: u64,
    pub spawn_cooldown_ms: u64,
    /// Player invulnerability window after a hit.
    pub hit_cooldown_ms: u64,
    pub flash_toggle_ms: u64,
    /// The flash stops this long before the invulnerability window closes.
    pub flash_margin_ms: u64,
    /// Pause between a wave's last kill and the next wave.
    pub wave_pause_ms: u64,
    pub death_screen_delay_ms: u64,
    pub enemy_bullet_aim: BulletAim,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fire_cooldown_ms: DEFAULT_FIRE_COOLDOWN_MS,
            spawn_cooldown_ms: DEFAULT_SPAWN_COOLDOWN_MS,
            hit_cooldown_ms: DEFAULT_HIT_COOLDOWN_MS,
            flash_toggle_ms: DEFAULT_FLASH_TOGGLE_MS,
            flash_margin_ms: DEFAULT_FLASH_MARGIN_MS,
            wave_pause_ms: DEFAULT_WAVE_PAUSE_MS,
            death_screen_delay_ms: DEFAULT_DEATH_SCREEN_DELAY_MS,
            enemy_bullet_aim: BulletAim::FixedAtSpawn,
        }
    }
}

impl Tunables {
    /// Defaults overridden by `TACO_*` environment variables.
    pub fn from_env() -> Self {
        let d = Self::default();
        let aim = match env::var("TACO_ENEMY_BULLET_AIM").ok().as_deref() {
            None => d.enemy_bullet_aim,
            Some("fixed") => BulletAim::FixedAtSpawn,
            Some("homing") => BulletAim::Homing,
            Some(other) => {
                tracing::warn!(
                    "TACO_ENEMY_BULLET_AIM={:?} is not \"fixed\" or \"homing\". Using default.",
                    other
                );
                d.enemy_bullet_aim
            }
        };

        Self {
            width: read_env("TACO_WIDTH", d.width, positive_size),
            height: read_env("TACO_HEIGHT", d.height, positive_size),
            fire_cooldown_ms: read_env("TACO_FIRE_COOLDOWN_MS", d.fire_cooldown_ms, nonzero),
            spawn_cooldown_ms: read_env("TACO_SPAWN_COOLDOWN_MS", d.spawn_cooldown_ms, nonzero),
            hit_cooldown_ms: read_env("TACO_HIT_COOLDOWN_MS", d.hit_cooldown_ms, nonzero),
            flash_toggle_ms: read_env("TACO_FLASH_TOGGLE_MS", d.flash_toggle_ms, nonzero),
            flash_margin_ms: d.flash_margin_ms,
            wave_pause_ms: read_env("TACO_WAVE_PAUSE_MS", d.wave_pause_ms, |_| true),
            death_screen_delay_ms: d.death_screen_delay_ms,
            enemy_bullet_aim: aim,
        }
    }

    /// Window after a hit during which the player blinks.
    pub fn flash_window_ms(&self) -> u64 {
        self.hit_cooldown_ms.saturating_sub(self.flash_margin_ms)
    }
}

fn positive_size(value: &f32) -> bool {
    value.is_finite() && *value > 0.0
}

fn nonzero(value: &u64) -> bool {
    *value > 0
}

/// Parsed value of `key`.  Falls back to `default` when the variable is
/// missing or its value fails to parse or fails `valid`.
fn read_env<T>(key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.trim().parse::<T>().ok().filter(|value| valid(value)) {
        Some(value) => value,
        None => {
            tracing::warn!("{}={:?} is not valid. Using default {:?}.", key, raw, default);
            default
        }
    }
}
