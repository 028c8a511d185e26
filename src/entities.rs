//! All game entity types: plain data plus geometry accessors.
//! Behaviour lives in `movement`, `collision`, `spawn` and `compute`.

use serde::Deserialize;

use crate::timing::{Cooldown, Flash};
use crate::waves::WaveProgress;

// ── Fixed gameplay constants ──────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 60.0;
pub const PLAYER_HEIGHT: f32 = 70.0;
/// The hitbox is this much narrower and shorter than the sprite.
pub const PLAYER_HITBOX_INSET: f32 = 10.0;
pub const PLAYER_SPEED: f32 = 3.0;
pub const PLAYER_MAX_HEALTH: i32 = 3;

pub const BULLET_SIZE: f32 = 12.0;
pub const BULLET_SPEED: f32 = 10.0;
pub const BULLET_DAMAGE: i32 = 1;

pub const ENEMY_BULLET_SPEED: f32 = 3.5;
pub const ENEMY_BULLET_DAMAGE: i32 = 1;

pub const DEATH_ANIM_FRAMES: u32 = 9;
pub const TICKS_PER_DEATH_FRAME: u32 = 3;
/// 27 ticks: the enemy is purged once its death counter reaches this.
pub const DEATH_ANIM_TICKS: u32 = DEATH_ANIM_FRAMES * TICKS_PER_DEATH_FRAME;

pub const RANGED_ENGAGEMENT_RANGE: f32 = 500.0;
/// A ranged enemy only plants itself once it is this far inside the screen.
pub const RANGED_ONSCREEN_INSET: f32 = 75.0;
pub const RANGED_SHOOT_COOLDOWN_MS: u64 = 2500;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector, or `None` for the zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len == 0.0 {
            None
        } else {
            Some(Vec2::new(self.x / len, self.y / len))
        }
    }

    pub fn scaled(self, k: f32) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    pub fn minus(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap.  Touching edges and empty boxes never collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

// ── Directions ────────────────────────────────────────────────────────────────

/// Player facing.  Diagonals win over axial directions when both axes move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Enemies only ever face sideways.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyFacing {
    Left,
    Right,
}

/// One flag per compass direction.  Used for both held keys and wall contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirFlags {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    /// Top-left corner of the sprite.
    pub pos: Vec2,
    pub velocity: Vec2,
    pub pressed: DirFlags,
    pub collided: DirFlags,
    pub facing: Facing,
    pub speed: f32,
    pub max_health: i32,
    pub health: i32,
    pub dead: bool,
    /// Latched once on the tick the player dies.
    pub died_at: Option<u64>,
    pub hit_cooldown: Cooldown,
    pub fire_cooldown: Cooldown,
    pub flash: Flash,
    pub score: u32,
    pub wave: WaveProgress,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x,
            self.pos.y,
            PLAYER_WIDTH - PLAYER_HITBOX_INSET,
            PLAYER_HEIGHT - PLAYER_HITBOX_INSET,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + PLAYER_WIDTH / 2.0,
            self.pos.y + PLAYER_HEIGHT / 2.0,
        )
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Stable handle for an enemy.  Never reused within a `World`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u64);

/// The three archetypes.  Wave data names them by the tags below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum EnemyKind {
    /// Light melee pursuer.
    #[serde(rename = "TacoEnemy")]
    Taco,
    /// Heavy melee pursuer: two hits to kill, hits twice as hard.
    #[serde(rename = "BurgerEnemy")]
    Burger,
    /// Stand-off shooter.
    #[serde(rename = "ChipsEnemy")]
    Chips,
}

/// Per-archetype stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyParams {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub damage: i32,
    pub max_health: i32,
    pub score_value: u32,
}

static ENEMY_TABLE: [EnemyParams; 3] = [
    EnemyParams { width: 90.0, height: 50.0, speed: 1.5, damage: 1, max_health: 1, score_value: 1 }, // Taco
    EnemyParams { width: 70.0, height: 65.0, speed: 1.5, damage: 2, max_health: 2, score_value: 2 }, // Burger
    EnemyParams { width: 60.0, height: 70.0, speed: 1.5, damage: 1, max_health: 1, score_value: 2 }, // Chips
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Taco, EnemyKind::Burger, EnemyKind::Chips];

    pub fn params(self) -> &'static EnemyParams {
        match self {
            EnemyKind::Taco => &ENEMY_TABLE[0],
            EnemyKind::Burger => &ENEMY_TABLE[1],
            EnemyKind::Chips => &ENEMY_TABLE[2],
        }
    }

    /// Tag used in wave data.
    pub fn tag(self) -> &'static str {
        match self {
            EnemyKind::Taco => "TacoEnemy",
            EnemyKind::Burger => "BurgerEnemy",
            EnemyKind::Chips => "ChipsEnemy",
        }
    }
}

/// State only the stand-off shooter carries.
#[derive(Clone, Debug, PartialEq)]
pub struct RangedState {
    /// Cleared for good once the enemy reaches firing position.
    pub can_move: bool,
    pub can_shoot: bool,
    pub shoot_cooldown: Cooldown,
    pub engagement_range: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    Pursue,
    Standoff(RangedState),
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub facing: EnemyFacing,
    pub max_health: i32,
    pub health: i32,
    pub speed: f32,
    pub damage: i32,
    pub score_value: u32,
    pub behavior: Behavior,
    /// Ticks of death animation played so far.
    pub death_ticks: u32,
    pub death_anim_finished: bool,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Dead enemies have an empty box and collide with nothing.
    pub fn bounds(&self) -> Rect {
        if self.is_alive() {
            Rect::new(self.pos.x, self.pos.y, self.width, self.height)
        } else {
            Rect::new(self.pos.x, self.pos.y, 0.0, 0.0)
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height / 2.0)
    }

    /// Index into the 9-image death strip.
    pub fn death_frame(&self) -> u32 {
        (self.death_ticks / TICKS_PER_DEATH_FRAME).min(DEATH_ANIM_FRAMES - 1)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub facing: Facing,
    /// Signed: negative travels left/up.
    pub speed: f32,
}

impl Bullet {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BULLET_SIZE, BULLET_SIZE)
    }
}

#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub pos: Vec2,
    /// Enemy that fired it.  Only used for spawn geometry.
    pub owner: EnemyId,
    /// Unit heading.
    pub direction: Vec2,
    pub speed: f32,
    pub damage: i32,
    /// Sprite rotation in degrees, fixed at spawn.
    pub angle_deg: f32,
}

impl EnemyBullet {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BULLET_SIZE, BULLET_SIZE)
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything that changes during play.  Owned by `Game`, mutated only by
/// the tick phases.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub spawn_cooldown: Cooldown,
    pub width: f32,
    pub height: f32,
    pub frame: u64,
    pub next_enemy_id: u64,
}

impl World {
    pub fn alloc_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
