/// Rendering layer.  All terminal I/O lives here.
///
/// Works only from a `RenderSnapshot`: world coordinates (1920×1080 by
/// default) are scaled onto whatever grid the terminal currently has.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use taco_invasion::entities::{EnemyFacing, EnemyKind, Facing, Vec2};
use taco_invasion::snapshot::{
    DeathScreen, EnemySprite, EnemyView, HealthTier, RenderSnapshot, WaveView,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_WAVE: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_PLAYER_FADED: Color = Color::DarkGrey;
const C_TACO: Color = Color::Yellow;
const C_BURGER: Color = Color::DarkYellow;
const C_CHIPS: Color = Color::Green;
const C_DAMAGED: Color = Color::Red;
const C_DYING: Color = Color::DarkGrey;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD above the arena and the hint below it.
const TOP_ROWS: u16 = 1;
const BOTTOM_ROWS: u16 = 1;

// ── World → terminal mapping ──────────────────────────────────────────────────

/// The arena inside the border, in terminal cells.
struct Viewport {
    cols: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    fn new(snap: &RenderSnapshot, cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            world_w: snap.width,
            world_h: snap.height,
        }
    }

    fn inner_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn inner_rows(&self) -> u16 {
        self.rows.saturating_sub(TOP_ROWS + BOTTOM_ROWS + 2).max(1)
    }

    /// Cell for a world point, or `None` if it falls outside the arena.
    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 || p.x >= self.world_w || p.y >= self.world_h {
            return None;
        }
        let col = (p.x / self.world_w * self.inner_cols() as f32) as u16;
        let row = (p.y / self.world_h * self.inner_rows() as f32) as u16;
        Some((col + 1, row + TOP_ROWS + 1))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &RenderSnapshot) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport::new(snap, cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, snap, cols)?;

    for enemy in &snap.enemies {
        draw_enemy(out, &view, enemy)?;
    }
    for &pos in &snap.bullets {
        draw_glyph(out, &view, pos, "•", C_BULLET_PLAYER)?;
    }
    for bullet in &snap.enemy_bullets {
        draw_glyph(out, &view, bullet.pos, "o", C_BULLET_ENEMY)?;
    }

    if !snap.player.dead {
        draw_player(out, &view, snap)?;
    }
    draw_controls_hint(out, rows)?;

    if let DeathScreen::Shown { score, highscore } = snap.death_screen {
        draw_death_screen(out, cols, rows, score, highscore)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let inner = view.inner_cols() as usize;
    let top = TOP_ROWS;
    let bottom = TOP_ROWS + view.inner_rows() + 1;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in top + 1..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(inner as u16 + 1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn progress_bar(wave: &WaveView, width: usize) -> String {
    let filled = ((wave.progress * width as f32).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn draw_hud<W: Write>(out: &mut W, snap: &RenderSnapshot, cols: u16) -> std::io::Result<()> {
    // Score: left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", snap.score)))?;

    // Wave: centre
    let wave = &snap.wave;
    let label = if wave.endless {
        format!("{} ∞ ", wave.name)
    } else {
        format!("{} ({}/{}) ", wave.name, wave.number, wave.count)
    };
    let wave_str = format!("{}{}", label, progress_bar(wave, 10));
    let wx = (cols / 2).saturating_sub(wave_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(&wave_str))?;

    // Health: right
    let hearts = format!(
        "{}{}",
        "♥".repeat(snap.health.max(0) as usize),
        "♡".repeat((snap.max_health - snap.health).max(0) as usize)
    );
    let rx = cols.saturating_sub(hearts.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&hearts))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_glyph<W: Write>(
    out: &mut W,
    view: &Viewport,
    pos: Vec2,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(pos) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn player_glyph(facing: Facing) -> &'static str {
    match facing {
        Facing::Up => "▲",
        Facing::Down => "▼",
        Facing::Left => "◄",
        Facing::Right => "►",
        Facing::UpLeft => "◤",
        Facing::UpRight => "◥",
        Facing::DownLeft => "◣",
        Facing::DownRight => "◢",
    }
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, snap: &RenderSnapshot) -> std::io::Result<()> {
    let color = if snap.player.translucent {
        C_PLAYER_FADED
    } else {
        C_PLAYER
    };
    draw_glyph(out, view, snap.player.pos, player_glyph(snap.player.facing), color)
}

/// Death strip squeezed into three glyphs.
const DYING_GLYPHS: [&str; 3] = ["*", "+", "·"];

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &EnemyView) -> std::io::Result<()> {
    let (glyph, color) = match enemy.sprite {
        EnemySprite::Dying { frame } => {
            let i = (frame as usize * DYING_GLYPHS.len() / 9).min(DYING_GLYPHS.len() - 1);
            (DYING_GLYPHS[i].to_string(), C_DYING)
        }
        EnemySprite::Alive { tier, facing } => {
            let body = match enemy.kind {
                EnemyKind::Taco => 'T',
                EnemyKind::Burger => 'B',
                EnemyKind::Chips => 'C',
            };
            let glyph = match facing {
                EnemyFacing::Left => format!("<{}", body),
                EnemyFacing::Right => format!("{}>", body),
            };
            let color = match (tier, enemy.kind) {
                (HealthTier::Damaged, _) => C_DAMAGED,
                (HealthTier::Full, EnemyKind::Taco) => C_TACO,
                (HealthTier::Full, EnemyKind::Burger) => C_BURGER,
                (HealthTier::Full, EnemyKind::Chips) => C_CHIPS,
            };
            (glyph, color)
        }
    };
    draw_glyph(out, view, enemy.pos, &glyph, color)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD / arrows : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Death screen ──────────────────────────────────────────────────────────────

fn draw_death_screen<W: Write>(
    out: &mut W,
    cols: u16,
    rows: u16,
    score: u32,
    highscore: u32,
) -> std::io::Result<()> {
    let new_best = score >= highscore && score > 0;
    let best_line = if new_best {
        format!("★ NEW HIGHSCORE: {:>6} ★", highscore)
    } else {
        format!("Highscore:   {:>6}", highscore)
    };
    let lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║     YOU  DIED      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Score:       {:>6}", score), Color::Yellow),
        (
            best_line,
            if new_best { Color::Yellow } else { Color::DarkGrey },
        ),
        ("R - Respawn   M - Menu   Q - Quit".to_string(), Color::White),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
