mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use taco_invasion::clock::{Clock, FixedStep, SystemClock};
use taco_invasion::compute::{Game, InputSnapshot};
use taco_invasion::config::{Tunables, TICKS_PER_SECOND};
use taco_invasion::highscore::{FileHighscore, HighscoreStore};
use taco_invasion::snapshot::DeathScreen;
use taco_invasion::waves::WaveTable;

type TerminalGame = Game<WaveTable, FileHighscore, StdRng>;

/// Top-down arena shooter in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Wave configuration file.
    #[arg(long, default_value = "data/WaveData.json")]
    waves: PathBuf,

    /// File holding the highscore.
    #[arg(long, default_value = "data/highscore.txt")]
    highscore: PathBuf,

    /// Write logs here.  Without it logs are discarded.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
}

/// Render every Nth tick.
const RENDER_EVERY: u64 = 4;

// ── Held-key tracking ────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat arrived within this many
/// ticks (≈133 ms at 120 ticks/s).  Terminals without release events rely on
/// OS key repeat to keep refreshing it.
const HOLD_WINDOW: u64 = 16;

fn is_held(key_tick: &HashMap<KeyCode, u64>, key: &KeyCode, tick: u64) -> bool {
    key_tick
        .get(key)
        .map(|&last| tick.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_tick: &HashMap<KeyCode, u64>, keys: &[KeyCode], tick: u64) -> bool {
    keys.iter().any(|k| is_held(key_tick, k, tick))
}

fn read_input(key_tick: &HashMap<KeyCode, u64>, tick: u64) -> InputSnapshot {
    use KeyCode::{Char, Down, Left, Right, Up};
    InputSnapshot {
        left: any_held(key_tick, &[Left, Char('a'), Char('A')], tick),
        right: any_held(key_tick, &[Right, Char('d'), Char('D')], tick),
        up: any_held(key_tick, &[Up, Char('w'), Char('W')], tick),
        down: any_held(key_tick, &[Down, Char('s'), Char('S')], tick),
        fire: is_held(key_tick, &Char(' '), tick),
    }
}

// ── Menu ─────────────────────────────────────────────────────────────────────

enum MenuResult {
    Play,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    highscore: u32,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let lines: &[(&str, Color)] = &[
        ("TACO  INVASION", Color::Yellow),
        ("", Color::Reset),
        ("[Enter] Play", Color::Green),
        ("[Q]     Quit", Color::Red),
        ("", Color::Reset),
        ("WASD / arrows : Move   SPACE : Shoot", Color::DarkGrey),
    ];
    let start = cy.saturating_sub(lines.len() as u16 / 2 + 1);
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            start + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }

    if highscore > 0 {
        let best = format!("Highscore: {}", highscore);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(best.chars().count() as u16 / 2),
            start.saturating_sub(2),
        ))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(&best))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                    return Ok(MenuResult::Play)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit)
                }
                _ => {}
            },
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Menu,
}

/// Runs until the player quits or leaves the death screen for the menu.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut TerminalGame,
    clock: &SystemClock,
    rx: &mpsc::Receiver<Event>,
) -> Result<LoopExit> {
    let mut key_tick: HashMap<KeyCode, u64> = HashMap::new();
    let mut pacer = FixedStep::per_second(TICKS_PER_SECOND);
    let mut tick: u64 = 0;

    loop {
        tick += 1;
        let now = clock.now_ms();
        let death_shown = matches!(game.snapshot(now).death_screen, DeathScreen::Shown { .. });

        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_tick.insert(code, tick);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(LoopExit::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if death_shown => {
                            game.respawn(now).context("reloading wave 1")?;
                            key_tick.clear();
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') if death_shown => {
                            return Ok(LoopExit::Menu);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_tick.insert(code, tick);
                }
                KeyEventKind::Release => {
                    key_tick.remove(&code);
                }
            }
        }

        let input = read_input(&key_tick, tick);
        game.tick(&input, now).context("advancing the game")?;

        if tick % RENDER_EVERY == 0 {
            display::render(out, &game.snapshot(now))?;
        }

        pacer.wait();
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let waves = WaveTable::from_path(&args.waves)
        .with_context(|| format!("loading waves from {}", args.waves.display()))?;
    let store = FileHighscore::new(&args.highscore);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let tunables = Tunables::from_env();
    let clock = SystemClock::new();
    let mut game = Game::new(waves, store, rng, tunables, clock.now_ms())
        .context("validating wave data")?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Terminals speaking the kitty protocol report key releases; others
    // fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &mut game, &clock, &rx);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    game: &mut TerminalGame,
    clock: &SystemClock,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    loop {
        match show_menu(out, rx, game.highscore().read())? {
            MenuResult::Quit => break,
            MenuResult::Play => {
                game.respawn(clock.now_ms()).context("starting a new game")?;
                tracing::info!("game started");
                if let LoopExit::Quit = game_loop(out, game, clock, rx)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
