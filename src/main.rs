use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

use mazechase::config::Settings;
use mazechase::grid::{CellKind, Pellet};
use mazechase::scores;
use mazechase::sim::Snapshot;
use mazechase::{Archetype, Command, Dir, GameEvent, Grid, Mode, Phase, Pos, Session, Status};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Pursuer,
    Frightened,
    Eyes,
    Wall,
    Empty,
    Pellet,
    Power,
    Gate,
    Fruit,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode().context("failed to restore terminal")?;
    result
}

/// Logs go to a file only; the terminal is busy drawing the maze.
fn init_logging(settings: &Settings) -> Result<()> {
    let Some(path) = &settings.log_path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings) -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut session = Session::new(settings.start_level).context("failed to load the maze")?;
    let high_score = match scores::load_scores(&settings.scores_path) {
        Ok(history) => scores::high_score(&history),
        Err(err) => {
            warn!(error = %err, "ignoring unreadable score file");
            0
        }
    };
    info!(level = settings.start_level, high_score, "run started");

    let grid = session.simulation().grid();
    let mut renderer = Renderer::new(grid.width() as usize, grid.height() as usize);
    let tick_time = Duration::from_millis(settings.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('p') => session.handle(Command::TogglePause),
                    KeyCode::Char('m') => session.handle(Command::ToggleMute),
                    code => {
                        if let Some(dir) = dir_for_key(code) {
                            session.handle(Command::Steer(dir));
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_time {
            last_tick = Instant::now();
            let events = session.tick(&mut rng);
            if !session.is_muted() && events.iter().any(is_loud) {
                stdout.queue(Print('\x07'))?;
            }
        }
        render(stdout, &session, high_score, &mut renderer)?;

        if session.status() != Status::Playing {
            let score = session.final_score();
            scores::append_score(&settings.scores_path, score)
                .with_context(|| format!("failed to record score {score}"))?;
            info!(score, status = ?session.status(), "run finished");
            render_game_over(stdout, &session)?;
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Char('k') | KeyCode::Char('w') | KeyCode::Up => Some(Dir::Up),
        KeyCode::Char('j') | KeyCode::Char('s') | KeyCode::Down => Some(Dir::Down),
        KeyCode::Char('h') | KeyCode::Char('a') | KeyCode::Left => Some(Dir::Left),
        KeyCode::Char('l') | KeyCode::Char('d') | KeyCode::Right => Some(Dir::Right),
        _ => None,
    }
}

fn is_loud(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::PursuerEaten { .. }
            | GameEvent::LifeLost { .. }
            | GameEvent::FruitEaten { .. }
            | GameEvent::ExtraLife { .. }
    )
}

fn render(stdout: &mut Stdout, session: &Session, high_score: u32, renderer: &mut Renderer) -> io::Result<()> {
    let grid = session.simulation().grid();
    let (width, height) = (grid.width() as usize, grid.height() as usize);
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let snapshot = session.snapshot();
    let hud = hud_line(&snapshot, high_score);
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let fruit_cell = session.simulation().maze().fruit_cell;
    for y in 0..height {
        for x in 0..width {
            let pos = Pos::new(x as i32, y as i32);
            let cell = cell_for(grid, &snapshot, fruit_cell, pos);
            let idx = y * width + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn hud_line(snapshot: &Snapshot, high_score: u32) -> String {
    let phase = match (snapshot.frightened, snapshot.phase) {
        (true, _) => "frightened",
        (false, Phase::Scatter) => "scatter",
        (false, Phase::Chase) => "chase",
    };
    let mut hud = format!(
        "Score: {}  High: {}  Lives: {}  Level: {}  Pellets: {}  {}",
        snapshot.score,
        high_score.max(snapshot.score).min(scores::SCORE_CAP),
        snapshot.lives,
        snapshot.level,
        snapshot.pellets_left,
        phase
    );
    if snapshot.paused {
        hud.push_str("  [paused]");
    }
    if snapshot.muted {
        hud.push_str("  [muted]");
    }
    hud.push_str("  (q to quit)");
    hud
}

fn pursuer_color(archetype: Archetype) -> Color {
    match archetype {
        Archetype::Leader => Color::Red,
        Archetype::Ambusher => Color::Magenta,
        Archetype::Flanker => Color::Cyan,
        Archetype::Shy => Color::DarkYellow,
    }
}

fn cell_for(grid: &Grid, snapshot: &Snapshot, fruit_cell: Pos, pos: Pos) -> Cell {
    if pos == snapshot.player.cell {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if let Some(pursuer) = snapshot.pursuers.iter().find(|p| p.cell == pos) {
        return match pursuer.mode {
            Mode::Frightened => Cell {
                glyph: Glyph::Frightened,
                color: if pursuer.flashing { Color::White } else { Color::Blue },
            },
            Mode::Retreating => Cell {
                glyph: Glyph::Eyes,
                color: Color::White,
            },
            _ => Cell {
                glyph: Glyph::Pursuer,
                color: pursuer_color(pursuer.archetype),
            },
        };
    }
    if snapshot.fruit.is_some() && pos == fruit_cell {
        return Cell {
            glyph: Glyph::Fruit,
            color: Color::Green,
        };
    }
    match grid.cell_at(pos) {
        Some(cell) if cell.kind == CellKind::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Some(cell) if cell.door => Cell {
            glyph: Glyph::Gate,
            color: Color::Cyan,
        },
        Some(cell) => match cell.pellet {
            Some(Pellet::Dot) => Cell {
                glyph: Glyph::Pellet,
                color: Color::White,
            },
            Some(Pellet::Energizer) => Cell {
                glyph: Glyph::Power,
                color: Color::Magenta,
            },
            None => Cell {
                glyph: Glyph::Empty,
                color: Color::Reset,
            },
        },
        None => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "😃",
        Glyph::Pursuer => "👻",
        Glyph::Frightened => "😱",
        Glyph::Eyes => "👀",
        Glyph::Wall => "██",
        Glyph::Empty => "  ",
        Glyph::Pellet => "· ",
        Glyph::Power => "● ",
        Glyph::Gate => "==",
        Glyph::Fruit => "🍒",
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn render_game_over(stdout: &mut Stdout, session: &Session) -> io::Result<()> {
    let grid = session.simulation().grid();
    let (term_w, term_h) = terminal::size()?;
    let needed_h = (grid.height() + 2) as u16;
    let needed_w = grid.width() as u16 * CELL_W as u16;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        stdout.queue(MoveTo(origin_x, origin_y + grid.height() as u16))?;
    }
    let headline = match session.status() {
        Status::Won => "YOU WIN",
        _ => "GAME OVER",
    };
    stdout.queue(Print(format!(
        "{} - Final Score: {} (press q to quit)",
        headline,
        session.final_score()
    )))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}
