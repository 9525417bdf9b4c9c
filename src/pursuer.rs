//! One pursuit state machine shared by every archetype.
//!
//! A pursuer only plans when it sits exactly on a cell. Between cells it
//! keeps walking the step it committed to, so a route never has to account
//! for sub-cell offsets.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::archetype::{Archetype, TargetView};
use crate::grid::{Dir, Grid, Point, Pos};
use crate::maze::Maze;
use crate::path::{find_path, Route};
use crate::schedule::Phase;

/// Player offset, on both axes, inside which a frightened pursuer steers
/// directly away. Only a player below and to the right counts.
pub const FLEE_WINDOW: i32 = 2;

/// Steps a frightened pursuer keeps its heading when the player is out of
/// reach.
pub const STRAY_RUN: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Housed,
    Patrol,
    Pursue,
    Frightened,
    Retreating,
}

impl Mode {
    pub fn for_phase(phase: Phase) -> Mode {
        match phase {
            Phase::Scatter => Mode::Patrol,
            Phase::Chase => Mode::Pursue,
        }
    }
}

/// Ticks to cross one cell and the distance covered per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gait {
    pub ticks: u32,
    pub speed: i32,
}

impl Gait {
    pub const NORMAL: Gait = Gait { ticks: 12, speed: 4 };
    pub const ANGRY: Gait = Gait { ticks: 8, speed: 6 };
    pub const SLOW: Gait = Gait { ticks: 16, speed: 3 };
    pub const RETREAT: Gait = Gait { ticks: 3, speed: 16 };
}

/// Read-only world state handed to each pursuer for one tick.
#[derive(Clone, Copy, Debug)]
pub struct PursuitContext<'a> {
    pub maze: &'a Maze,
    pub level: u32,
    pub phase: Phase,
    pub frightened: bool,
    pub player: Pos,
    pub player_dir: Dir,
    pub leader: Pos,
    pub active_secs: f64,
    pub pellets_eaten: u32,
    pub pellets_left: u32,
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    archetype: Archetype,
    pos: Point,
    dir: Dir,
    mode: Mode,
    route: Route,
    gait: Gait,
    ticks_left: u32,
    released: bool,
    patrol_leg: usize,
}

impl Pursuer {
    /// A housed pursuer waiting on its pen berth.
    pub fn new(archetype: Archetype, maze: &Maze) -> Self {
        let berth = maze.berth(archetype);
        Self {
            archetype,
            pos: Point::of_cell(berth.cell),
            dir: berth.facing,
            mode: Mode::Housed,
            route: Route::new(),
            gait: Gait::NORMAL,
            ticks_left: 0,
            released: false,
            patrol_leg: 0,
        }
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn cell(&self, grid: &Grid) -> Pos {
        grid.cell_of(self.pos)
    }

    pub fn facing(&self) -> Dir {
        self.dir
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn ticks_left(&self) -> u32 {
        self.ticks_left
    }

    /// Moves one tick. On a cell boundary the pursuer first plans, then
    /// commits to the next step; it holds still when no step is possible.
    pub fn advance(&mut self, ctx: &PursuitContext<'_>, rng: &mut impl Rng) {
        let grid = &ctx.maze.grid;
        if self.ticks_left == 0 {
            let here = grid.cell_of(self.pos);
            self.plan(ctx, here, rng);
            let Some(dir) = self.route.next_step().or_else(|| self.wander(grid, here, rng)) else {
                return;
            };
            debug_assert!(grid.is_passable(here.step(dir)), "{:?} stepped into a wall", self.archetype);
            self.dir = dir;
            self.gait = self.gait_for(ctx, here);
            self.ticks_left = self.gait.ticks;
        }

        self.pos = grid.wrap_point(self.pos.nudged(self.dir, self.gait.speed));
        self.ticks_left -= 1;
    }

    fn plan(&mut self, ctx: &PursuitContext<'_>, here: Pos, rng: &mut impl Rng) {
        let maze = ctx.maze;
        match self.mode {
            Mode::Housed => {
                let release = self.archetype.release(ctx.level);
                if !ctx.frightened && release.is_due(ctx.active_secs, ctx.pellets_eaten) {
                    self.released = true;
                    self.mode = Mode::for_phase(ctx.phase);
                    self.route = find_path(&maze.grid, here, maze.pen_exit).unwrap_or_default();
                    debug!(archetype = self.archetype.name(), mode = ?self.mode, "released from pen");
                } else if self.route.is_empty() {
                    self.route = self.pacing_route(maze);
                }
            }
            Mode::Retreating => {
                if here == maze.home {
                    self.mode = Mode::for_phase(ctx.phase);
                    self.route = Route::new();
                    debug!(archetype = self.archetype.name(), "back home");
                    self.plan(ctx, here, rng);
                } else {
                    self.route = find_path(&maze.grid, here, maze.home).unwrap_or_default();
                }
            }
            Mode::Patrol | Mode::Pursue | Mode::Frightened => {
                let reversing = self.route.peek() == Some(self.dir.reverse());
                if let Some(run) = maze.tunnel_run(here, self.dir).filter(|_| !reversing) {
                    self.route = run;
                    return;
                }
                match self.mode {
                    Mode::Frightened if self.route.is_empty() => {
                        self.route = flee_route(ctx, here, self.dir, rng);
                    }
                    Mode::Patrol if self.route.is_empty() => {
                        self.route = self.patrol_route(maze, here);
                    }
                    Mode::Pursue if self.route.is_empty() || maze.is_decision_point(here) => {
                        self.route = self.pursue_route(ctx, here);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Two steps out from the berth and two steps back.
    fn pacing_route(&self, maze: &Maze) -> Route {
        let facing = maze.berth(self.archetype).facing;
        [facing, facing, facing.reverse(), facing.reverse()]
            .into_iter()
            .collect()
    }

    fn patrol_route(&mut self, maze: &Maze, here: Pos) -> Route {
        let patrol = maze.patrol(self.archetype);
        if here == patrol.leg(self.patrol_leg) {
            self.patrol_leg += 1;
        }
        find_path(&maze.grid, here, patrol.leg(self.patrol_leg)).unwrap_or_default()
    }

    fn pursue_route(&self, ctx: &PursuitContext<'_>, here: Pos) -> Route {
        let grid = &ctx.maze.grid;
        let path_to_player = if self.archetype.needs_path_to_player() {
            find_path(grid, here, ctx.player).map(|route| route.len())
        } else {
            None
        };
        let view = TargetView {
            player: ctx.player,
            player_dir: ctx.player_dir,
            leader: ctx.leader,
            corner: ctx.maze.corner(self.archetype),
            path_to_player,
        };
        let target = self.archetype.pursue_target(&view);

        find_path(grid, here, target)
            .or_else(|| find_path(grid, here, ctx.player))
            .unwrap_or_default()
    }

    /// Local step when no route is available: keep going, else any open
    /// non-reversing direction, else back the way it came.
    fn wander(&self, grid: &Grid, here: Pos, rng: &mut impl Rng) -> Option<Dir> {
        if grid.is_passable(here.step(self.dir)) {
            return Some(self.dir);
        }
        let options: Vec<Dir> = Dir::ALL
            .into_iter()
            .filter(|&d| d != self.dir.reverse() && grid.is_passable(here.step(d)))
            .collect();
        options.choose(rng).copied().or_else(|| {
            let back = self.dir.reverse();
            grid.is_passable(here.step(back)).then_some(back)
        })
    }

    fn gait_for(&self, ctx: &PursuitContext<'_>, here: Pos) -> Gait {
        match self.mode {
            Mode::Retreating => Gait::RETREAT,
            Mode::Frightened => Gait::SLOW,
            _ if ctx.maze.in_tunnel(here) => Gait::SLOW,
            Mode::Housed => Gait::NORMAL,
            _ if self.archetype.is_angry(ctx.level, ctx.pellets_left) => Gait::ANGRY,
            _ => Gait::NORMAL,
        }
    }

    /// Energizer eaten: in-play pursuers turn around and flee.
    pub fn frighten(&mut self, grid: &Grid) {
        if matches!(self.mode, Mode::Housed | Mode::Retreating) {
            return;
        }
        self.mode = Mode::Frightened;
        self.route = Route::new();
        let back = self.dir.reverse();
        if self.ticks_left > 0 {
            self.dir = back;
            self.ticks_left = self.gait.ticks - self.ticks_left;
        } else if grid.is_passable(grid.cell_of(self.pos).step(back)) {
            self.route = Route::single(back);
        }
    }

    pub fn calm(&mut self, phase: Phase) {
        if self.mode == Mode::Frightened {
            self.mode = Mode::for_phase(phase);
            self.route = Route::new();
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        if matches!(self.mode, Mode::Patrol | Mode::Pursue) {
            self.mode = Mode::for_phase(phase);
            self.route = Route::new();
            self.patrol_leg = 0;
        }
    }

    /// Caught by the player while frightened.
    pub fn eaten(&mut self) {
        self.mode = Mode::Retreating;
        self.route = Route::new();
    }

    #[cfg(test)]
    pub(crate) fn placed(archetype: Archetype, cell: Pos, dir: Dir, mode: Mode) -> Self {
        Self {
            archetype,
            pos: Point::of_cell(cell),
            dir,
            mode,
            route: Route::new(),
            gait: Gait::NORMAL,
            ticks_left: 0,
            released: mode != Mode::Housed,
            patrol_leg: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }
}

/// Frightened steering. A player just below and to the right sends the
/// pursuer toward the cell mirrored through itself. Otherwise it picks a
/// random open direction that does not close in on the player, or runs
/// straight on when the player cannot be reached.
fn flee_route(ctx: &PursuitContext<'_>, here: Pos, dir: Dir, rng: &mut impl Rng) -> Route {
    let grid = &ctx.maze.grid;
    let (dx, dy) = (ctx.player.x - here.x, ctx.player.y - here.y);
    let window = 1..=FLEE_WINDOW;
    if window.contains(&dx) && window.contains(&dy) {
        let away = Pos::new(here.x - dx, here.y - dy);
        if let Some(route) = find_path(grid, here, away).filter(|r| !r.is_empty()) {
            return route;
        }
    }

    let Some(closing) = find_path(grid, here, ctx.player).and_then(|route| route.peek()) else {
        return straight_run(grid, here, dir);
    };
    let options: Vec<Dir> = Dir::ALL
        .into_iter()
        .filter(|&d| d != closing && grid.is_passable(here.step(d)))
        .collect();
    Route::single(options.choose(rng).copied().unwrap_or(closing))
}

/// Up to `STRAY_RUN` steps along `dir`, stopping short of the first wall.
fn straight_run(grid: &Grid, here: Pos, dir: Dir) -> Route {
    let mut at = here;
    let mut len = 0;
    while len < STRAY_RUN && grid.is_passable(at.step(dir)) {
        at = grid.wrap(at.step(dir));
        len += 1;
    }
    Route::straight(dir, len)
}
