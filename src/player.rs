use crate::grid::{Dir, Grid, Point, Pos, CELL};

pub const PLAYER_SPEED: i32 = 6;
pub const PLAYER_STEP_TICKS: u32 = (CELL / PLAYER_SPEED) as u32;
/// Extra ticks spent standing still when turning onto the other axis.
pub const TURN_PAUSE_TICKS: u32 = 2;

/// The player-controlled walker. Input only sets the desired direction; the
/// walker commits to it at the next cell boundary where it is open.
#[derive(Clone, Debug)]
pub struct Player {
    pos: Point,
    facing: Dir,
    desired: Option<Dir>,
    counter: u32,
    moving: bool,
}

impl Player {
    pub fn new(start: Pos) -> Self {
        Self {
            pos: Point::of_cell(start),
            facing: Dir::Left,
            desired: None,
            counter: 0,
            moving: false,
        }
    }

    pub fn steer(&mut self, dir: Dir) {
        self.desired = Some(dir);
    }

    pub fn advance(&mut self, grid: &Grid) {
        if self.counter == 0 && !self.commit(grid) {
            return;
        }
        if self.counter <= PLAYER_STEP_TICKS {
            self.pos = grid.wrap_point(self.pos.nudged(self.facing, PLAYER_SPEED));
        }
        self.counter -= 1;
    }

    /// Picks the direction for the next step. Returns false when the walker
    /// has nowhere to go and stays put.
    fn commit(&mut self, grid: &Grid) -> bool {
        let here = grid.cell_of(self.pos);
        if let Some(dir) = self.desired.filter(|&d| grid.is_open_for_player(here.step(d))) {
            let turning = dir.is_horizontal() != self.facing.is_horizontal();
            self.counter = PLAYER_STEP_TICKS + if turning { TURN_PAUSE_TICKS } else { 0 };
            self.facing = dir;
            self.moving = true;
            return true;
        }
        if self.moving && grid.is_open_for_player(here.step(self.facing)) {
            self.counter = PLAYER_STEP_TICKS;
            return true;
        }
        self.moving = false;
        false
    }

    pub fn cell(&self, grid: &Grid) -> Pos {
        grid.cell_of(self.pos)
    }

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn facing(&self) -> Dir {
        self.facing
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_aligned(&self) -> bool {
        self.counter == 0
    }
}
