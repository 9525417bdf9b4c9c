//! Per-tick orchestration of the scheduler, the player and the pursuers.

use rand::Rng;
use tracing::{debug, info};

use crate::archetype::Archetype;
use crate::error::MazeError;
use crate::event::GameEvent;
use crate::grid::{Dir, Grid, Pellet, Point, Pos};
use crate::maze::Maze;
use crate::player::Player;
use crate::pursuer::{Mode, PursuitContext, Pursuer};
use crate::schedule::{ModeChange, ModeScheduler, Phase};
use crate::scoring::{
    Fruit, Scoreboard, DOT_POINTS, ENERGIZER_POINTS, FRUIT_THRESHOLDS, PURSUER_POINTS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerView {
    pub position: Point,
    pub cell: Pos,
    pub facing: Dir,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerView {
    pub archetype: Archetype,
    pub position: Point,
    pub cell: Pos,
    pub facing: Dir,
    pub mode: Mode,
    pub flashing: bool,
}

/// Everything a renderer or HUD needs after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub player: PlayerView,
    pub pursuers: Vec<PursuerView>,
    pub level: u32,
    pub score: u32,
    pub lives: u32,
    pub pellets_left: u32,
    pub fruit: Option<Fruit>,
    pub fruit_shelf: Vec<Fruit>,
    pub phase: Phase,
    pub frightened: bool,
    pub paused: bool,
    pub muted: bool,
}

pub struct Simulation {
    maze: Maze,
    pristine: Grid,
    level: u32,
    scheduler: ModeScheduler,
    player: Player,
    pursuers: Vec<Pursuer>,
    board: Scoreboard,
    pellets_total: u32,
    pellets_left: u32,
    elapsed_ticks: u64,
    fruit: Option<Fruit>,
}

impl Simulation {
    pub fn new(level: u32) -> Result<Self, MazeError> {
        Ok(Self::with_maze(Maze::classic()?, level))
    }

    pub fn with_maze(maze: Maze, level: u32) -> Self {
        let pristine = maze.grid.clone();
        let pellets_total = pristine.pellet_count() as u32;
        let player = Player::new(maze.player_start);
        let pursuers = Archetype::ALL
            .iter()
            .map(|&archetype| Pursuer::new(archetype, &maze))
            .collect();
        info!(level, pellets = pellets_total, "level started");
        Self {
            maze,
            pristine,
            level,
            scheduler: ModeScheduler::new(level),
            player,
            pursuers,
            board: Scoreboard::new(),
            pellets_total,
            pellets_left: pellets_total,
            elapsed_ticks: 0,
            fruit: None,
        }
    }

    /// Puts every agent back at its start. A restart keeps the eaten pellets
    /// and resumes the schedule; a fresh level restores the pellets.
    pub fn start_level(&mut self, level: u32, restart: bool) {
        self.level = level;
        if restart {
            self.scheduler = ModeScheduler::resumed(level);
        } else {
            self.maze.grid = self.pristine.clone();
            self.pellets_left = self.pellets_total;
            self.scheduler = ModeScheduler::new(level);
        }
        self.player = Player::new(self.maze.player_start);
        self.pursuers = Archetype::ALL
            .iter()
            .map(|&archetype| Pursuer::new(archetype, &self.maze))
            .collect();
        self.fruit = None;
        self.elapsed_ticks = 0;
        info!(level, restart, pellets_left = self.pellets_left, "level started");
    }

    pub fn steer(&mut self, dir: Dir) {
        self.player.steer(dir);
    }

    /// Advances the world one tick and reports what happened. A lost life
    /// ends the tick early; the caller decides how to restart.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.elapsed_ticks += 1;

        match self.scheduler.tick() {
            Some(ModeChange::Phase(phase)) => {
                for pursuer in &mut self.pursuers {
                    pursuer.set_phase(phase);
                }
                events.push(GameEvent::PhaseChanged(phase));
            }
            Some(ModeChange::FrightenedOver) => {
                let phase = self.scheduler.phase();
                for pursuer in &mut self.pursuers {
                    pursuer.calm(phase);
                }
                events.push(GameEvent::FrightenedOver);
            }
            None => {}
        }

        let grid = &self.maze.grid;
        let player_from = self.player.cell(grid);
        let pursuers_from: Vec<Pos> = self.pursuers.iter().map(|p| p.cell(grid)).collect();

        self.player.advance(&self.maze.grid);
        self.advance_pursuers(rng);

        if self.resolve_contacts(player_from, &pursuers_from, &mut events) {
            return events;
        }
        self.resolve_pickups(&mut events);
        events
    }

    fn advance_pursuers(&mut self, rng: &mut impl Rng) {
        let Self {
            maze,
            scheduler,
            player,
            pursuers,
            level,
            pellets_total,
            pellets_left,
            ..
        } = self;
        let maze: &Maze = maze;
        let grid = &maze.grid;
        let player_cell = player.cell(grid);

        for ix in 0..pursuers.len() {
            let leader = pursuers[0].cell(grid);
            let ctx = PursuitContext {
                maze,
                level: *level,
                phase: scheduler.phase(),
                frightened: scheduler.is_frightened(),
                player: player_cell,
                player_dir: player.facing(),
                leader,
                active_secs: scheduler.active_secs(),
                pellets_eaten: *pellets_total - *pellets_left,
                pellets_left: *pellets_left,
            };
            pursuers[ix].advance(&ctx, rng);
        }
    }

    /// Returns true when the player was caught. Sharing a cell is contact,
    /// and so is swapping cells head-on within the tick.
    fn resolve_contacts(
        &mut self,
        player_from: Pos,
        pursuers_from: &[Pos],
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let grid = &self.maze.grid;
        let player_cell = self.player.cell(grid);
        let touching: Vec<usize> = self
            .pursuers
            .iter()
            .zip(pursuers_from)
            .enumerate()
            .filter(|(_, (p, from))| {
                let cell = p.cell(grid);
                cell == player_cell || (cell == player_from && **from == player_cell)
            })
            .map(|(ix, _)| ix)
            .collect();

        for ix in touching {
            let archetype = self.pursuers[ix].archetype();
            match self.pursuers[ix].mode() {
                Mode::Frightened => {
                    self.pursuers[ix].eaten();
                    debug!(archetype = archetype.name(), "pursuer eaten");
                    self.record(
                        GameEvent::PursuerEaten {
                            archetype,
                            points: PURSUER_POINTS,
                        },
                        events,
                    );
                }
                Mode::Patrol | Mode::Pursue => {
                    let lives_left = self.board.lose_life();
                    debug!(archetype = archetype.name(), lives_left, "player caught");
                    events.push(GameEvent::LifeLost { lives_left });
                    return true;
                }
                Mode::Housed | Mode::Retreating => {}
            }
        }
        false
    }

    fn resolve_pickups(&mut self, events: &mut Vec<GameEvent>) {
        let here = self.player.cell(&self.maze.grid);
        let eaten = self.maze.grid.take_pellet(here);
        match eaten {
            Some(Pellet::Dot) => {
                self.pellets_left -= 1;
                self.record(GameEvent::PelletEaten { points: DOT_POINTS }, events);
            }
            Some(Pellet::Energizer) => {
                self.pellets_left -= 1;
                self.scheduler.frighten();
                for pursuer in &mut self.pursuers {
                    pursuer.frighten(&self.maze.grid);
                }
                self.record(
                    GameEvent::EnergizerEaten {
                        points: ENERGIZER_POINTS,
                    },
                    events,
                );
            }
            None => {}
        }

        if eaten.is_some() && self.fruit.is_none() && FRUIT_THRESHOLDS.contains(&self.pellets_left) {
            let fruit = self.board.next_fruit();
            self.fruit = Some(fruit);
            events.push(GameEvent::FruitShown { fruit });
        }

        if self.fruit.is_some() && here == self.maze.fruit_cell {
            self.fruit = None;
            let fruit = self.board.eat_fruit();
            let points = fruit.points();
            self.record(GameEvent::FruitEaten { fruit, points }, events);
        }

        if self.pellets_left == 0 {
            info!(level = self.level, score = self.board.score(), "level cleared");
            events.push(GameEvent::LevelCleared { level: self.level });
        }
    }

    /// Pushes a scoring event and banks its points.
    fn record(&mut self, event: GameEvent, events: &mut Vec<GameEvent>) {
        events.push(event);
        if self.board.award(event.points()) {
            events.push(GameEvent::ExtraLife {
                lives: self.board.lives(),
            });
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let grid = &self.maze.grid;
        let flashing = self.scheduler.flashing();
        Snapshot {
            player: PlayerView {
                position: self.player.position(),
                cell: self.player.cell(grid),
                facing: self.player.facing(),
            },
            pursuers: self
                .pursuers
                .iter()
                .map(|p| PursuerView {
                    archetype: p.archetype(),
                    position: p.position(),
                    cell: p.cell(grid),
                    facing: p.facing(),
                    mode: p.mode(),
                    flashing: flashing && p.mode() == Mode::Frightened,
                })
                .collect(),
            level: self.level,
            score: self.board.score(),
            lives: self.board.lives(),
            pellets_left: self.pellets_left,
            fruit: self.fruit,
            fruit_shelf: self.board.fruit_shelf(),
            phase: self.scheduler.phase(),
            frightened: self.scheduler.is_frightened(),
            paused: false,
            muted: false,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn grid(&self) -> &Grid {
        &self.maze.grid
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn lives(&self) -> u32 {
        self.board.lives()
    }

    pub fn pellets_left(&self) -> u32 {
        self.pellets_left
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn scheduler(&self) -> &ModeScheduler {
        &self.scheduler
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn place_player(&mut self, cell: Pos) {
        self.player = Player::new(cell);
    }

    #[cfg(test)]
    pub(crate) fn place_pursuer(&mut self, pursuer: Pursuer) {
        let ix = pursuer.archetype().index();
        self.pursuers[ix] = pursuer;
    }

    #[cfg(test)]
    pub(crate) fn frighten_now(&mut self) {
        self.scheduler.frighten();
    }

    #[cfg(test)]
    pub(crate) fn leave_only(&mut self, keep: Pos) {
        let cells: Vec<Pos> = self.maze.grid.cells().map(|c| c.pos).collect();
        for pos in cells {
            if pos != keep {
                self.maze.grid.take_pellet(pos);
            }
        }
        self.pellets_left = self.maze.grid.pellet_count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sim() -> Simulation {
        Simulation::new(1).expect("classic maze is valid")
    }

    fn run_until(
        sim: &mut Simulation,
        rng: &mut StdRng,
        ticks: u32,
        pred: impl Fn(&GameEvent) -> bool,
    ) -> Option<GameEvent> {
        for _ in 0..ticks {
            if let Some(hit) = sim.tick(rng).into_iter().find(|e| pred(e)) {
                return Some(hit);
            }
        }
        None
    }

    #[test]
    fn eats_the_next_dot() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(1);
        sim.steer(Dir::Right);
        let hit = run_until(&mut sim, &mut rng, 8, |e| {
            matches!(e, GameEvent::PelletEaten { .. })
        });
        assert_eq!(hit, Some(GameEvent::PelletEaten { points: 10 }));
        assert_eq!(sim.score(), 10);
        assert_eq!(sim.pellets_left(), 243);
    }

    #[test]
    fn energizer_frightens_pursuers_in_play() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(2);
        sim.place_player(Pos::new(1, 4));
        sim.steer(Dir::Up);
        let hit = run_until(&mut sim, &mut rng, 8, |e| {
            matches!(e, GameEvent::EnergizerEaten { .. })
        });
        assert_eq!(hit, Some(GameEvent::EnergizerEaten { points: 50 }));
        assert!(sim.scheduler().is_frightened());

        let modes: Vec<Mode> = sim.pursuers().iter().map(Pursuer::mode).collect();
        assert_eq!(
            modes,
            vec![Mode::Frightened, Mode::Housed, Mode::Housed, Mode::Housed]
        );
        assert!(sim.snapshot().frightened);
    }

    #[test]
    fn frightened_pursuer_is_eaten_on_contact() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(3);
        sim.place_player(Pos::new(9, 14));
        sim.frighten_now();
        sim.place_pursuer(Pursuer::placed(
            Archetype::Ambusher,
            Pos::new(9, 14),
            Dir::Right,
            Mode::Frightened,
        ));

        let events = sim.tick(&mut rng);
        assert!(events.contains(&GameEvent::PursuerEaten {
            archetype: Archetype::Ambusher,
            points: 200,
        }));
        assert_eq!(sim.pursuers()[1].mode(), Mode::Retreating);
        assert_eq!(sim.score(), 200);
    }

    #[test]
    fn active_pursuer_costs_a_life() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(4);
        sim.place_player(Pos::new(9, 14));
        sim.place_pursuer(Pursuer::placed(
            Archetype::Leader,
            Pos::new(9, 14),
            Dir::Right,
            Mode::Pursue,
        ));

        let events = sim.tick(&mut rng);
        assert_eq!(events.last(), Some(&GameEvent::LifeLost { lives_left: 2 }));
        assert_eq!(sim.lives(), 2);
    }

    #[test]
    fn head_on_meeting_costs_a_life_at_every_offset() {
        for delay in 0..12 {
            let mut sim = sim();
            let mut rng = StdRng::seed_from_u64(9);
            sim.place_player(Pos::new(1, 5));
            sim.place_pursuer(Pursuer::placed(
                Archetype::Leader,
                Pos::new(6, 5),
                Dir::Left,
                Mode::Pursue,
            ));
            for _ in 0..delay {
                sim.tick(&mut rng);
            }
            sim.steer(Dir::Right);

            let hit = run_until(&mut sim, &mut rng, 120, |e| {
                matches!(e, GameEvent::LifeLost { .. })
            });
            assert_eq!(hit, Some(GameEvent::LifeLost { lives_left: 2 }), "delay {delay}");
        }
    }

    #[test]
    fn last_pellet_clears_the_level() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(5);
        sim.leave_only(Pos::new(15, 23));
        assert_eq!(sim.pellets_left(), 1);
        sim.steer(Dir::Right);
        let hit = run_until(&mut sim, &mut rng, 8, |e| {
            matches!(e, GameEvent::LevelCleared { .. })
        });
        assert_eq!(hit, Some(GameEvent::LevelCleared { level: 1 }));
    }

    #[test]
    fn restart_keeps_pellets_and_new_level_restores_them() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(6);
        sim.steer(Dir::Right);
        for _ in 0..8 {
            sim.tick(&mut rng);
        }
        assert_eq!(sim.pellets_left(), 243);

        sim.start_level(1, true);
        assert_eq!(sim.pellets_left(), 243);
        assert_eq!(sim.snapshot().player.cell, Pos::new(14, 23));
        assert!(sim.pursuers().iter().all(|p| p.mode() == Mode::Housed));

        sim.start_level(2, false);
        assert_eq!(sim.pellets_left(), 244);
        assert_eq!(sim.level(), 2);
    }

    #[test]
    fn all_pursuers_flip_together() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(7);
        let mut flipped_at = None;
        for tick in 1..=420 {
            let events = sim.tick(&mut rng);
            if events.contains(&GameEvent::PhaseChanged(Phase::Chase)) {
                flipped_at = Some(tick);
            }
        }
        assert_eq!(flipped_at, Some(420));
        assert!(sim
            .pursuers()
            .iter()
            .all(|p| matches!(p.mode(), Mode::Pursue | Mode::Housed)));
        assert_eq!(sim.pursuers()[0].mode(), Mode::Pursue);
    }

    #[test]
    fn fruit_appears_at_the_threshold() {
        let mut sim = sim();
        let mut rng = StdRng::seed_from_u64(8);
        sim.leave_only(Pos::new(15, 23));
        sim.pellets_left = FRUIT_THRESHOLDS[0] + 1;
        sim.steer(Dir::Right);
        let hit = run_until(&mut sim, &mut rng, 8, |e| {
            matches!(e, GameEvent::FruitShown { .. })
        });
        assert_eq!(hit, Some(GameEvent::FruitShown { fruit: Fruit::Cherry }));
        assert_eq!(sim.snapshot().fruit, Some(Fruit::Cherry));
    }
}
