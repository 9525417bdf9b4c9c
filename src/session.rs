//! Game flow around the simulation: restarts after a lost life, level
//! progression, pause and mute.

use rand::Rng;
use tracing::info;

use crate::error::MazeError;
use crate::event::GameEvent;
use crate::grid::Dir;
use crate::sim::{Simulation, Snapshot};

pub const LAST_LEVEL: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
    Won,
}

/// Discrete player input, delivered between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Steer(Dir),
    TogglePause,
    ToggleMute,
}

pub struct Session {
    sim: Simulation,
    status: Status,
    paused: bool,
    muted: bool,
}

impl Session {
    pub fn new(start_level: u32) -> Result<Self, MazeError> {
        let level = start_level.clamp(1, LAST_LEVEL);
        Ok(Self::from_simulation(Simulation::new(level)?))
    }

    pub fn from_simulation(sim: Simulation) -> Self {
        Self {
            sim,
            status: Status::Playing,
            paused: false,
            muted: false,
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Steer(dir) => self.sim.steer(dir),
            Command::TogglePause => self.paused = !self.paused,
            Command::ToggleMute => self.muted = !self.muted,
        }
    }

    /// Runs one tick unless paused or finished, then applies the game-flow
    /// consequences of what happened.
    pub fn tick(&mut self, rng: &mut impl Rng) -> Vec<GameEvent> {
        if self.paused || self.status != Status::Playing {
            return Vec::new();
        }

        let events = self.sim.tick(rng);
        for event in &events {
            match *event {
                GameEvent::LifeLost { lives_left: 0 } => {
                    self.status = Status::GameOver;
                    info!(score = self.sim.score(), level = self.sim.level(), "game over");
                }
                GameEvent::LifeLost { .. } => {
                    self.sim.start_level(self.sim.level(), true);
                }
                GameEvent::LevelCleared { level } if level >= LAST_LEVEL => {
                    self.status = Status::Won;
                    info!(score = self.sim.score(), "all levels cleared");
                }
                GameEvent::LevelCleared { level } => {
                    self.sim.start_level(level + 1, false);
                }
                _ => {}
            }
        }
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            paused: self.paused,
            muted: self.muted,
            ..self.sim.snapshot()
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Score handed to the score store when the run ends.
    pub fn final_score(&self) -> u32 {
        self.sim.score()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    #[cfg(test)]
    pub(crate) fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::Archetype;
    use crate::grid::Pos;
    use crate::pursuer::{Mode, Pursuer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn caught(session: &mut Session, rng: &mut StdRng) -> Vec<GameEvent> {
        let sim = session.simulation_mut();
        sim.place_player(Pos::new(9, 14));
        sim.place_pursuer(Pursuer::placed(
            Archetype::Leader,
            Pos::new(9, 14),
            Dir::Up,
            Mode::Pursue,
        ));
        session.tick(rng)
    }

    #[test]
    fn pause_freezes_the_world() {
        let mut session = Session::new(1).expect("classic maze is valid");
        let mut rng = StdRng::seed_from_u64(1);
        session.handle(Command::Steer(Dir::Right));
        session.handle(Command::TogglePause);
        for _ in 0..30 {
            assert!(session.tick(&mut rng).is_empty());
        }
        assert_eq!(session.simulation().elapsed_ticks(), 0);
        assert!(session.snapshot().paused);

        session.handle(Command::TogglePause);
        session.tick(&mut rng);
        assert_eq!(session.simulation().elapsed_ticks(), 1);
    }

    #[test]
    fn mute_is_reported_in_the_snapshot() {
        let mut session = Session::new(1).expect("classic maze is valid");
        session.handle(Command::ToggleMute);
        assert!(session.snapshot().muted);
        assert!(session.is_muted());
    }

    #[test]
    fn lost_life_restarts_the_level() {
        let mut session = Session::new(3).expect("classic maze is valid");
        let mut rng = StdRng::seed_from_u64(2);
        let events = caught(&mut session, &mut rng);
        assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
        assert_eq!(session.status(), Status::Playing);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.level, 3);
        assert_eq!(snapshot.player.cell, Pos::new(14, 23));
        assert!(snapshot.pursuers.iter().all(|p| p.mode == Mode::Housed));
    }

    #[test]
    fn last_life_ends_the_run() {
        let mut session = Session::new(1).expect("classic maze is valid");
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..3 {
            caught(&mut session, &mut rng);
        }
        assert_eq!(session.status(), Status::GameOver);
        assert!(session.tick(&mut rng).is_empty());
    }

    #[test]
    fn clearing_a_level_advances() {
        let mut session = Session::new(1).expect("classic maze is valid");
        let mut rng = StdRng::seed_from_u64(4);
        session.simulation_mut().leave_only(Pos::new(15, 23));
        session.handle(Command::Steer(Dir::Right));
        for _ in 0..8 {
            session.tick(&mut rng);
        }
        assert_eq!(session.simulation().level(), 2);
        assert_eq!(session.simulation().pellets_left(), 244);
        assert_eq!(session.status(), Status::Playing);
    }

    #[test]
    fn clearing_the_last_level_wins() {
        let mut session = Session::new(LAST_LEVEL).expect("classic maze is valid");
        let mut rng = StdRng::seed_from_u64(5);
        session.simulation_mut().leave_only(Pos::new(15, 23));
        session.handle(Command::Steer(Dir::Right));
        for _ in 0..8 {
            session.tick(&mut rng);
        }
        assert_eq!(session.status(), Status::Won);
    }
}
