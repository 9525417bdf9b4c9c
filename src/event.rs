use crate::archetype::Archetype;
use crate::schedule::Phase;
use crate::scoring::Fruit;

/// Something that happened during a tick, for scoring, sound and HUD
/// collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PelletEaten { points: u32 },
    EnergizerEaten { points: u32 },
    FruitShown { fruit: Fruit },
    FruitEaten { fruit: Fruit, points: u32 },
    PursuerEaten { archetype: Archetype, points: u32 },
    ExtraLife { lives: u32 },
    LifeLost { lives_left: u32 },
    LevelCleared { level: u32 },
    PhaseChanged(Phase),
    FrightenedOver,
}

impl GameEvent {
    /// Points this event adds to the score.
    pub fn points(&self) -> u32 {
        match *self {
            GameEvent::PelletEaten { points }
            | GameEvent::EnergizerEaten { points }
            | GameEvent::FruitEaten { points, .. }
            | GameEvent::PursuerEaten { points, .. } => points,
            _ => 0,
        }
    }
}
