//! Behavioural core of a maze-chase arcade game: a grid path finder, four
//! pursuers sharing one pursuit state machine, a global scatter/chase
//! scheduler and a buffered-input player, stepped together one tick at a time.
//!
//! Rendering, audio and input capture live outside the library; the terminal
//! front-end in `main.rs` is one such collaborator.

pub mod archetype;
pub mod config;
pub mod error;
pub mod event;
pub mod grid;
pub mod maze;
pub mod path;
pub mod player;
pub mod pursuer;
pub mod schedule;
pub mod scores;
pub mod scoring;
pub mod session;
pub mod sim;

pub use archetype::Archetype;
pub use error::{MazeError, ScoreError};
pub use event::GameEvent;
pub use grid::{Dir, Grid, Point, Pos};
pub use maze::Maze;
pub use path::{find_path, Route};
pub use pursuer::Mode;
pub use schedule::{ModeScheduler, Phase};
pub use session::{Command, Session, Status};
pub use sim::{Simulation, Snapshot};
