use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::grid::Pos;

/// Problems found while loading a maze layout.
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {ch:?} at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
    #[error("{what} at ({}, {}) is not a field cell", .pos.x, .pos.y)]
    NotField { what: &'static str, pos: Pos },
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to access score file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score file {} holds malformed entry {entry:?}", .path.display())]
    Malformed { path: PathBuf, entry: String },
}
