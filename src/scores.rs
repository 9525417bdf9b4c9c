//! Persisted score list: one line of comma separated integers.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::ScoreError;

/// Largest score the HUD can show.
pub const SCORE_CAP: u32 = 999_999;

/// Reads every recorded score. A missing or empty file is an empty history.
pub fn load_scores(path: &Path) -> Result<Vec<u32>, ScoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ScoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let line = text.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    line.split(',')
        .map(str::trim)
        .map(|entry| {
            entry.parse::<u32>().map_err(|_| ScoreError::Malformed {
                path: path.to_path_buf(),
                entry: entry.to_string(),
            })
        })
        .collect()
}

/// Best recorded score, capped for display.
pub fn high_score(scores: &[u32]) -> u32 {
    scores.iter().copied().max().unwrap_or(0).min(SCORE_CAP)
}

/// Appends `score`, creating the file when needed. The first entry is
/// written bare, later ones after `", "`.
pub fn append_score(path: &Path, score: u32) -> Result<(), ScoreError> {
    let io_err = |source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let has_entries = match fs::read_to_string(path) {
        Ok(text) => !text.trim().is_empty(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(source) => return Err(io_err(source)),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    let entry = if has_entries {
        format!(", {score}")
    } else {
        score.to_string()
    };
    file.write_all(entry.as_bytes()).map_err(io_err)
}
