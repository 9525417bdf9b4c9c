//! Runtime settings read once from the environment.

use std::path::PathBuf;

use crate::session::LAST_LEVEL;

pub const DEFAULT_TICK_MS: u64 = 16;
pub const DEFAULT_RENDER_FPS: u64 = 120;
pub const DEFAULT_SCORES_PATH: &str = "scores.txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub start_level: u32,
    pub scores_path: PathBuf,
    /// Log file; logging stays off without one because the terminal owns
    /// stdout.
    pub log_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            start_level: 1,
            scores_path: PathBuf::from(DEFAULT_SCORES_PATH),
            log_path: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Unparsable or out-of-range
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        let tick_ms = positive("MAZECHASE_TICK_MS", defaults.tick_ms);
        let render_fps = positive("MAZECHASE_FPS", defaults.render_fps);
        let start_level = lookup("MAZECHASE_LEVEL")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| (1..=LAST_LEVEL).contains(v))
            .unwrap_or(defaults.start_level);
        let scores_path = lookup("MAZECHASE_SCORES")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.scores_path);
        let log_path = lookup("MAZECHASE_LOG")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            tick_ms,
            render_fps,
            start_level,
            scores_path,
            log_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("MAZECHASE_TICK_MS", "20"),
            ("MAZECHASE_FPS", "60"),
            ("MAZECHASE_LEVEL", "5"),
            ("MAZECHASE_SCORES", "/tmp/s.txt"),
            ("MAZECHASE_LOG", "run.log"),
        ]);
        assert_eq!(s.tick_ms, 20);
        assert_eq!(s.render_fps, 60);
        assert_eq!(s.start_level, 5);
        assert_eq!(s.scores_path, PathBuf::from("/tmp/s.txt"));
        assert_eq!(s.log_path, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[
            ("MAZECHASE_TICK_MS", "0"),
            ("MAZECHASE_FPS", "fast"),
            ("MAZECHASE_LEVEL", "17"),
            ("MAZECHASE_LOG", " "),
        ]);
        assert_eq!(s.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(s.render_fps, DEFAULT_RENDER_FPS);
        assert_eq!(s.start_level, 1);
        assert_eq!(s.log_path, None);
    }
}
