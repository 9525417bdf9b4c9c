//! Level-wide scatter/chase timer and the frightened countdown.
//!
//! Everything here is a function of the level number and elapsed active
//! time, so replaying the same ticks always yields the same phases.

use tracing::debug;

pub const TICKS_PER_SECOND: u32 = 60;

/// Remaining frightened seconds at which pursuers start flashing.
const FLASH_ON: [f64; 5] = [3.3, 2.65, 1.98, 1.32, 0.65];
/// Remaining frightened seconds at which they stop again.
const FLASH_OFF: [f64; 5] = [2.97, 2.32, 1.65, 0.98, 0.33];

/// First Scatter to Chase flip, in seconds. Restarts resume just before it.
const FIRST_CHASE_SECS: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Scatter,
    Chase,
}

/// Seconds of active time at which the phase flips for `level`.
pub fn breakpoints(level: u32) -> [u32; 7] {
    let d = u32::from(level >= 4) + u32::from(level >= 10);
    [
        FIRST_CHASE_SECS,
        27,
        34 - 2 * d,
        54 - 2 * d,
        59 - 4 * d,
        79 + 4 * d,
        84 + 4 * d,
    ]
}

/// Scatter before the first breakpoint, alternating at each one, Chase after
/// the last.
pub fn phase_at(level: u32, active_secs: f64) -> Phase {
    let passed = breakpoints(level)
        .iter()
        .filter(|&&secs| f64::from(secs) <= active_secs)
        .count();
    if passed % 2 == 0 {
        Phase::Scatter
    } else {
        Phase::Chase
    }
}

pub fn frightened_secs(level: u32) -> u32 {
    10u32.saturating_sub(level / 2).max(1)
}

/// Whether frightened pursuers should be drawn flashing with `remaining`
/// seconds left: the nearest checkpoint at or above `remaining` decides.
pub fn flashing(remaining: f64) -> bool {
    let next_on = FLASH_ON
        .iter()
        .copied()
        .filter(|&c| c >= remaining)
        .reduce(f64::min);
    let next_off = FLASH_OFF
        .iter()
        .copied()
        .filter(|&c| c >= remaining)
        .reduce(f64::min);
    match (next_on, next_off) {
        (Some(on), Some(off)) => on < off,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Something every pursuer must hear about in the tick it happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChange {
    Phase(Phase),
    FrightenedOver,
}

#[derive(Clone, Debug)]
pub struct ModeScheduler {
    level: u32,
    active_ticks: u32,
    fright_ticks_left: u32,
    phase: Phase,
}

impl ModeScheduler {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            active_ticks: 0,
            fright_ticks_left: 0,
            phase: phase_at(level, 0.0),
        }
    }

    /// Schedule for a level restarted after a lost life: one tick short of
    /// the first chase.
    pub fn resumed(level: u32) -> Self {
        let active_ticks = FIRST_CHASE_SECS * TICKS_PER_SECOND - 1;
        Self {
            level,
            active_ticks,
            fright_ticks_left: 0,
            phase: phase_at(level, f64::from(active_ticks) / f64::from(TICKS_PER_SECOND)),
        }
    }

    /// Advances one tick. Active time stands still while frightened.
    pub fn tick(&mut self) -> Option<ModeChange> {
        if self.fright_ticks_left > 0 {
            self.fright_ticks_left -= 1;
            if self.fright_ticks_left == 0 {
                debug!(level = self.level, "frightened mode over");
                return Some(ModeChange::FrightenedOver);
            }
            return None;
        }

        self.active_ticks += 1;
        let phase = phase_at(self.level, self.active_secs());
        if phase == self.phase {
            return None;
        }
        self.phase = phase;
        debug!(level = self.level, secs = self.active_secs(), ?phase, "phase flip");
        Some(ModeChange::Phase(phase))
    }

    /// Starts, or restarts, the frightened countdown.
    pub fn frighten(&mut self) {
        self.fright_ticks_left = frightened_secs(self.level) * TICKS_PER_SECOND;
    }

    pub fn is_frightened(&self) -> bool {
        self.fright_ticks_left > 0
    }

    pub fn flashing(&self) -> bool {
        self.is_frightened()
            && flashing(f64::from(self.fright_ticks_left) / f64::from(TICKS_PER_SECOND))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn active_secs(&self) -> f64 {
        f64::from(self.active_ticks) / f64::from(TICKS_PER_SECOND)
    }
}
