//! Best-first route search over the grid.
//!
//! Each call owns its scratch arrays, so searches never observe each other and
//! nothing needs resetting afterwards.

use std::collections::VecDeque;

use tracing::trace;

use crate::grid::{Dir, Grid, Pos};

/// One-shot sequence of unit steps. Steps are consumed from the front; an
/// empty route means the walker has arrived.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    steps: VecDeque<Dir>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn straight(dir: Dir, len: usize) -> Self {
        std::iter::repeat(dir).take(len).collect()
    }

    pub fn single(dir: Dir) -> Self {
        Self::straight(dir, 1)
    }

    pub fn next_step(&mut self) -> Option<Dir> {
        self.steps.pop_front()
    }

    pub fn peek(&self) -> Option<Dir> {
        self.steps.front().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = Dir> + '_ {
        self.steps.iter().copied()
    }
}

impl FromIterator<Dir> for Route {
    fn from_iter<I: IntoIterator<Item = Dir>>(iter: I) -> Self {
        Route {
            steps: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unseen,
    Frontier,
    Explored,
}

/// Finds a route from `start` to `goal`, or `None` when the goal cannot be
/// reached or either end lies off the grid.
///
/// The frontier is scanned for the lowest `cost + manhattan` and the first
/// minimum wins. Explored cells are never reopened, so the route is not
/// guaranteed to be the shortest one.
pub fn find_path(grid: &Grid, start: Pos, goal: Pos) -> Option<Route> {
    let (Some(from), Some(to)) = (grid.index(start), grid.index(goal)) else {
        trace!(?start, ?goal, "search endpoint off the grid");
        return None;
    };
    if from == to {
        return Some(Route::new());
    }

    let mut cost = vec![u32::MAX; grid.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];
    let mut mark = vec![Mark::Unseen; grid.len()];
    let mut frontier = vec![from];
    cost[from] = 0;
    mark[from] = Mark::Frontier;

    while !frontier.is_empty() {
        let slot = cheapest(grid, &frontier, &cost, goal);
        let current = frontier.remove(slot);
        if current == to {
            return Some(rebuild(grid, &came_from, from, to));
        }
        mark[current] = Mark::Explored;

        let here = grid.pos_of(current);
        for next in grid.neighbors(here) {
            let Some(ix) = grid.index(next) else { continue };
            if mark[ix] == Mark::Explored {
                continue;
            }
            if mark[ix] == Mark::Unseen {
                mark[ix] = Mark::Frontier;
                frontier.push(ix);
            }
            if cost[current] + 1 < cost[ix] {
                cost[ix] = cost[current] + 1;
                came_from[ix] = Some(current);
            }
        }
    }

    trace!(?start, ?goal, "goal unreachable");
    None
}

fn cheapest(grid: &Grid, frontier: &[usize], cost: &[u32], goal: Pos) -> usize {
    let mut best = 0;
    let mut best_score = u32::MAX;
    for (slot, &ix) in frontier.iter().enumerate() {
        let score = cost[ix].saturating_add(grid.pos_of(ix).manhattan(goal));
        if score < best_score {
            best = slot;
            best_score = score;
        }
    }
    best
}

fn rebuild(grid: &Grid, came_from: &[Option<usize>], from: usize, to: usize) -> Route {
    let mut cells = vec![to];
    let mut cursor = to;
    while cursor != from {
        match came_from[cursor] {
            Some(prev) => {
                cells.push(prev);
                cursor = prev;
            }
            None => break,
        }
    }
    cells.reverse();

    cells
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (grid.pos_of(pair[0]), grid.pos_of(pair[1]));
            Dir::from_delta(b.x - a.x, b.y - a.y)
        })
        .collect()
}
