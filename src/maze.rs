//! The fixed arcade layout and the hand-placed tables that go with it.

use crate::archetype::Archetype;
use crate::error::MazeError;
use crate::grid::{Dir, Grid, Pos};
use crate::path::Route;

const CLASSIC_ROWS: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###--### ##.######",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

const CLASSIC_DECISION_POINTS: [(i32, i32); 35] = [
    (6, 1),
    (21, 1),
    (26, 1),
    (1, 5),
    (6, 5),
    (9, 5),
    (12, 5),
    (15, 5),
    (18, 5),
    (21, 5),
    (26, 5),
    (6, 8),
    (21, 8),
    (12, 11),
    (15, 11),
    (6, 14),
    (9, 14),
    (18, 14),
    (21, 14),
    (9, 17),
    (18, 17),
    (6, 20),
    (9, 20),
    (18, 20),
    (21, 20),
    (6, 23),
    (9, 23),
    (12, 23),
    (15, 23),
    (18, 23),
    (21, 23),
    (3, 26),
    (12, 26),
    (15, 26),
    (24, 26),
];

/// A wraparound corridor row. Cells outside the two mouths are slow going
/// and pursuers cross them on a fixed straight run instead of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tunnel {
    pub row: i32,
    pub left_mouth: i32,
    pub right_mouth: i32,
}

impl Tunnel {
    pub fn contains(&self, pos: Pos) -> bool {
        pos.y == self.row && (pos.x <= self.left_mouth || pos.x >= self.right_mouth)
    }

    /// The straight run through the open edge when `pos` is a mouth and
    /// `dir` heads out of the maze.
    pub fn run_from(&self, pos: Pos, dir: Dir, width: i32) -> Option<Route> {
        if pos.y != self.row {
            return None;
        }
        match dir {
            Dir::Left if pos.x == self.left_mouth => {
                Some(Route::straight(dir, (self.left_mouth + 1) as usize))
            }
            Dir::Right if pos.x == self.right_mouth => {
                Some(Route::straight(dir, (width - self.right_mouth) as usize))
            }
            _ => None,
        }
    }
}

/// Where a pursuer waits while housed and which way it starts pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PenBerth {
    pub cell: Pos,
    pub facing: Dir,
}

/// Two-cell scatter circuit: the archetype's corner plus one waypoint it
/// shuttles to once the corner is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatrolLoop {
    pub corner: Pos,
    pub waypoint: Pos,
}

impl PatrolLoop {
    pub fn leg(&self, index: usize) -> Pos {
        if index % 2 == 0 {
            self.corner
        } else {
            self.waypoint
        }
    }
}

#[derive(Clone, Debug)]
pub struct Maze {
    pub grid: Grid,
    pub decision_points: Vec<Pos>,
    pub tunnels: Vec<Tunnel>,
    pub player_start: Pos,
    pub fruit_cell: Pos,
    pub pen_exit: Pos,
    pub home: Pos,
    berths: [PenBerth; 4],
    patrol_loops: [PatrolLoop; 4],
}

impl Maze {
    /// The 28x31 arcade layout.
    pub fn classic() -> Result<Maze, MazeError> {
        let grid = Grid::from_rows(&CLASSIC_ROWS)?;
        let maze = Maze {
            grid,
            decision_points: CLASSIC_DECISION_POINTS
                .iter()
                .map(|&(x, y)| Pos::new(x, y))
                .collect(),
            tunnels: vec![Tunnel {
                row: 14,
                left_mouth: 5,
                right_mouth: 22,
            }],
            player_start: Pos::new(14, 23),
            fruit_cell: Pos::new(13, 17),
            pen_exit: Pos::new(13, 11),
            home: Pos::new(13, 14),
            berths: [
                PenBerth { cell: Pos::new(14, 11), facing: Dir::Left },
                PenBerth { cell: Pos::new(13, 13), facing: Dir::Down },
                PenBerth { cell: Pos::new(11, 15), facing: Dir::Up },
                PenBerth { cell: Pos::new(15, 15), facing: Dir::Up },
            ],
            patrol_loops: [
                PatrolLoop { corner: Pos::new(26, 1), waypoint: Pos::new(22, 5) },
                PatrolLoop { corner: Pos::new(1, 1), waypoint: Pos::new(6, 5) },
                PatrolLoop { corner: Pos::new(21, 23), waypoint: Pos::new(19, 29) },
                PatrolLoop { corner: Pos::new(7, 23), waypoint: Pos::new(7, 29) },
            ],
        };
        maze.validate()?;
        Ok(maze)
    }

    /// Checks that every hand-placed cell sits on the field.
    pub fn validate(&self) -> Result<(), MazeError> {
        let mut literals = vec![
            ("player start", self.player_start),
            ("fruit cell", self.fruit_cell),
            ("pen exit", self.pen_exit),
            ("home", self.home),
        ];
        literals.extend(self.decision_points.iter().map(|&p| ("decision point", p)));
        for tunnel in &self.tunnels {
            literals.push(("tunnel mouth", Pos::new(tunnel.left_mouth, tunnel.row)));
            literals.push(("tunnel mouth", Pos::new(tunnel.right_mouth, tunnel.row)));
        }
        for berth in &self.berths {
            literals.push(("pen berth", berth.cell));
        }
        for patrol in &self.patrol_loops {
            literals.push(("patrol corner", patrol.corner));
            literals.push(("patrol waypoint", patrol.waypoint));
        }

        match literals.into_iter().find(|&(_, pos)| !self.grid.is_field(pos)) {
            Some((what, pos)) => Err(MazeError::NotField { what, pos }),
            None => Ok(()),
        }
    }

    pub fn berth(&self, archetype: Archetype) -> PenBerth {
        self.berths[archetype.index()]
    }

    pub fn patrol(&self, archetype: Archetype) -> PatrolLoop {
        self.patrol_loops[archetype.index()]
    }

    pub fn corner(&self, archetype: Archetype) -> Pos {
        self.patrol(archetype).corner
    }

    pub fn is_decision_point(&self, pos: Pos) -> bool {
        self.decision_points.contains(&pos)
    }

    pub fn in_tunnel(&self, pos: Pos) -> bool {
        self.tunnels.iter().any(|tunnel| tunnel.contains(pos))
    }

    pub fn tunnel_run(&self, pos: Pos, dir: Dir) -> Option<Route> {
        let width = self.grid.width();
        self.tunnels
            .iter()
            .find_map(|tunnel| tunnel.run_from(pos, dir, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pellet;

    #[test]
    fn classic_layout_loads() {
        let maze = Maze::classic().expect("classic maze is valid");
        assert_eq!((maze.grid.width(), maze.grid.height()), (28, 31));
        assert_eq!(maze.grid.pellet_count(), 244);
        let energizers = maze
            .grid
            .cells()
            .filter(|c| c.pellet == Some(Pellet::Energizer))
            .count();
        assert_eq!(energizers, 4);
    }

    #[test]
    fn door_sits_below_the_pen_exit() {
        let maze = Maze::classic().expect("classic maze is valid");
        let below = maze.pen_exit.step(Dir::Down);
        assert!(maze.grid.cell_at(below).is_some_and(|c| c.door));
        assert!(!maze.grid.is_open_for_player(below));
    }

    #[test]
    fn tunnel_cells_and_runs() {
        let maze = Maze::classic().expect("classic maze is valid");
        assert!(maze.in_tunnel(Pos::new(0, 14)));
        assert!(maze.in_tunnel(Pos::new(22, 14)));
        assert!(!maze.in_tunnel(Pos::new(6, 14)));
        assert!(!maze.in_tunnel(Pos::new(0, 13)));

        let run = maze.tunnel_run(Pos::new(5, 14), Dir::Left).expect("mouth");
        assert_eq!(run.len(), 6);
        assert!(maze.tunnel_run(Pos::new(5, 14), Dir::Right).is_none());
        assert_eq!(
            maze.tunnel_run(Pos::new(22, 14), Dir::Right).map(|r| r.len()),
            Some(6)
        );
    }

    #[test]
    fn validate_names_the_bad_literal() {
        let mut maze = Maze::classic().expect("classic maze is valid");
        maze.fruit_cell = Pos::new(0, 0);
        match maze.validate() {
            Err(MazeError::NotField { what, pos }) => {
                assert_eq!(what, "fruit cell");
                assert_eq!(pos, Pos::new(0, 0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn patrol_legs_alternate() {
        let maze = Maze::classic().expect("classic maze is valid");
        let patrol = maze.patrol(Archetype::Shy);
        assert_eq!(patrol.leg(0), Pos::new(7, 23));
        assert_eq!(patrol.leg(1), Pos::new(7, 29));
        assert_eq!(patrol.leg(2), Pos::new(7, 23));
    }
}
