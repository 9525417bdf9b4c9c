//! Static maze topology: cell kinds, pellet occupancy and the coordinate
//! types every agent shares.

use crate::error::MazeError;

/// Sub-cell units along one cell edge. Agent speeds divide this exactly so a
/// step always ends on a cell boundary.
pub const CELL: i32 = 48;

/// Ring around a cell, scanned `dx` outer and `dy` inner. Only the
/// orthogonal positions are kept.
const NEIGHBOR_SCAN: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Grid coordinate of a cell. Signed so that targets may fall off the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Dir) -> Pos {
        self.ahead(dir, 1)
    }

    pub fn ahead(self, dir: Dir, cells: i32) -> Pos {
        let (dx, dy) = dir.delta();
        Pos::new(self.x + dx * cells, self.y + dy * cells)
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Dir> {
        match (dx, dy) {
            (0, -1) => Some(Dir::Up),
            (0, 1) => Some(Dir::Down),
            (-1, 0) => Some(Dir::Left),
            (1, 0) => Some(Dir::Right),
            _ => None,
        }
    }

    pub fn reverse(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Dir::Left | Dir::Right)
    }
}

/// Continuous position in sub-cell units. A cell's own point is its top-left
/// corner, so `Point::of_cell(p)` is exactly aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn of_cell(pos: Pos) -> Point {
        Point {
            x: pos.x * CELL,
            y: pos.y * CELL,
        }
    }

    pub fn nudged(self, dir: Dir, amount: i32) -> Point {
        let (dx, dy) = dir.delta();
        Point {
            x: self.x + dx * amount,
            y: self.y + dy * amount,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Field,
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pellet {
    Dot,
    Energizer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pos: Pos,
    pub kind: CellKind,
    pub pellet: Option<Pellet>,
    /// Pen door: open to pursuers, closed to the player.
    pub door: bool,
}

impl Cell {
    pub fn is_field(&self) -> bool {
        self.kind == CellKind::Field
    }
}

/// Row-major cell storage. Topology never changes after load; only pellet
/// flags are cleared as they are eaten.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from text rows: `#` wall, `.` dot, `o` energizer,
    /// space empty field, `-` pen door.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Grid, MazeError> {
        let width = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let (kind, pellet, door) = match ch {
                    '#' => (CellKind::Wall, None, false),
                    ' ' => (CellKind::Field, None, false),
                    '.' => (CellKind::Field, Some(Pellet::Dot), false),
                    'o' => (CellKind::Field, Some(Pellet::Energizer), false),
                    '-' => (CellKind::Field, None, true),
                    other => return Err(MazeError::UnknownTile { ch: other, x, y }),
                };
                cells.push(Cell {
                    pos: Pos::new(x as i32, y as i32),
                    kind,
                    pellet,
                    door,
                });
            }
        }

        Ok(Grid {
            width: width as i32,
            height: rows.len() as i32,
            cells,
        })
    }

    pub fn parse(layout: &str) -> Result<Grid, MazeError> {
        let rows: Vec<&str> = layout.lines().collect();
        Self::from_rows(&rows)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn pos_of(&self, index: usize) -> Pos {
        self.cells[index].pos
    }

    pub fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|ix| &self.cells[ix])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn is_field(&self, pos: Pos) -> bool {
        self.cell_at(pos).is_some_and(Cell::is_field)
    }

    /// Field cells orthogonally adjacent to `pos`, in scan order. Diagonal
    /// positions of the surrounding ring are never yielded.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        NEIGHBOR_SCAN
            .iter()
            .map(move |&(dx, dy)| Pos::new(pos.x + dx, pos.y + dy))
            .filter(move |&next| self.is_field(next))
    }

    /// Wraps the column so tunnel exits land on the opposite edge.
    pub fn wrap(&self, pos: Pos) -> Pos {
        Pos::new(pos.x.rem_euclid(self.width), pos.y)
    }

    pub fn wrap_point(&self, point: Point) -> Point {
        Point {
            x: point.x.rem_euclid(self.width * CELL),
            y: point.y,
        }
    }

    /// Cell a continuous position belongs to: nearest cell on each axis,
    /// column wrapped.
    pub fn cell_of(&self, point: Point) -> Pos {
        Pos::new(
            (point.x + CELL / 2).div_euclid(CELL).rem_euclid(self.width),
            (point.y + CELL / 2).div_euclid(CELL),
        )
    }

    /// Whether a pursuer may move onto `pos`, allowing for edge wraparound.
    pub fn is_passable(&self, pos: Pos) -> bool {
        self.is_field(self.wrap(pos))
    }

    /// Whether the player may move onto `pos`. The pen door counts as wall.
    pub fn is_open_for_player(&self, pos: Pos) -> bool {
        self.cell_at(self.wrap(pos))
            .is_some_and(|cell| cell.is_field() && !cell.door)
    }

    pub fn take_pellet(&mut self, pos: Pos) -> Option<Pellet> {
        let ix = self.index(pos)?;
        self.cells[ix].pellet.take()
    }

    pub fn pellet_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.pellet.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows(&["#####", "#.o #", "#.#-#", "     ", "#####"]).expect("valid layout")
    }

    #[test]
    fn parses_tiles_and_pellets() {
        let grid = sample();
        assert_eq!((grid.width(), grid.height()), (5, 5));
        assert_eq!(grid.pellet_count(), 3);
        let door = grid.cell_at(Pos::new(3, 2)).expect("in range");
        assert!(door.is_field() && door.door);
        assert_eq!(
            grid.cell_at(Pos::new(2, 1)).and_then(|c| c.pellet),
            Some(Pellet::Energizer)
        );
    }

    #[test]
    fn rejects_ragged_and_unknown_rows() {
        assert!(matches!(
            Grid::from_rows(&["###", "##"]),
            Err(MazeError::RaggedRow { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            Grid::from_rows(&["#x#"]),
            Err(MazeError::UnknownTile { ch: 'x', x: 1, y: 0 })
        ));
        assert!(matches!(Grid::parse(""), Err(MazeError::Empty)));
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let grid = sample();
        assert!(grid.cell_at(Pos::new(-1, 0)).is_none());
        assert!(grid.cell_at(Pos::new(5, 0)).is_none());
        assert!(!grid.is_field(Pos::new(0, 9)));
    }

    #[test]
    fn neighbors_skip_walls_and_diagonals() {
        let grid = sample();
        let around: Vec<Pos> = grid.neighbors(Pos::new(2, 1)).collect();
        assert_eq!(around, vec![Pos::new(1, 1), Pos::new(3, 1)]);

        let corridor: Vec<Pos> = grid.neighbors(Pos::new(1, 3)).collect();
        assert_eq!(
            corridor,
            vec![Pos::new(0, 3), Pos::new(1, 2), Pos::new(2, 3)]
        );
    }

    #[test]
    fn door_blocks_only_the_player() {
        let grid = sample();
        assert!(grid.is_passable(Pos::new(3, 2)));
        assert!(!grid.is_open_for_player(Pos::new(3, 2)));
    }

    #[test]
    fn columns_wrap_at_the_edges() {
        let grid = sample();
        assert_eq!(grid.wrap(Pos::new(-1, 3)), Pos::new(4, 3));
        assert!(grid.is_open_for_player(Pos::new(-1, 3)));
        assert_eq!(grid.cell_of(Point { x: -6, y: 3 * CELL }), Pos::new(0, 3));
        let wrapped = grid.wrap_point(Point { x: -6, y: 3 * CELL });
        assert_eq!(wrapped.x, 5 * CELL - 6);
        assert_eq!(grid.cell_of(wrapped), Pos::new(0, 3));
    }

    #[test]
    fn cell_of_rounds_to_the_nearest_cell() {
        let grid = sample();
        assert_eq!(grid.cell_of(Point { x: 48 + 23, y: 48 }), Pos::new(1, 1));
        assert_eq!(grid.cell_of(Point { x: 48 + 24, y: 48 }), Pos::new(2, 1));
    }

    #[test]
    fn pellets_are_taken_once() {
        let mut grid = sample();
        assert_eq!(grid.take_pellet(Pos::new(1, 1)), Some(Pellet::Dot));
        assert_eq!(grid.take_pellet(Pos::new(1, 1)), None);
        assert_eq!(grid.pellet_count(), 2);
    }
}
