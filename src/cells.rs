use rand::seq::SliceRandom;
use rand::Rng;
use std::convert::From;
use std::fmt;

/// The binary state of a single maze cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellState {
    Wall,
    Passage,
}

impl CellState {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == CellState::Wall
    }

    #[inline]
    pub fn is_passage(self) -> bool {
        self == CellState::Passage
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: u32,
    pub y: u32,
}

impl GridCoordinate {
    pub fn new(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_width: usize) -> GridCoordinate {
        let x = index % row_width;
        let y = index / row_width;
        GridCoordinate::new(x as u32, y as u32)
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(x_y_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    /// The four directions in a random order.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> [CompassPrimary; 4] {
        let mut dirs = CompassPrimary::ALL;
        dirs.shuffle(rng);
        dirs
    }

    /// Unit step (dx, dy) for this direction, y grows southwards.
    #[inline]
    pub fn delta(self) -> (i64, i64) {
        match self {
            CompassPrimary::North => (0, -1),
            CompassPrimary::South => (0, 1),
            CompassPrimary::East => (1, 0),
            CompassPrimary::West => (-1, 0),
        }
    }

    /// Creates a new coordinate `steps` cells away in this direction.
    /// Returns None if the coordinate is not representable (negative).
    /// No upper bound check is made, that is up to the grid.
    pub fn offset(self, coord: GridCoordinate, steps: u32) -> Option<GridCoordinate> {
        let (dx, dy) = self.delta();
        let x = i64::from(coord.x) + dx * i64::from(steps);
        let y = i64::from(coord.y) + dy * i64::from(steps);
        if x < 0 || y < 0 || x > i64::from(u32::MAX) || y > i64::from(u32::MAX) {
            None
        } else {
            Some(GridCoordinate::new(x as u32, y as u32))
        }
    }
}
