use rand::Rng;
use tracing::debug;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Chance of any one cell becoming a wall in a noise maze.
pub const DEFAULT_WALL_PROBABILITY: f64 = 0.3;

/// The cell every backtracker maze is carved from.
pub const BACKTRACK_START: GridCoordinate = GridCoordinate { x: 1, y: 1 };

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Algorithm {
    /// Independent random walls plus a solid border. No connectivity guarantee.
    Noise { wall_probability: f64 },
    /// Randomized recursive backtracking, a perfect maze rooted at (1, 1).
    Backtrack,
}

impl Algorithm {
    pub fn noise() -> Algorithm {
        Algorithm::Noise { wall_probability: DEFAULT_WALL_PROBABILITY }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Backtrack
    }
}

/// Build a new maze grid of the given dimensions with the chosen algorithm.
pub fn generate<R>(width: Width, height: Height, algorithm: Algorithm, rng: &mut R) -> Result<Grid>
    where R: Rng + ?Sized
{
    let mut grid = Grid::new(width, height)?;

    match algorithm {
        Algorithm::Noise { wall_probability } => {
            noise_with_border(&mut grid, wall_probability, rng)?
        }
        Algorithm::Backtrack => recursive_backtracker(&mut grid, rng),
    }

    debug!(width = width.0,
           height = height.0,
           ?algorithm,
           passages = grid.passages_count(),
           "generated maze");
    Ok(grid)
}

/// Apply independent per cell noise to the grid.
///
/// Every cell is a wall when a uniform draw falls below `wall_probability` or it lies
/// on the border, and a passage otherwise. A draw is made for every cell, border
/// included, so the same seed always maps to the same cell outcomes.
/// Nothing guarantees that any two passages are connected.
pub fn noise_with_border<R>(grid: &mut Grid, wall_probability: f64, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    if !(0.0..=1.0).contains(&wall_probability) {
        return Err(ErrorKind::InvalidWallProbability(wall_probability).into());
    }

    for coord in grid.iter() {
        let is_wall = rng.gen::<f64>() < wall_probability || grid.is_border(coord);
        if !is_wall {
            grid.carve(coord);
        }
    }
    Ok(())
}

// A pending cell in the carve. Holds the directions shuffled on entry and how many
// of them have been tried, which is exactly the state a recursive call would keep.
struct CarveFrame {
    cell: GridCoordinate,
    directions: [CompassPrimary; 4],
    next: usize,
}

impl CarveFrame {
    fn enter<R: Rng + ?Sized>(cell: GridCoordinate, rng: &mut R) -> CarveFrame {
        CarveFrame {
            cell,
            directions: CompassPrimary::shuffled(rng),
            next: 0,
        }
    }
}

/// Apply the recursive backtracker maze generation algorithm to a solid grid.
///
/// Starting at (1, 1), each step looks two cells away in a random direction. If that
/// cell is inside the border and still a wall, the wall between is knocked through and
/// the walk continues from there; when every direction is exhausted the walk backs up.
/// Only cells with odd coordinates are ever visited and each visit clears exactly one
/// intermediate wall, so the passages form a single tree: a perfect maze.
///
/// The walk keeps its own stack instead of recursing so large grids cannot overflow the
/// thread stack; the visiting order and random draws match the recursive formulation.
pub fn recursive_backtracker<R>(grid: &mut Grid, rng: &mut R)
    where R: Rng + ?Sized
{
    grid.carve(BACKTRACK_START);

    let mut stack = Vec::with_capacity(grid.size() / 4 + 1);
    stack.push(CarveFrame::enter(BACKTRACK_START, rng));

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.directions.len() {
            stack.pop();
            continue;
        }

        let direction = frame.directions[frame.next];
        frame.next += 1;
        let cell = frame.cell;

        let (between, target) = match (direction.offset(cell, 1), direction.offset(cell, 2)) {
            (Some(between), Some(target)) => (between, target),
            _ => continue,
        };

        if grid.is_interior(target) && grid.is_wall(target) {
            grid.carve(between);
            grid.carve(target);
            stack.push(CarveFrame::enter(target, rng));
        }
    }
}
