//! Picking start and goal points on a generated maze.
//!
//! Both searches draw random interior cell centres and reject those whose box would
//! overlap a wall. Every search has an attempt budget and reports
//! `PlacementExhausted` when it is spent, so a maze with no open interior cell is an
//! error for the caller rather than a hang.

use rand::Rng;
use std::fmt;
use tracing::{debug, trace, warn};

use crate::cells::GridCoordinate;
use crate::errors::*;
use crate::geometry::{Footprint, Point, Rect};
use crate::grid::Grid;
use crate::units::CellSize;

/// Sampling attempts allowed per grid cell before a search gives up.
pub const RETRIES_PER_CELL: usize = 10;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum PlacementTarget {
    Start,
    Goal,
}

impl fmt::Display for PlacementTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PlacementTarget::Start => write!(f, "start"),
            PlacementTarget::Goal => write!(f, "goal"),
        }
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum StartStrategy {
    /// Use `default` if it is clear, otherwise snap back to the centre of cell (1, 1).
    Fixed { default: Point },
    /// Rejection sample interior cell centres.
    Sample,
}

impl Default for StartStrategy {
    fn default() -> Self {
        StartStrategy::Sample
    }
}

/// A grid bound to world space for placement queries.
#[derive(Debug, Clone)]
pub struct Placement<'a> {
    grid: &'a Grid,
    cell_size: CellSize,
    wall_scale: f32,
    max_attempts: usize,
}

impl<'a> Placement<'a> {
    pub fn new(grid: &'a Grid, cell_size: CellSize) -> Placement<'a> {
        Placement {
            grid,
            cell_size,
            wall_scale: 1.0,
            max_attempts: grid.size().saturating_mul(RETRIES_PER_CELL),
        }
    }

    /// Size of each wall's collision box relative to its cell.
    pub fn with_wall_scale(mut self, wall_scale: f32) -> Placement<'a> {
        self.wall_scale = wall_scale;
        self
    }

    /// Sampling attempts before a search gives up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Placement<'a> {
        self.max_attempts = max_attempts;
        self
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.grid
    }

    #[inline]
    pub fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    #[inline]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Centre of cell (1, 1), which is always a passage in a backtracker maze.
    pub fn safe_default(&self) -> Point {
        self.grid.cell_centre(GridCoordinate::new(1, 1), self.cell_size)
    }

    /// Would a box of `footprint` centred on `centre` overlap a wall or leave the world?
    pub fn collides(&self, centre: Point, footprint: Footprint) -> bool {
        let candidate = Rect::centred(centre, footprint);
        if !candidate.is_within(&self.grid.world_bounds(self.cell_size)) {
            return true;
        }

        // Only the cells under the candidate box can touch it, plus the cells whose
        // grown wall boxes reach into them when walls are scaled above a full cell.
        let cell = self.cell_size.0;
        let reach = ((self.wall_scale - 1.0).max(0.0) / 2.0).ceil() as u32;
        let last_column = self.grid.width().0 as u32 - 1;
        let last_row = self.grid.height().0 as u32 - 1;
        let to_index = |v: f32, last: u32| ((v / cell).floor().max(0.0) as u32).min(last);
        let (min_x, max_x) = (to_index(candidate.x, last_column).saturating_sub(reach),
                              to_index(candidate.right(), last_column).saturating_add(reach).min(last_column));
        let (min_y, max_y) = (to_index(candidate.y, last_row).saturating_sub(reach),
                              to_index(candidate.bottom(), last_row).saturating_add(reach).min(last_row));

        (min_y..=max_y).any(|y| {
            (min_x..=max_x).any(|x| {
                let coord = GridCoordinate::new(x, y);
                self.grid.is_wall(coord) &&
                self.grid.cell_rectangle(coord, self.cell_size, self.wall_scale).intersects(&candidate)
            })
        })
    }

    /// A point whose `footprint` box does not overlap any wall.
    pub fn find_start_position<R>(&self,
                                  footprint: Footprint,
                                  strategy: StartStrategy,
                                  rng: &mut R)
                                  -> Result<Point>
        where R: Rng + ?Sized
    {
        match strategy {
            StartStrategy::Fixed { default } => {
                if !self.collides(default, footprint) {
                    debug!(%default, "start placed at the default point");
                    return Ok(default);
                }

                let fallback = self.safe_default();
                warn!(%default, %fallback, "default start collides with a wall, snapping back");
                if !self.collides(fallback, footprint) {
                    Ok(fallback)
                } else {
                    Err(ErrorKind::PlacementExhausted(PlacementTarget::Start, 2).into())
                }
            }
            StartStrategy::Sample => {
                self.sample(PlacementTarget::Start, rng, |centre| !self.collides(centre, footprint))
            }
        }
    }

    /// A cell centre clear of walls and, when `min_distance` is given, strictly farther
    /// than that from `player`.
    pub fn find_goal_position<R>(&self,
                                 player: Point,
                                 min_distance: Option<f32>,
                                 rng: &mut R)
                                 -> Result<Point>
        where R: Rng + ?Sized
    {
        let goal_footprint = Footprint::square(self.cell_size.0);
        self.sample(PlacementTarget::Goal, rng, |centre| {
            let far_enough = min_distance.map_or(true, |min| centre.distance_to(player) > min);
            far_enough && !self.collides(centre, goal_footprint)
        })
    }

    /// Uniformly random centre of a cell strictly inside the border.
    pub fn random_interior_centre<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        let x = rng.gen_range(1..=self.grid.width().0 as u32 - 2);
        let y = rng.gen_range(1..=self.grid.height().0 as u32 - 2);
        self.grid.cell_centre(GridCoordinate::new(x, y), self.cell_size)
    }

    fn sample<R, F>(&self, target: PlacementTarget, rng: &mut R, is_acceptable: F) -> Result<Point>
        where R: Rng + ?Sized,
              F: Fn(Point) -> bool
    {
        for attempt in 0..self.max_attempts {
            let candidate = self.random_interior_centre(rng);
            if is_acceptable(candidate) {
                debug!(%target, %candidate, attempts = attempt + 1, "placed");
                return Ok(candidate);
            }
        }
        trace!(%target, attempts = self.max_attempts, "placement budget spent");
        Err(ErrorKind::PlacementExhausted(target, self.max_attempts).into())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::{self, Algorithm};
    use crate::units::{Height, Width};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    const CELL: CellSize = CellSize(50.0);

    fn seeded(seed: u64) -> XorShiftRng {
        XorShiftRng::seed_from_u64(seed)
    }

    fn backtrack(w: usize, h: usize, seed: u64) -> Grid {
        generators::generate(Width(w), Height(h), Algorithm::Backtrack, &mut seeded(seed)).unwrap()
    }

    fn is_exhausted(err: &Error, expected: PlacementTarget) -> bool {
        match *err.kind() {
            ErrorKind::PlacementExhausted(target, _) => target == expected,
            _ => false,
        }
    }

    fn overlaps_any_wall(grid: &Grid, centre: Point, footprint: Footprint) -> bool {
        let candidate = Rect::centred(centre, footprint);
        grid.to_wall_rectangles(CELL).iter().any(|wall| wall.intersects(&candidate))
    }

    #[test]
    fn fixed_start_on_open_cell_is_kept() {
        let g = backtrack(16, 12, 42);
        let placement = Placement::new(&g, CELL);
        let default = g.cell_centre(GridCoordinate::new(1, 1), CELL);
        let start = placement.find_start_position(Footprint::square(25.0),
                                      StartStrategy::Fixed { default },
                                      &mut seeded(42))
            .unwrap();
        assert_eq!(start, Point::new(75.0, 75.0));
    }

    #[test]
    fn fixed_start_inside_a_wall_snaps_back() {
        let g = backtrack(16, 12, 42);
        let placement = Placement::new(&g, CELL);
        // (25, 25) is the centre of the border cell (0, 0).
        let start = placement.find_start_position(Footprint::square(25.0),
                                      StartStrategy::Fixed { default: Point::new(25.0, 25.0) },
                                      &mut seeded(42))
            .unwrap();
        assert_eq!(start, placement.safe_default());
        assert_eq!(start, Point::new(75.0, 75.0));
    }

    #[test]
    fn solid_noise_grid_exhausts_start_placement() {
        let g = generators::generate(Width(4),
                                     Height(4),
                                     Algorithm::Noise { wall_probability: 1.0 },
                                     &mut seeded(42))
            .unwrap();
        assert!(g.iter().all(|c| g.is_wall(c)));

        let placement = Placement::new(&g, CELL);
        let footprint = Footprint::square(25.0);
        let err = placement.find_start_position(footprint, StartStrategy::Sample, &mut seeded(1))
            .unwrap_err();
        assert!(is_exhausted(&err, PlacementTarget::Start));
        match *err.kind() {
            ErrorKind::PlacementExhausted(_, attempts) => assert_eq!(attempts, 16 * RETRIES_PER_CELL),
            _ => unreachable!(),
        }

        let fixed = StartStrategy::Fixed { default: Point::new(75.0, 75.0) };
        let err = placement.find_start_position(footprint, fixed, &mut seeded(1)).unwrap_err();
        assert!(is_exhausted(&err, PlacementTarget::Start));
    }

    #[test]
    fn solid_grid_exhausts_goal_placement() {
        let g = Grid::new(Width(5), Height(5)).unwrap();
        let placement = Placement::new(&g, CELL).with_max_attempts(7);
        let err = placement.find_goal_position(Point::new(75.0, 75.0), None, &mut seeded(1))
            .unwrap_err();
        assert!(is_exhausted(&err, PlacementTarget::Goal));
        match *err.kind() {
            ErrorKind::PlacementExhausted(_, attempts) => assert_eq!(attempts, 7),
            _ => unreachable!(),
        }
    }

    #[test]
    fn sampled_start_is_clear_of_walls() {
        for seed in 0..50 {
            let g = backtrack(16, 12, seed);
            let placement = Placement::new(&g, CELL);
            let footprint = Footprint::square(25.0);
            let start = placement.find_start_position(footprint, StartStrategy::Sample, &mut seeded(seed))
                .unwrap();
            assert!(!overlaps_any_wall(&g, start, footprint));
            let cell = g.coordinate_at_point(start, CELL).unwrap();
            assert!(g.is_passage(cell));
        }
    }

    #[test]
    fn collisions_with_neighbouring_walls() {
        // ###
        // # #    a single open cell
        // ###
        let mut g = Grid::new(Width(3), Height(3)).unwrap();
        g.carve(GridCoordinate::new(1, 1));
        let placement = Placement::new(&g, CELL);
        let centre = Point::new(75.0, 75.0);
        assert!(!placement.collides(centre, Footprint::square(50.0)));
        assert!(placement.collides(centre, Footprint::square(51.0)));
        assert!(placement.collides(Point::new(80.0, 75.0), Footprint::square(50.0)));

        // Thin walls are 40px boxes, the nearest wall edges sit 30px from the centre.
        let thin = Placement::new(&g, CELL).with_wall_scale(0.8);
        assert!(!thin.collides(centre, Footprint::square(59.0)));
        assert!(thin.collides(centre, Footprint::square(61.0)));
    }

    #[test]
    fn grown_walls_reach_into_neighbouring_cells() {
        // #####
        // #   #    corridor, walls twice the size of a cell
        // #####
        let mut g = Grid::new(Width(5), Height(3)).unwrap();
        for x in 1..=3 {
            g.carve(GridCoordinate::new(x, 1));
        }
        let placement = Placement::new(&g, CELL).with_wall_scale(2.0);
        let centre = Point::new(125.0, 75.0);
        let footprint = Footprint::square(10.0);

        let candidate = Rect::centred(centre, footprint);
        let overlapping = g.to_scaled_wall_rectangles(CELL, 2.0)
            .iter()
            .any(|wall| wall.intersects(&candidate));
        assert!(overlapping);
        assert!(placement.collides(centre, footprint));

        // Every corridor cell is now within reach of a grown wall.
        let err = placement.find_start_position(footprint, StartStrategy::Sample, &mut seeded(1))
            .unwrap_err();
        assert!(is_exhausted(&err, PlacementTarget::Start));
    }

    #[test]
    fn out_of_world_collides() {
        let mut g = Grid::new(Width(3), Height(3)).unwrap();
        g.carve(GridCoordinate::new(1, 1));
        let placement = Placement::new(&g, CELL);
        assert!(placement.collides(Point::new(-100.0, 75.0), Footprint::square(10.0)));
        assert!(placement.collides(Point::new(75.0, 1000.0), Footprint::square(10.0)));
    }

    #[test]
    fn goal_is_never_inside_a_wall() {
        let sizes = [(5, 5), (6, 5), (7, 7), (8, 6), (9, 9), (10, 7), (11, 11), (12, 9),
                     (13, 13), (14, 10), (15, 11), (16, 12), (17, 13), (18, 14), (19, 15),
                     (20, 15), (21, 17), (24, 18), (31, 21), (40, 30)];
        let goal_footprint = Footprint::square(CELL.0);
        for &(w, h) in sizes.iter() {
            for seed in 0..100 {
                let mut rng = seeded(seed);
                let algorithm = if seed % 2 == 0 { Algorithm::Backtrack } else { Algorithm::noise() };
                let g = generators::generate(Width(w), Height(h), algorithm, &mut rng).unwrap();
                let placement = Placement::new(&g, CELL);
                match placement.find_goal_position(placement.safe_default(), None, &mut rng) {
                    Ok(goal) => assert!(!overlaps_any_wall(&g, goal, goal_footprint)),
                    Err(err) => {
                        // A backtracker maze always has open cells to put the goal on.
                        assert_ne!(algorithm, Algorithm::Backtrack, "{}x{} seed {}", w, h, seed);
                        assert!(is_exhausted(&err, PlacementTarget::Goal));
                    }
                }
            }
        }
    }

    #[test]
    fn goal_respects_minimum_distance() {
        let min_distance = 5.0 * CELL.0;
        for seed in 0..100 {
            let mut rng = seeded(seed);
            let g = generators::generate(Width(16), Height(12), Algorithm::Backtrack, &mut rng).unwrap();
            let placement = Placement::new(&g, CELL);
            let player = placement.safe_default();
            match placement.find_goal_position(player, Some(min_distance), &mut rng) {
                Ok(goal) => assert!(goal.distance_to(player) >= min_distance),
                Err(err) => assert!(is_exhausted(&err, PlacementTarget::Goal)),
            }
        }
    }

    #[test]
    fn unreachable_minimum_distance_exhausts() {
        let g = backtrack(7, 7, 3);
        let placement = Placement::new(&g, CELL);
        let err = placement.find_goal_position(placement.safe_default(), Some(10_000.0), &mut seeded(3))
            .unwrap_err();
        assert!(is_exhausted(&err, PlacementTarget::Goal));
    }

    #[test]
    fn placement_is_deterministic() {
        let run = |seed| {
            let mut rng = seeded(seed);
            let g = generators::generate(Width(20), Height(15), Algorithm::Backtrack, &mut rng).unwrap();
            let placement = Placement::new(&g, CELL);
            let start = placement.find_start_position(Footprint::square(25.0), StartStrategy::Sample, &mut rng)
                .unwrap();
            let goal = placement.find_goal_position(start, Some(5.0 * CELL.0), &mut rng).unwrap();
            (g, start, goal)
        };
        assert_eq!(run(11), run(11));
    }
}
