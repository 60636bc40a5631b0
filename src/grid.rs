use bit_set::BitSet;
use smallvec::SmallVec;
use std::fmt;

use crate::cells::{CellState, CompassPrimary, GridCoordinate};
use crate::errors::{ErrorKind, Result, MIN_GRID_SIDE};
use crate::geometry::{Footprint, Point, Rect};
use crate::grid_displays::GridDisplay;
use crate::units::{CellSize, Height, Width};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellUpdateError {
    InvalidGridCoordinate,
}

/// A rectangular grid of `Wall` / `Passage` cells.
///
/// Passage cells are recorded in a bitset in row major order, so a fresh grid
/// is solid wall and carving only ever sets bits.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    passages: BitSet,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: width: {:?}, height: {:?}, passages: {:?}",
               self.width,
               self.height,
               self.passages_count())
    }
}

impl Grid {
    /// A grid of solid wall.
    ///
    /// Fails with `InvalidDimensions` when either side is below 3 cells as there
    /// would be no interior cell to carve from or place anything on.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w < MIN_GRID_SIDE || h < MIN_GRID_SIDE || w.checked_mul(h).is_none() ||
           w > u32::MAX as usize || h > u32::MAX as usize {
            return Err(ErrorKind::InvalidDimensions(w, h).into());
        }

        Ok(Grid {
            width: w,
            height: h,
            passages: BitSet::with_capacity(w * h),
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        Width(self.width)
    }

    #[inline]
    pub fn height(&self) -> Height {
        Height(self.height)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Cell state at `(x, y)`, None outside of the grid.
    #[inline]
    pub fn cell_at(&self, x: u32, y: u32) -> Option<CellState> {
        self.cell_at_coordinate(GridCoordinate::new(x, y))
    }

    pub fn cell_at_coordinate(&self, coord: GridCoordinate) -> Option<CellState> {
        self.grid_coordinate_to_index(coord).map(|index| if self.passages.contains(index) {
            CellState::Passage
        } else {
            CellState::Wall
        })
    }

    #[inline]
    pub fn is_passage(&self, coord: GridCoordinate) -> bool {
        self.cell_at_coordinate(coord) == Some(CellState::Passage)
    }

    #[inline]
    pub fn is_wall(&self, coord: GridCoordinate) -> bool {
        self.cell_at_coordinate(coord) == Some(CellState::Wall)
    }

    pub fn set_cell(&mut self,
                    coord: GridCoordinate,
                    state: CellState)
                    -> std::result::Result<(), CellUpdateError> {
        let index = self.grid_coordinate_to_index(coord)
            .ok_or(CellUpdateError::InvalidGridCoordinate)?;
        match state {
            CellState::Passage => self.passages.insert(index),
            CellState::Wall => self.passages.remove(index),
        };
        Ok(())
    }

    /// Turn a wall cell into a passage.
    /// Returns true if the cell was a wall before, false if it was already a passage or is invalid.
    pub fn carve(&mut self, coord: GridCoordinate) -> bool {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => self.passages.insert(index),
            None => false,
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.x as usize) < self.width && (coord.y as usize) < self.height
    }

    /// Is the coordinate on the outermost ring of cells?
    pub fn is_border(&self, coord: GridCoordinate) -> bool {
        self.is_valid_coordinate(coord) &&
        (coord.x == 0 || coord.y == 0 || coord.x as usize == self.width - 1 ||
         coord.y as usize == self.height - 1)
    }

    /// Strictly inside the grid, excluding the border ring.
    pub fn is_interior(&self, coord: GridCoordinate) -> bool {
        self.is_valid_coordinate(coord) && !self.is_border(coord)
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        direction.offset(coord, 1).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells to the North, South, East or West of a cell, whatever their state.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Neighbouring cells that are passages, i.e. reachable in one step.
    pub fn passage_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .filter(|neighbour| self.is_passage(*neighbour))
            .collect()
    }

    #[inline]
    pub fn passages_count(&self) -> usize {
        self.passages.len()
    }

    #[inline]
    pub fn walls_count(&self) -> usize {
        self.size() - self.passages_count()
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            row_width: self.width,
            cells_count: self.size(),
        }
    }

    pub fn iter_row(&self) -> BatchIter {
        BatchIter {
            current_index: 0,
            row_width: self.width,
            rows_count: self.height,
        }
    }

    /// Passage cells in row major order.
    pub fn iter_passages<'a>(&'a self) -> impl Iterator<Item = GridCoordinate> + 'a {
        let row_width = self.width;
        self.passages.iter().map(move |index| GridCoordinate::from_row_major_index(index, row_width))
    }

    /// Wall cells in row major order.
    pub fn iter_walls<'a>(&'a self) -> impl Iterator<Item = GridCoordinate> + 'a {
        self.iter().filter(move |coord| self.is_wall(*coord))
    }

    /// The world space centre of a cell.
    #[inline]
    pub fn cell_centre(&self, coord: GridCoordinate, cell_size: CellSize) -> Point {
        Point::new(coord.x as f32 * cell_size.0 + cell_size.half(),
                   coord.y as f32 * cell_size.0 + cell_size.half())
    }

    /// The world space rectangle of a cell, shrunk or grown around its centre by `scale`.
    pub fn cell_rectangle(&self, coord: GridCoordinate, cell_size: CellSize, scale: f32) -> Rect {
        let side = cell_size.0 * scale;
        Rect::centred(self.cell_centre(coord, cell_size), Footprint::square(side))
    }

    /// Which cell contains the world space point?
    pub fn coordinate_at_point(&self, point: Point, cell_size: CellSize) -> Option<GridCoordinate> {
        if point.x < 0.0 || point.y < 0.0 || cell_size.0 <= 0.0 {
            return None;
        }
        let x = (point.x / cell_size.0).floor();
        let y = (point.y / cell_size.0).floor();
        if x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        Some(GridCoordinate::new(x as u32, y as u32))
    }

    /// The world space extent covered by the whole grid.
    pub fn world_bounds(&self, cell_size: CellSize) -> Rect {
        Rect::new(0.0,
                  0.0,
                  self.width as f32 * cell_size.0,
                  self.height as f32 * cell_size.0)
    }

    /// One full cell sized rectangle per wall cell, for an external collision or render layer.
    pub fn to_wall_rectangles(&self, cell_size: CellSize) -> Vec<Rect> {
        self.to_scaled_wall_rectangles(cell_size, 1.0)
    }

    /// Wall rectangles shrunk around each cell centre, e.g. a scale of 0.8 leaves thin gaps.
    pub fn to_scaled_wall_rectangles(&self, cell_size: CellSize, scale: f32) -> Vec<Rect> {
        self.iter_walls()
            .map(|coord| self.cell_rectangle(coord, cell_size, scale))
            .collect()
    }

    /// Text rendering of the grid, one line per row.
    /// The first display layer with something to say about a cell wins, otherwise
    /// the plain wall or passage body is used.
    pub fn render(&self, layers: &[&dyn GridDisplay]) -> String {
        let mut output = String::with_capacity((self.width * 2 + 1) * self.height);
        for row in self.iter_row() {
            for coord in row {
                let state = self.cell_at_coordinate(coord).unwrap_or(CellState::Wall);
                let body = layers.iter()
                    .filter_map(|layer| layer.render_cell_body(coord, state))
                    .next();
                match body {
                    Some(text) => output.push_str(&text),
                    None => output.push_str(crate::grid_displays::default_cell_body(state)),
                }
            }
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(&[]))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    row_width: usize,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.row_width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a Grid {
    type Item = GridCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    current_index: usize,
    row_width: usize,
    rows_count: usize,
}
impl Iterator for BatchIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index < self.rows_count {
            let y = self.current_index as u32;
            let coords = (0..self.row_width)
                .map(|x| GridCoordinate::new(x as u32, y))
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.rows_count - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools; // a trait

    fn solid_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("grid dimensions invalid")
    }

    // Compare a smallvec to e.g. a vec! or &[T].
    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => (assert_eq!(&*$x, &*$y))
    }

    #[test]
    fn too_small_dimensions_are_rejected() {
        for &(w, h) in &[(0, 0), (2, 10), (10, 2), (1, 1), (2, 2)] {
            let err = Grid::new(Width(w), Height(h)).unwrap_err();
            match *err.kind() {
                ErrorKind::InvalidDimensions(ew, eh) => assert_eq!((ew, eh), (w, h)),
                ref other => panic!("unexpected error {:?}", other),
            }
        }
        assert!(Grid::new(Width(3), Height(3)).is_ok());
    }

    #[test]
    fn new_grid_is_solid_wall() {
        let g = solid_grid(5, 4);
        assert_eq!(g.size(), 20);
        assert_eq!(g.passages_count(), 0);
        assert_eq!(g.walls_count(), 20);
        assert!(g.iter().all(|coord| g.is_wall(coord)));
    }

    #[test]
    fn cell_access() {
        let mut g = solid_grid(4, 4);
        assert_eq!(g.cell_at(1, 1), Some(CellState::Wall));
        assert!(g.carve(GridCoordinate::new(1, 1)));
        assert!(!g.carve(GridCoordinate::new(1, 1)));
        assert_eq!(g.cell_at(1, 1), Some(CellState::Passage));
        assert_eq!(g.cell_at(4, 1), None);
        assert_eq!(g.cell_at(1, 4), None);
        assert_eq!(g.cell_at(u32::MAX, u32::MAX), None);

        g.set_cell(GridCoordinate::new(1, 1), CellState::Wall).expect("set failed");
        assert_eq!(g.cell_at(1, 1), Some(CellState::Wall));
        assert_eq!(g.set_cell(GridCoordinate::new(9, 9), CellState::Passage),
                   Err(CellUpdateError::InvalidGridCoordinate));
        assert!(!g.carve(GridCoordinate::new(9, 9)));
    }

    #[test]
    fn border_and_interior() {
        let g = solid_grid(4, 3);
        let gc = |x, y| GridCoordinate::new(x, y);
        let border = g.iter().filter(|c| g.is_border(*c)).count();
        assert_eq!(border, 10);
        let interior = g.iter().filter(|c| g.is_interior(*c)).collect::<Vec<_>>();
        assert_eq!(interior, vec![gc(1, 1), gc(2, 1)]);
        assert!(!g.is_border(gc(10, 10)));
        assert!(!g.is_interior(gc(10, 10)));
    }

    #[test]
    fn neighbour_cells() {
        let g = solid_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let node_indices: Vec<GridCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected_indices: Vec<GridCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(node_indices, expected_indices);
        };
        let gc = |x, y| GridCoordinate::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 8), &[gc(1, 8), gc(0, 7), gc(0, 9)]);

        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn passage_neighbour_cells() {
        let mut g = solid_grid(5, 5);
        let gc = |x, y| GridCoordinate::new(x, y);
        g.carve(gc(1, 1));
        g.carve(gc(2, 1));
        g.carve(gc(1, 2));
        g.carve(gc(3, 3));
        assert_smallvec_eq!(g.passage_neighbours(gc(1, 1)), &[gc(1, 2), gc(2, 1)]);
        assert_smallvec_eq!(g.passage_neighbours(gc(3, 3)), &[]);
        assert_smallvec_eq!(g.passage_neighbours(gc(2, 2)), &[gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn cell_iter() {
        let g = solid_grid(3, 3);
        let coords = g.iter().collect::<Vec<GridCoordinate>>();
        assert_eq!(coords.len(), 9);
        assert_eq!(coords[0], GridCoordinate::new(0, 0));
        assert_eq!(coords[1], GridCoordinate::new(1, 0));
        assert_eq!(coords[3], GridCoordinate::new(0, 1));
        assert_eq!(coords[8], GridCoordinate::new(2, 2));
        assert_eq!(g.iter().len(), 9);
    }

    #[test]
    fn row_iter() {
        let g = solid_grid(3, 4);
        let rows = g.iter_row().collect::<Vec<Vec<GridCoordinate>>>();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2],
                   vec![GridCoordinate::new(0, 2),
                        GridCoordinate::new(1, 2),
                        GridCoordinate::new(2, 2)]);
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = solid_grid(3, 3);
        let gc = |x, y| GridCoordinate::new(x, y);
        let indices: Vec<Option<usize>> = g.iter()
            .map(|coord| g.grid_coordinate_to_index(coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
    }

    #[test]
    fn passages_iterate_in_row_major_order() {
        let mut g = solid_grid(4, 4);
        let gc = |x, y| GridCoordinate::new(x, y);
        g.carve(gc(2, 2));
        g.carve(gc(1, 1));
        g.carve(gc(2, 1));
        assert_eq!(g.iter_passages().collect::<Vec<_>>(),
                   vec![gc(1, 1), gc(2, 1), gc(2, 2)]);
        assert_eq!(g.iter_walls().count(), 13);
    }

    #[test]
    fn world_space_conversion() {
        let g = solid_grid(16, 12);
        let cell = CellSize(50.0);
        assert_eq!(g.cell_centre(GridCoordinate::new(1, 1), cell), Point::new(75.0, 75.0));
        assert_eq!(g.cell_centre(GridCoordinate::new(0, 0), cell), Point::new(25.0, 25.0));
        assert_eq!(g.coordinate_at_point(Point::new(75.0, 75.0), cell),
                   Some(GridCoordinate::new(1, 1)));
        assert_eq!(g.coordinate_at_point(Point::new(799.0, 599.0), cell),
                   Some(GridCoordinate::new(15, 11)));
        assert_eq!(g.coordinate_at_point(Point::new(800.0, 10.0), cell), None);
        assert_eq!(g.coordinate_at_point(Point::new(-1.0, 10.0), cell), None);
        assert_eq!(g.world_bounds(cell), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn wall_rectangles() {
        let mut g = solid_grid(3, 3);
        g.carve(GridCoordinate::new(1, 1));
        let cell = CellSize(10.0);

        let rects = g.to_wall_rectangles(cell);
        assert_eq!(rects.len(), 8);
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rects[7], Rect::new(20.0, 20.0, 10.0, 10.0));
        let passage_rect = g.cell_rectangle(GridCoordinate::new(1, 1), cell, 1.0);
        assert!(rects.iter().all(|r| !r.intersects(&passage_rect)));

        let scaled = g.to_scaled_wall_rectangles(cell, 0.8);
        assert_eq!(scaled.len(), 8);
        assert_eq!(scaled[0], Rect::new(1.0, 1.0, 8.0, 8.0));
    }

    #[test]
    fn text_rendering() {
        let mut g = solid_grid(3, 3);
        g.carve(GridCoordinate::new(1, 1));
        let text = format!("{}", g);
        assert_eq!(text, "██████\n██  ██\n██████\n");
    }
}
