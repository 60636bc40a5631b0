use bit_set::BitSet;

use crate::cells::GridCoordinate;
use crate::geometry::Point;
use crate::grid::Grid;
use crate::units::CellSize;

/// The cells of a grid a player can currently see.
///
/// The lit area is a circle around the player; a cell is visible when any part of
/// its rectangle falls inside that circle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityMask {
    visible: BitSet,
    pub width: u32,
    pub height: u32,
}

impl VisibilityMask {
    /// Everything visible, e.g. with the lights on.
    pub fn all(grid: &Grid) -> VisibilityMask {
        let visible = (0..grid.size()).collect::<BitSet>();
        VisibilityMask {
            visible,
            width: grid.width().0 as u32,
            height: grid.height().0 as u32,
        }
    }

    pub fn around(grid: &Grid, centre: Point, radius: f32, cell_size: CellSize) -> VisibilityMask {

        let mut visible = BitSet::with_capacity(grid.size());

        // Only the cells under the circle's bounding box can be lit.
        let cell = cell_size.0;
        let columns = grid.width().0 as f32;
        let rows = grid.height().0 as f32;
        let clamp = |v: f32, max: f32| v.max(0.0).min(max - 1.0) as u32;
        let (min_x, max_x) = (clamp(((centre.x - radius) / cell).floor(), columns),
                              clamp(((centre.x + radius) / cell).floor(), columns));
        let (min_y, max_y) = (clamp(((centre.y - radius) / cell).floor(), rows),
                              clamp(((centre.y + radius) / cell).floor(), rows));

        if radius >= 0.0 && cell > 0.0 {
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    let coord = GridCoordinate::new(x, y);
                    let rect = grid.cell_rectangle(coord, cell_size, 1.0);
                    if rect.distance_to(centre) <= radius {
                        if let Some(index) = grid.grid_coordinate_to_index(coord) {
                            visible.insert(index);
                        }
                    }
                }
            }
        }

        VisibilityMask {
            visible,
            width: grid.width().0 as u32,
            height: grid.height().0 as u32,
        }
    }

    /// Is the given coordinate lit?
    ///
    /// A coordinate outside of the mask's bounds is never visible.
    pub fn is_visible(&self, coord: GridCoordinate) -> bool {
        if coord.x < self.width && coord.y < self.height {
            let bit_index = coord.y as usize * self.width as usize + coord.x as usize;
            self.visible.contains(bit_index)
        } else {
            false
        }
    }

    #[inline]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::units::{Height, Width};

    fn open_grid() -> Grid {
        Grid::new(Width(10), Height(8)).unwrap()
    }

    #[test]
    fn all_visible() {
        let g = open_grid();
        let mask = VisibilityMask::all(&g);
        assert_eq!(mask.visible_count(), 80);
        assert!(g.iter().all(|c| mask.is_visible(c)));
        assert!(!mask.is_visible(GridCoordinate::new(10, 0)));
    }

    #[test]
    fn light_radius_of_two_cells() {
        let g = open_grid();
        let cell = CellSize(50.0);
        let centre = g.cell_centre(GridCoordinate::new(5, 4), cell);
        let mask = VisibilityMask::around(&g, centre, 2.0 * cell.0, cell);

        // The player's own cell and those two steps away in line are lit.
        assert!(mask.is_visible(GridCoordinate::new(5, 4)));
        assert!(mask.is_visible(GridCoordinate::new(7, 4)));
        assert!(mask.is_visible(GridCoordinate::new(5, 2)));
        // Three steps away the nearest edge is 125px from the centre.
        assert!(!mask.is_visible(GridCoordinate::new(8, 4)));
        assert!(!mask.is_visible(GridCoordinate::new(5, 1)));
        // Diagonal (7, 6): nearest corner is (75, 75) away, about 106px.
        assert!(!mask.is_visible(GridCoordinate::new(7, 6)));
        assert!(mask.is_visible(GridCoordinate::new(6, 5)));
    }

    #[test]
    fn wide_mask_index_does_not_overflow() {
        let mask = VisibilityMask {
            visible: BitSet::new(),
            width: u32::MAX,
            height: 3,
        };
        assert!(!mask.is_visible(GridCoordinate::new(5, 2)));
        assert!(!mask.is_visible(GridCoordinate::new(u32::MAX - 1, 2)));
    }

    #[test]
    fn light_clipped_at_grid_edges() {
        let g = open_grid();
        let cell = CellSize(10.0);
        let mask = VisibilityMask::around(&g, Point::new(0.0, 0.0), 15.0, cell);
        assert!(mask.is_visible(GridCoordinate::new(0, 0)));
        assert!(mask.is_visible(GridCoordinate::new(1, 0)));
        assert!(mask.is_visible(GridCoordinate::new(1, 1)));
        assert!(!mask.is_visible(GridCoordinate::new(2, 0)));
        assert_eq!(mask.visible_count(), 4);
    }
}
