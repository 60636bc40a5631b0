use crate::cells::{CellState, GridCoordinate};
use crate::grid::CoordinateSmallVec;
use crate::masks::VisibilityMask;
use crate::utils::FnvHashSet;

const WALL_BODY: &str = "██";
const PASSAGE_BODY: &str = "  ";

/// Text for a cell that no display layer claims.
pub fn default_cell_body(state: CellState) -> &'static str {
    match state {
        CellState::Wall => WALL_BODY,
        CellState::Passage => PASSAGE_BODY,
    }
}

pub trait GridDisplay {
    /// Render the contents of a grid cell as text, 2 glyphs wide.
    /// None leaves the cell to the next display layer.
    fn render_cell_body(&self, _: GridCoordinate, _: CellState) -> Option<String> {
        None
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate, _: CellState) -> Option<String> {

        let contains_coordinate =
            |coordinates: &CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            Some(String::from("S "))
        } else if contains_coordinate(&self.end_coordinates) {
            Some(String::from("G "))
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate, _: CellState) -> Option<String> {
        if self.on_path_coordinates.contains(&coord) {
            Some(String::from("··"))
        } else {
            None
        }
    }
}

/// Shades every cell that lies outside of the lit area.
#[derive(Debug)]
pub struct VisibilityDisplay<'a> {
    mask: &'a VisibilityMask,
}
impl<'a> VisibilityDisplay<'a> {
    pub fn new(mask: &'a VisibilityMask) -> Self {
        VisibilityDisplay { mask }
    }
}
impl<'a> GridDisplay for VisibilityDisplay<'a> {
    fn render_cell_body(&self, coord: GridCoordinate, _: CellState) -> Option<String> {
        if self.mask.is_visible(coord) {
            None
        } else {
            Some(String::from("░░"))
        }
    }
}
