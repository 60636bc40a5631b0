//! Session configuration: how big the maze is and how things are placed on it.

use crate::errors::*;
use crate::generators::Algorithm;
use crate::placement::{StartStrategy, RETRIES_PER_CELL};
use crate::units::{CellSize, Height, Width};

/// The cell size is picked so at least this many columns and rows fit the viewport.
pub const REFERENCE_COLUMNS: f32 = 16.0;
pub const REFERENCE_ROWS: f32 = 12.0;

/// Drawable area in pixels, supplied by the rendering layer.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Viewport {
        Viewport { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(800.0, 600.0)
    }
}

/// Grid dimensions together with the size of a cell in world space.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct MazeLayout {
    pub width: Width,
    pub height: Height,
    pub cell_size: CellSize,
}

impl MazeLayout {
    /// Square cells sized so a 16 x 12 grid fits the viewport, then as many whole
    /// cells as fit along each axis.
    pub fn from_viewport(viewport: Viewport) -> Result<MazeLayout> {
        let Viewport { width, height } = viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ErrorKind::InvalidViewport(width, height).into());
        }

        let cell = (width / REFERENCE_COLUMNS).min(height / REFERENCE_ROWS);
        let columns = (width / cell).floor() as usize;
        let rows = (height / cell).floor() as usize;

        Ok(MazeLayout {
            width: Width(columns),
            height: Height(rows),
            cell_size: CellSize(cell),
        })
    }

    pub fn fixed(width: Width, height: Height, cell_size: CellSize) -> MazeLayout {
        MazeLayout {
            width,
            height,
            cell_size,
        }
    }

    /// World space size of the whole maze.
    pub fn world_size(&self) -> (f32, f32) {
        (self.width.0 as f32 * self.cell_size.0, self.height.0 as f32 * self.cell_size.0)
    }
}

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Sizing {
    /// Derive the layout from the drawable area, recomputed on resize.
    Viewport(Viewport),
    /// Fixed grid dimensions and cell size, resizes are ignored.
    Fixed(MazeLayout),
}

#[derive(PartialEq, Clone, Debug)]
pub struct MazeConfig {
    pub sizing: Sizing,
    pub algorithm: Algorithm,
    pub start: StartStrategy,
    /// Minimum goal distance from the player, in cells.
    pub min_goal_distance_cells: Option<f32>,
    /// Player box side relative to the cell size.
    pub player_scale: f32,
    /// Goal box side relative to the cell size.
    pub goal_scale: f32,
    /// Wall collision box side relative to the cell size.
    pub wall_scale: f32,
    /// Radius of the lit circle around the player, in cells.
    pub light_radius_cells: f32,
    pub lighting: bool,
    pub retries_per_cell: usize,
    /// Fixed seed for reproducible sessions, entropy otherwise.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        MazeConfig {
            sizing: Sizing::Viewport(Viewport::default()),
            algorithm: Algorithm::Backtrack,
            start: StartStrategy::Sample,
            min_goal_distance_cells: Some(5.0),
            player_scale: 0.5,
            goal_scale: 0.5,
            wall_scale: 1.0,
            light_radius_cells: 2.0,
            lighting: true,
            retries_per_cell: RETRIES_PER_CELL,
            seed: None,
        }
    }
}

impl MazeConfig {
    pub fn layout(&self) -> Result<MazeLayout> {
        match self.sizing {
            Sizing::Viewport(viewport) => MazeLayout::from_viewport(viewport),
            Sizing::Fixed(layout) => Ok(layout),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let layout = self.layout()?;
        if layout.width.0 < MIN_GRID_SIDE || layout.height.0 < MIN_GRID_SIDE {
            return Err(ErrorKind::InvalidDimensions(layout.width.0, layout.height.0).into());
        }
        if !(layout.cell_size.0.is_finite() && layout.cell_size.0 > 0.0) {
            return Err(invalid(format!("cell size must be positive, got {}", layout.cell_size.0)));
        }

        if let Algorithm::Noise { wall_probability } = self.algorithm {
            if !(0.0..=1.0).contains(&wall_probability) {
                return Err(ErrorKind::InvalidWallProbability(wall_probability).into());
            }
        }

        let scales = [("player scale", self.player_scale),
                      ("goal scale", self.goal_scale),
                      ("wall scale", self.wall_scale)];
        for &(name, scale) in scales.iter() {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, scale)));
            }
        }
        if let Some(distance) = self.min_goal_distance_cells {
            if !(distance.is_finite() && distance >= 0.0) {
                return Err(invalid(format!("minimum goal distance must not be negative, got {}",
                                           distance)));
            }
        }
        if !(self.light_radius_cells.is_finite() && self.light_radius_cells >= 0.0) {
            return Err(invalid(format!("light radius must not be negative, got {}",
                                       self.light_radius_cells)));
        }
        if self.retries_per_cell == 0 {
            return Err(invalid(String::from("retries per cell must be at least 1")));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> Error {
    ErrorKind::InvalidConfiguration(reason).into()
}
