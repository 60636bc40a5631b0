use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{MazeConfig, MazeLayout, Sizing, Viewport};
use crate::errors::*;
use crate::generators;
use crate::geometry::{Footprint, Point, Rect};
use crate::grid::Grid;
use crate::masks::VisibilityMask;
use crate::placement::Placement;

/// Everything one round of the maze game needs: the grid, where the player and the
/// goal are, whether the lights are on and when the round started.
///
/// The player's position is only ever changed by the caller (the movement layer);
/// the session regenerates the rest on `restart` or `resize`.
#[derive(Debug)]
pub struct MazeSession {
    config: MazeConfig,
    layout: MazeLayout,
    grid: Grid,
    player: Point,
    goal: Point,
    lighting: bool,
    started_at: Instant,
    rng: XorShiftRng,
}

// The generated part of a session, built in full before being swapped in.
struct Round {
    grid: Grid,
    player: Point,
    goal: Point,
}

impl MazeSession {
    pub fn new(config: MazeConfig) -> Result<MazeSession> {
        config.validate()?;
        let layout = config.layout()?;
        let mut rng = match config.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };

        let round = build_round(&config, &layout, &mut rng)?;
        info!(width = layout.width.0,
              height = layout.height.0,
              cell_size = layout.cell_size.0,
              "maze session started");

        Ok(MazeSession {
            lighting: config.lighting,
            config,
            layout,
            grid: round.grid,
            player: round.player,
            goal: round.goal,
            started_at: Instant::now(),
            rng,
        })
    }

    /// New maze, start and goal. The current round is kept if generation fails.
    pub fn restart(&mut self) -> Result<()> {
        let round = build_round(&self.config, &self.layout, &mut self.rng)?;
        self.grid = round.grid;
        self.player = round.player;
        self.goal = round.goal;
        self.started_at = Instant::now();
        debug!(player = %self.player, goal = %self.goal, "maze session restarted");
        Ok(())
    }

    /// Recompute the layout for a new viewport and restart.
    /// A fixed layout ignores the viewport and only restarts.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let layout = match self.config.sizing {
            Sizing::Viewport(_) => MazeLayout::from_viewport(viewport)?,
            Sizing::Fixed(layout) => layout,
        };

        let round = build_round(&self.config, &layout, &mut self.rng)?;
        if let Sizing::Viewport(_) = self.config.sizing {
            self.config.sizing = Sizing::Viewport(viewport);
        }
        self.layout = layout;
        self.grid = round.grid;
        self.player = round.player;
        self.goal = round.goal;
        self.started_at = Instant::now();
        debug!(width = layout.width.0, height = layout.height.0, "maze session resized");
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn player_position(&self) -> Point {
        self.player
    }

    pub fn set_player_position(&mut self, position: Point) {
        self.player = position;
    }

    #[inline]
    pub fn goal_position(&self) -> Point {
        self.goal
    }

    pub fn player_footprint(&self) -> Footprint {
        player_footprint(&self.config, &self.layout)
    }

    pub fn goal_footprint(&self) -> Footprint {
        Footprint::square(self.layout.cell_size.0 * self.config.goal_scale)
    }

    /// Does the player's box overlap the goal's box?
    pub fn goal_reached(&self) -> bool {
        let player = Rect::centred(self.player, self.player_footprint());
        let goal = Rect::centred(self.goal, self.goal_footprint());
        player.intersects(&goal)
    }

    #[inline]
    pub fn lighting_enabled(&self) -> bool {
        self.lighting
    }

    pub fn set_lighting(&mut self, lighting: bool) {
        self.lighting = lighting;
    }

    /// Flip the lights, returning the new state.
    pub fn toggle_lighting(&mut self) -> bool {
        self.lighting = !self.lighting;
        self.lighting
    }

    /// The cells the player can see: a circle around them with the lighting on,
    /// the whole maze otherwise.
    pub fn visibility(&self) -> VisibilityMask {
        if self.lighting {
            let radius = self.config.light_radius_cells * self.layout.cell_size.0;
            VisibilityMask::around(&self.grid, self.player, radius, self.layout.cell_size)
        } else {
            VisibilityMask::all(&self.grid)
        }
    }

    /// Time since the current round started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

fn player_footprint(config: &MazeConfig, layout: &MazeLayout) -> Footprint {
    Footprint::square(layout.cell_size.0 * config.player_scale)
}

fn build_round(config: &MazeConfig, layout: &MazeLayout, rng: &mut XorShiftRng) -> Result<Round> {

    let grid = generators::generate(layout.width, layout.height, config.algorithm, rng)?;

    let placement = Placement::new(&grid, layout.cell_size)
        .with_wall_scale(config.wall_scale)
        .with_max_attempts(grid.size().saturating_mul(config.retries_per_cell));

    let player = placement.find_start_position(player_footprint(config, layout), config.start, rng)?;
    let min_distance = config.min_goal_distance_cells.map(|cells| cells * layout.cell_size.0);
    let goal = placement.find_goal_position(player, min_distance, rng)?;

    Ok(Round { grid, player, goal })
}
