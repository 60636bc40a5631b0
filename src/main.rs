use docopt::Docopt;
use serde_derive::Deserialize;
use mazegen::{
    config::{MazeConfig, MazeLayout, Sizing, Viewport},
    generators::Algorithm,
    geometry::Point,
    grid::{CoordinateSmallVec, Grid},
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay, VisibilityDisplay},
    pathing,
    placement::StartStrategy,
    session::MazeSession,
    units::{CellSize, Height, Width},
};
use std::{
    io,
    io::prelude::*,
    fs::File,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

const USAGE: &str = "Maze generator

Usage:
    maze_driver -h | --help
    maze_driver [(backtrack|noise)] [--width=<w> --height=<h>] [--cell-size=<c>] [--viewport-width=<vw>] [--viewport-height=<vh>] [--wall-probability=<p>] [--seed=<s>] [--min-goal-distance=<d>] [--fixed-start] [--lights-off] [--show-path] [--save-edges=<path>]

Options:
    -h --help                   Show this screen.
    --width=<w>                 Number of grid columns, border included. Needs --height.
    --height=<h>                Number of grid rows, border included. Needs --width.
    --cell-size=<c>             World space side of a cell with a fixed width and height [default: 50].
    --viewport-width=<vw>       Drawable width in pixels the layout is fitted to [default: 800].
    --viewport-height=<vh>      Drawable height in pixels the layout is fitted to [default: 600].
    --wall-probability=<p>      Chance of each interior cell being a wall with the noise generator [default: 0.3].
    --seed=<s>                  Seed for a reproducible maze.
    --min-goal-distance=<d>     Minimum distance between the start and the goal, in cells [default: 5].
    --fixed-start               Start half a cell in from the top left corner, snapping to cell (1, 1) if that is walled.
    --lights-off                Show the whole maze instead of the lit circle around the player.
    --show-path                 Mark the shortest route from the start to the goal.
    --save-edges=<path>         Serialize the passage graph to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_backtrack: bool,
    cmd_noise: bool,
    flag_width: Option<usize>,
    flag_height: Option<usize>,
    flag_cell_size: f32,
    flag_viewport_width: f32,
    flag_viewport_height: f32,
    flag_wall_probability: f64,
    flag_seed: Option<u64>,
    flag_min_goal_distance: f32,
    flag_fixed_start: bool,
    flag_lights_off: bool,
    flag_show_path: bool,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazegen::errors::Error, ::mazegen::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    init_logging();

    let config = maze_config_from_args(&args);
    let session = MazeSession::new(config)?;
    let grid = session.grid();
    let cell_size = session.layout().cell_size;

    let start_cell = grid.coordinate_at_point(session.player_position(), cell_size)
        .ok_or("Start position is outside of the maze.")?;
    let goal_cell = grid.coordinate_at_point(session.goal_position(), cell_size)
        .ok_or("Goal position is outside of the maze.")?;

    let markers = StartEndPointsDisplay::new(as_coordinate_smallvec(start_cell),
                                             as_coordinate_smallvec(goal_cell));
    let path_display = if args.flag_show_path {
        let distances = pathing::Distances::<u32>::new(grid, start_cell)
            .ok_or("The start is not on a passage.")?;
        match pathing::shortest_path(grid, &distances, goal_cell) {
            Some(path) => Some(PathDisplay::new(&path)),
            None => {
                // Noise mazes are not always connected.
                info!(start = %start_cell, goal = %goal_cell, "no route from the start to the goal");
                None
            }
        }
    } else {
        None
    };
    let visibility = session.visibility();
    let visibility_display = VisibilityDisplay::new(&visibility);

    let mut layers: Vec<&dyn GridDisplay> = vec![&markers];
    if let Some(ref path) = path_display {
        layers.push(path);
    }
    layers.push(&visibility_display);

    println!("{}", grid.render(&layers));
    println!("start: {} cell {}", session.player_position(), start_cell);
    println!("goal:  {} cell {}", session.goal_position(), goal_cell);

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(grid, &args.flag_save_edges)?;
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();
}

/// Directives from `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives.and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn maze_config_from_args(args: &MazeArgs) -> MazeConfig {

    let sizing = match (args.flag_width, args.flag_height) {
        (Some(width), Some(height)) => {
            Sizing::Fixed(MazeLayout::fixed(Width(width), Height(height), CellSize(args.flag_cell_size)))
        }
        _ => Sizing::Viewport(Viewport::new(args.flag_viewport_width, args.flag_viewport_height)),
    };

    // Backtrack when neither generator is named.
    let algorithm = match (args.cmd_backtrack, args.cmd_noise) {
        (false, true) => Algorithm::Noise { wall_probability: args.flag_wall_probability },
        _ => Algorithm::Backtrack,
    };

    let start = if args.flag_fixed_start {
        let half_cell = match sizing {
            Sizing::Fixed(layout) => layout.cell_size.half(),
            Sizing::Viewport(viewport) => {
                MazeLayout::from_viewport(viewport).map_or(0.0, |layout| layout.cell_size.half())
            }
        };
        StartStrategy::Fixed { default: Point::new(half_cell, half_cell) }
    } else {
        StartStrategy::Sample
    };

    MazeConfig {
        sizing,
        algorithm,
        start,
        min_goal_distance_cells: Some(args.flag_min_goal_distance),
        lighting: !args.flag_lights_off,
        seed: args.flag_seed,
        ..MazeConfig::default()
    }
}

fn as_coordinate_smallvec(coord: mazegen::cells::GridCoordinate) -> CoordinateSmallVec {
    [coord].iter().cloned().collect::<CoordinateSmallVec>()
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let graph = pathing::passage_graph(maze_grid);

    let mut graph_data = String::new();
    graph_data.push_str(graph.node_count().to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(graph.edge_count().to_string().as_ref());
    graph_data.push('\n');

    for edge in graph.raw_edges() {
        let src_as_1_based_index = edge.source().index() + 1;
        let dst_as_1_based_index = edge.target().index() + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
