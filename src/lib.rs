//! **mazegen** generates grid mazes, checks their connectivity and finds collision free
//! spots for a player and a goal on them.

pub mod cells;
pub mod config;
pub mod errors;
pub mod generators;
pub mod geometry;
pub mod grid;
pub mod grid_displays;
pub mod masks;
pub mod pathing;
pub mod placement;
pub mod session;
pub mod units;
mod utils;
