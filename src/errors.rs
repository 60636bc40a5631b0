//! Error types for maze generation and placement.
//!
//! Other modules `use crate::errors::*;` to get the `Error`, `ErrorKind`,
//! `Result` and `ResultExt` types that `error_chain!` creates.

use crate::placement::PlacementTarget;
use error_chain::*;

/// Smallest grid side that has an interior cell to carve from or sample.
pub const MIN_GRID_SIDE: usize = 3;

error_chain! {

    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("grid dimensions too small")
            display("invalid grid dimensions {}x{}, at least {}x{} cells are required",
                    width, height, MIN_GRID_SIDE, MIN_GRID_SIDE)
        }

        InvalidWallProbability(probability: f64) {
            description("wall probability outside of [0, 1]")
            display("invalid wall probability {}, expected a value in [0, 1]", probability)
        }

        InvalidViewport(width: f32, height: f32) {
            description("viewport cannot hold a maze")
            display("invalid viewport {}x{}", width, height)
        }

        InvalidConfiguration(reason: String) {
            description("invalid maze configuration")
            display("invalid maze configuration: {}", reason)
        }

        PlacementExhausted(target: PlacementTarget, attempts: usize) {
            description("no valid placement found within the retry budget")
            display("no valid {} position found after {} attempts", target, attempts)
        }
    }
}
