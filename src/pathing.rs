use std::fmt::{Debug, Display};

use num::traits::{Bounded, One, Unsigned, Zero};
use petgraph::algo;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use crate::utils;
use crate::utils::FnvHashMap;

// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
pub trait MaxDistance: Zero + One + Bounded + Unsigned + Debug + Clone + Copy + Display + Ord {}
impl<T: Zero + One + Bounded + Unsigned + Debug + Clone + Copy + Display + Ord> MaxDistance for T {}

/// Step counts from a start passage to every passage reachable from it.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT: MaxDistance> Distances<MaxDistanceT> {
    /// Flood fill the passages of `grid` from `start_coordinate`.
    /// Returns None if the start is outside of the grid or is a wall.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances<MaxDistanceT>> {

        if !grid.is_passage(start_coordinate) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = utils::fnv_hashmap(grid.passages_count());
        distances.insert(start_coordinate, Zero::zero());

        // Every step costs one so the first time a cell is reached is via a shortest route,
        // the map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell: MaxDistanceT = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for neighbour in grid.passage_neighbours(*cell_coord).iter() {
                    if !distances.contains_key(neighbour) {
                        distances.insert(*neighbour, distance_to_cell + One::one());
                        new_frontier.push(*neighbour);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// None when `coord` cannot be reached from the start.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points_on_grid(&self) -> Vec<GridCoordinate> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<Vec<_>>();
        furthest.sort();
        furthest
    }
}

/// Walk back from `end_point` to the start of `distances_from_start` through passages.
/// Returns the path start first, or None if the end is unreachable.
pub fn shortest_path<MaxDistanceT>(grid: &Grid,
                                   distances_from_start: &Distances<MaxDistanceT>,
                                   end_point: GridCoordinate)
                                   -> Option<Vec<GridCoordinate>>
    where MaxDistanceT: MaxDistance
{
    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let (closer_coord, closer_distance) = grid.passage_neighbours(current_coord)
            .iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(*coord).map(|d| (*coord, d))
            })
            .min_by_key(|&(_, distance)| distance)?;

        if closer_distance >= current_distance {
            // We have not got any closer to the start, the distances are from some other grid.
            return None;
        }

        current_coord = closer_coord;
        current_distance = closer_distance;
        path.push(current_coord);
    }

    path.reverse();
    Some(path)
}

/// Can `to` be walked to from `from` through passage cells only?
pub fn is_reachable(grid: &Grid, from: GridCoordinate, to: GridCoordinate) -> bool {
    Distances::<u32>::new(grid, from)
        .map_or(false, |distances| distances.distance_from_start_to(to).is_some())
}

/// Undirected graph with one node per passage cell and an edge between each pair of
/// adjacent passages. Nodes are added in row major order.
pub fn passage_graph(grid: &Grid) -> UnGraph<GridCoordinate, ()> {

    let passages_count = grid.passages_count();
    let mut graph = UnGraph::with_capacity(passages_count, passages_count * 2);
    let mut nodes: FnvHashMap<GridCoordinate, NodeIndex> = utils::fnv_hashmap(passages_count);

    for coord in grid.iter_passages() {
        nodes.insert(coord, graph.add_node(coord));
    }

    // Looking only east and south adds each adjacency once.
    for coord in grid.iter_passages() {
        for direction in &[CompassPrimary::East, CompassPrimary::South] {
            let neighbour = grid.neighbour_at_direction(coord, *direction)
                .and_then(|n| nodes.get(&n));
            if let Some(&neighbour_node) = neighbour {
                graph.add_edge(nodes[&coord], neighbour_node, ());
            }
        }
    }

    graph
}

/// Number of separate passage regions, zero for a solid grid.
pub fn connected_components(grid: &Grid) -> usize {
    algo::connected_components(&passage_graph(grid))
}

/// Exactly one passage region with exactly one route between any two of its cells.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let graph = passage_graph(grid);
    algo::connected_components(&graph) == 1 && !algo::is_cyclic_undirected(&graph)
}

/// Is there any 2x2 block of passages? Such a block is a cycle in the passage network.
pub fn has_open_square(grid: &Grid) -> bool {
    let (w, h) = (grid.width().0 as u32, grid.height().0 as u32);
    (0..h - 1).any(|y| {
        (0..w - 1).any(|x| {
            grid.is_passage(GridCoordinate::new(x, y)) &&
            grid.is_passage(GridCoordinate::new(x + 1, y)) &&
            grid.is_passage(GridCoordinate::new(x, y + 1)) &&
            grid.is_passage(GridCoordinate::new(x + 1, y + 1))
        })
    })
}
