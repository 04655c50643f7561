#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stochastic terrain assignment for maze cells.

use log::debug;
use maze_lab_core::{GridError, Terrain};
use maze_lab_world::Maze;
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

/// Relative draw weights for every terrain class, cheapest first.
pub const TERRAIN_WEIGHTS: [(Terrain, u32); 3] = [
    (Terrain::Low, 60),
    (Terrain::Medium, 30),
    (Terrain::High, 10),
];

/// Draws an independent terrain class for every non-terminal cell.
///
/// The start and goal cells are always kept at [`Terrain::Low`]. Walls are
/// never touched, so assignment may be repeated at any point.
#[derive(Clone, Debug)]
pub struct TerrainAssigner {
    distribution: WeightedIndex<u32>,
}

impl Default for TerrainAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainAssigner {
    /// Creates an assigner using [`TERRAIN_WEIGHTS`].
    #[must_use]
    pub fn new() -> Self {
        let weights = TERRAIN_WEIGHTS.map(|(_, weight)| weight);
        let distribution =
            WeightedIndex::new(weights).expect("terrain weights are positive constants");
        Self { distribution }
    }

    /// Draws a single terrain class.
    pub fn sample<R>(&self, rng: &mut R) -> Terrain
    where
        R: Rng + ?Sized,
    {
        TERRAIN_WEIGHTS[self.distribution.sample(rng)].0
    }

    /// Assigns terrain to every cell and returns how many cells were drawn.
    pub fn assign<R>(&self, maze: &mut Maze, rng: &mut R) -> Result<usize, GridError>
    where
        R: Rng + ?Sized,
    {
        let size = maze.size();
        let start = maze.start();
        let goal = maze.goal();
        let mut drawn = 0;

        for index in 0..size.cell_count() {
            let Some(cell) = size.coord_of(index) else {
                continue;
            };

            if cell == start || cell == goal {
                maze.set_terrain(cell, Terrain::Low)?;
                continue;
            }

            maze.set_terrain(cell, self.sample(rng))?;
            drawn += 1;
        }

        debug!("terrain drawn for {drawn} cells");
        Ok(drawn)
    }
}
