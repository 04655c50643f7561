#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stepwise randomized-Prim maze carver.
//!
//! The carver keeps a single global list of candidate walls. Each candidate
//! joins a cell already inside the maze to a lattice neighbour that was still
//! outside it when the candidate was recorded. A step draws candidates
//! uniformly at random, silently discarding those whose far side has joined the
//! maze since, until one can be carved. Once the list runs dry every cell has
//! been reached exactly once, so the open passages form a spanning tree.

use log::{debug, trace};
use maze_lab_core::{CellCoord, GridError};
use maze_lab_world::Maze;
use rand::Rng;

/// Wall that may be removed to pull `to` into the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Cell already carved into the maze.
    pub from: CellCoord,
    /// Cell outside the maze when the candidate was recorded.
    pub to: CellCoord,
}

/// Outcome of a single carving step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStep {
    /// A wall was removed between the two cells.
    Carved {
        /// Cell that was already part of the maze.
        from: CellCoord,
        /// Cell that joined the maze.
        to: CellCoord,
    },
    /// The candidate list is exhausted and the maze is complete.
    Complete {
        /// Total number of passages opened during the run.
        passages: usize,
    },
}

/// Randomized-Prim generator that carves one passage per step.
#[derive(Debug)]
pub struct PrimCarver {
    candidates: Vec<Candidate>,
    passages: usize,
}

impl PrimCarver {
    /// Prepares a carving run on a freshly reset maze.
    ///
    /// The start cell is marked as visited and its walls seed the candidate
    /// list. Grids with any open wall are rejected with [`GridError::NotFresh`].
    pub fn begin(maze: &mut Maze) -> Result<Self, GridError> {
        if !maze.is_fresh() {
            return Err(GridError::NotFresh);
        }

        maze.reset_scratch();
        let start = maze.start();
        maze.mark_visited(start);

        let mut carver = Self {
            candidates: Vec::new(),
            passages: 0,
        };
        carver.record_candidates(maze, start);
        Ok(carver)
    }

    /// Number of candidate walls currently awaiting a draw.
    #[must_use]
    pub fn pending_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Carves the next passage, or reports completion once no candidate is left.
    ///
    /// Completion clears the solver scratch used to track visited cells.
    pub fn step<R>(&mut self, maze: &mut Maze, rng: &mut R) -> Result<CarveStep, GridError>
    where
        R: Rng + ?Sized,
    {
        while !self.candidates.is_empty() {
            let index = rng.gen_range(0..self.candidates.len());
            let candidate = self.candidates.swap_remove(index);

            if maze.is_visited(candidate.to) {
                trace!(
                    "discarding stale candidate {} -> {}",
                    candidate.from,
                    candidate.to
                );
                continue;
            }

            maze.open_passage(candidate.from, candidate.to)?;
            maze.mark_visited(candidate.to);
            self.passages += 1;
            self.record_candidates(maze, candidate.to);

            return Ok(CarveStep::Carved {
                from: candidate.from,
                to: candidate.to,
            });
        }

        maze.reset_scratch();
        debug!("maze carved with {} passages", self.passages);
        Ok(CarveStep::Complete {
            passages: self.passages,
        })
    }

    fn record_candidates(&mut self, maze: &Maze, cell: CellCoord) {
        for neighbor in maze.lattice_neighbors(cell) {
            if !maze.is_visited(neighbor) {
                self.candidates.push(Candidate {
                    from: cell,
                    to: neighbor,
                });
            }
        }
    }
}

/// Carves a complete maze, invoking `on_carve` after every removed wall.
///
/// Returns the number of passages opened.
pub fn generate<R, F>(maze: &mut Maze, rng: &mut R, mut on_carve: F) -> Result<usize, GridError>
where
    R: Rng + ?Sized,
    F: FnMut(CellCoord, CellCoord, &Maze),
{
    let mut carver = PrimCarver::begin(maze)?;

    loop {
        match carver.step(maze, rng)? {
            CarveStep::Carved { from, to } => on_carve(from, to, maze),
            CarveStep::Complete { passages } => return Ok(passages),
        }
    }
}
