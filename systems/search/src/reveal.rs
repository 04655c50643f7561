//! Parent-link walk that marks and measures a found path.

use maze_lab_core::{Algorithm, CellCoord, SearchReport};
use maze_lab_world::Maze;

/// Outcome of a single reveal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStep {
    /// The cell was marked as part of the path.
    Marked(CellCoord),
    /// The walk reached the start cell and produced the path summary.
    Done(SearchReport),
}

/// Walks parent links from the goal back to the start, one cell per step.
///
/// Every cell on the chain counts as one step and contributes its terrain
/// cost, the start and goal included. The walk never visits more cells than
/// the grid holds, so corrupted parent links cannot loop forever.
#[derive(Clone, Debug)]
pub struct PathReveal {
    algorithm: Algorithm,
    cursor: Option<CellCoord>,
    remaining: usize,
    steps: usize,
    total_cost: u64,
}

impl PathReveal {
    /// Prepares a walk starting at the maze goal.
    #[must_use]
    pub fn begin(maze: &Maze, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            cursor: Some(maze.goal()),
            remaining: maze.size().cell_count(),
            steps: 0,
            total_cost: 0,
        }
    }

    /// Marks the next cell of the path, or returns the summary once the walk ends.
    pub fn step(&mut self, maze: &mut Maze) -> RevealStep {
        let Some(cell) = self.cursor.filter(|_| self.remaining > 0) else {
            return RevealStep::Done(self.report());
        };

        maze.mark_on_path(cell);
        self.steps += 1;
        self.total_cost += u64::from(maze.terrain(cell).unwrap_or_default().cost());
        self.remaining -= 1;
        self.cursor = maze.parent(cell);

        RevealStep::Marked(cell)
    }

    fn report(&self) -> SearchReport {
        SearchReport {
            algorithm: self.algorithm,
            steps: self.steps,
            total_cost: self.total_cost,
        }
    }
}
