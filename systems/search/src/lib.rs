#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stepwise path search over the maze's open passages.
//!
//! Breadth-first, depth-first, Dijkstra and A* share one visit/relax loop and
//! differ only in the [`Frontier`] that orders their work. Unweighted
//! frontiers mark cells on discovery and ignore terrain. Weighted frontiers
//! mark cells when they are settled, relax neighbour costs, and lazily drop
//! stale duplicates. A successful run is followed by a [`PathReveal`] that
//! walks the parent links back from the goal.

mod frontier;
mod reveal;

pub use frontier::{
    frontier_for, Admission, CostFrontier, CostOrder, FifoFrontier, Frontier, FrontierKey,
    LifoFrontier,
};
pub use reveal::{PathReveal, RevealStep};

use log::{debug, trace};
use maze_lab_core::{Algorithm, CellCoord, Event, SearchOutcome, MIN_TERRAIN_COST};
use maze_lab_world::Maze;

/// Admissible estimate of the remaining cost from `cell` to `goal`.
///
/// Every remaining step enters at least one cell, and no cell costs less than
/// [`MIN_TERRAIN_COST`].
#[must_use]
pub fn heuristic(cell: CellCoord, goal: CellCoord) -> u32 {
    cell.manhattan_distance(goal).saturating_mul(MIN_TERRAIN_COST)
}

/// Outcome of a single search step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStep {
    /// The cell was popped and its neighbours were examined.
    Expanded(CellCoord),
    /// The goal was popped; the search is over.
    Reached(CellCoord),
    /// The frontier ran dry without reaching the goal.
    Exhausted,
}

/// A search in progress over a single maze.
#[derive(Debug)]
pub struct SearchRun {
    algorithm: Algorithm,
    frontier: Box<dyn Frontier>,
    goal: CellCoord,
    expanded: usize,
    state: RunState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
    Running,
    Reached,
    Exhausted,
}

impl SearchRun {
    /// Clears solver scratch and seeds the frontier with the start cell.
    pub fn begin(maze: &mut Maze, algorithm: Algorithm) -> Self {
        maze.reset_scratch();

        let mut frontier = frontier_for(algorithm);
        let start = maze.start();
        let goal = maze.goal();

        let key = if algorithm.is_weighted() {
            let estimate = estimate(algorithm, start, goal);
            maze.set_costs(start, 0, estimate);
            FrontierKey {
                g_cost: 0,
                f_cost: estimate,
            }
        } else {
            FrontierKey::default()
        };

        if frontier.admission() == Admission::OnDiscovery {
            maze.mark_visited(start);
        }
        frontier.push(start, key);

        debug!("{algorithm} search started from {start} toward {goal}");
        Self {
            algorithm,
            frontier,
            goal,
            expanded: 0,
            state: RunState::Running,
        }
    }

    /// Strategy driving the run.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of cells expanded so far.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Pops frontier entries until one cell is expanded or the run ends.
    pub fn step(&mut self, maze: &mut Maze) -> SearchStep {
        match self.state {
            RunState::Reached => return SearchStep::Reached(self.goal),
            RunState::Exhausted => return SearchStep::Exhausted,
            RunState::Running => {}
        }

        let admission = self.frontier.admission();

        loop {
            let Some(cell) = self.frontier.pop() else {
                self.state = RunState::Exhausted;
                debug!(
                    "{} frontier exhausted after {} expansions",
                    self.algorithm, self.expanded
                );
                return SearchStep::Exhausted;
            };

            if admission == Admission::OnSettle {
                if maze.is_visited(cell) {
                    continue;
                }
                maze.mark_visited(cell);
            }

            if cell == self.goal {
                self.state = RunState::Reached;
                debug!(
                    "{} reached {} after {} expansions",
                    self.algorithm, cell, self.expanded
                );
                return SearchStep::Reached(cell);
            }

            let neighbors: Vec<CellCoord> = maze.neighbors_of(cell).collect();
            for neighbor in neighbors {
                if maze.is_visited(neighbor) {
                    continue;
                }

                match admission {
                    Admission::OnDiscovery => {
                        maze.mark_visited(neighbor);
                        maze.set_parent(neighbor, cell);
                        self.frontier.push(neighbor, FrontierKey::default());
                    }
                    Admission::OnSettle => self.relax(maze, cell, neighbor),
                }
            }

            self.expanded += 1;
            trace!("{} expanded {}", self.algorithm, cell);
            return SearchStep::Expanded(cell);
        }
    }

    fn relax(&mut self, maze: &mut Maze, cell: CellCoord, neighbor: CellCoord) {
        let entry_cost = maze.terrain(neighbor).unwrap_or_default().cost();
        let candidate = maze.g_cost(cell).saturating_add(entry_cost);

        if candidate >= maze.g_cost(neighbor) {
            return;
        }

        let estimated = candidate.saturating_add(estimate(self.algorithm, neighbor, self.goal));
        maze.set_costs(neighbor, candidate, estimated);
        maze.set_parent(neighbor, cell);
        self.frontier.push(
            neighbor,
            FrontierKey {
                g_cost: candidate,
                f_cost: estimated,
            },
        );
    }
}

fn estimate(algorithm: Algorithm, cell: CellCoord, goal: CellCoord) -> u32 {
    match algorithm {
        Algorithm::AStar => heuristic(cell, goal),
        Algorithm::Bfs | Algorithm::Dfs | Algorithm::Dijkstra => 0,
    }
}

/// Runs a search and its path reveal to completion.
///
/// `on_step` observes the maze after every expansion and every revealed path
/// cell.
pub fn solve<F>(maze: &mut Maze, algorithm: Algorithm, mut on_step: F) -> SearchOutcome
where
    F: FnMut(&Event, &Maze),
{
    let mut run = SearchRun::begin(maze, algorithm);

    loop {
        match run.step(maze) {
            SearchStep::Expanded(cell) => on_step(&Event::CellExpanded { cell }, maze),
            SearchStep::Reached(_) => break,
            SearchStep::Exhausted => return SearchOutcome::NotFound { algorithm },
        }
    }

    let mut reveal = PathReveal::begin(maze, algorithm);
    loop {
        match reveal.step(maze) {
            RevealStep::Marked(cell) => on_step(&Event::PathCellMarked { cell }, maze),
            RevealStep::Done(report) => {
                debug!("{report}");
                return SearchOutcome::Found(report);
            }
        }
    }
}
