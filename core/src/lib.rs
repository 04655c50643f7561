#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze lab engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative cell store, and the stepwise systems. Adapters submit
//! [`Command`] values describing the run they want, systems mutate the maze in
//! small steps and describe each one with an [`Event`], and every run ends
//! with exactly one [`RunReport`]. Adapters never observe live cells; they
//! render immutable [`GridSnapshot`] copies instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accumulated cost value used for cells that no search has reached yet.
pub const UNREACHED: u32 = u32::MAX;

/// Cheapest traversal cost any cell may carry.
pub const MIN_TERRAIN_COST: u32 = Terrain::Low.cost();

/// Commands that an adapter may issue to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Restores every wall and resets terrain and solver state.
    Reset,
    /// Resets the grid and carves a fresh perfect maze into it.
    Generate,
    /// Draws a new terrain class for every non-terminal cell.
    RandomizeTerrain,
    /// Searches for a path from the start cell to the goal cell.
    Solve {
        /// Strategy used to explore the maze.
        algorithm: Algorithm,
    },
}

/// Incremental mutation emitted after every algorithmic step of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that the wall between two adjacent cells was removed.
    PassageCarved {
        /// Cell that was already part of the maze.
        from: CellCoord,
        /// Cell that joined the maze through the new passage.
        to: CellCoord,
    },
    /// Reports that terrain classes were drawn for the grid.
    TerrainAssigned {
        /// Number of cells that received a random terrain class.
        cells: usize,
    },
    /// Reports that a search finished processing a cell.
    CellExpanded {
        /// Cell whose neighbours were examined.
        cell: CellCoord,
    },
    /// Reports that a cell was marked as part of the reconstructed path.
    PathCellMarked {
        /// Cell that now lies on the revealed path.
        cell: CellCoord,
    },
}

/// Terminal result published once a run completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunReport {
    /// The grid returned to its initial structure.
    GridReset,
    /// A spanning-tree maze was carved.
    MazeGenerated {
        /// Number of passages opened by the generator.
        passages: usize,
    },
    /// Terrain classes were redrawn.
    TerrainRandomized {
        /// Number of cells that received a random terrain class.
        cells: usize,
    },
    /// A search ran to completion.
    SearchFinished(SearchOutcome),
}

impl RunReport {
    /// Human-readable summary suitable for a status line.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::GridReset => "Grid Reset.".to_owned(),
            Self::MazeGenerated { .. } => "Maze Generated.".to_owned(),
            Self::TerrainRandomized { .. } => "Terrain Randomized.".to_owned(),
            Self::SearchFinished(outcome) => outcome.status_message(),
        }
    }
}

/// Result of a completed search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// The goal was reached and its path reconstructed.
    Found(SearchReport),
    /// The frontier ran dry before the goal was reached.
    NotFound {
        /// Strategy that exhausted its frontier.
        algorithm: Algorithm,
    },
}

impl SearchOutcome {
    /// Strategy that produced the outcome.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Found(report) => report.algorithm,
            Self::NotFound { algorithm } => *algorithm,
        }
    }

    /// Returns the path summary when the goal was reached.
    #[must_use]
    pub const fn report(&self) -> Option<&SearchReport> {
        match self {
            Self::Found(report) => Some(report),
            Self::NotFound { .. } => None,
        }
    }

    /// Human-readable summary suitable for a status line.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::Found(report) => report.to_string(),
            Self::NotFound { .. } => "No Path Found".to_owned(),
        }
    }
}

/// Summary of the path reconstructed after a successful search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchReport {
    /// Strategy that found the path.
    pub algorithm: Algorithm,
    /// Number of cells on the path, start and goal included.
    pub steps: usize,
    /// Sum of the terrain cost of every cell on the path.
    pub total_cost: u64,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Path Found! Steps: {} | Total Cost: {}",
            self.algorithm, self.steps, self.total_cost
        )
    }
}

/// Search strategies supported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Unweighted breadth-first search.
    Bfs,
    /// Unweighted depth-first search.
    Dfs,
    /// Uniform-cost search over terrain costs.
    Dijkstra,
    /// Uniform-cost search guided by a Manhattan heuristic.
    AStar,
}

impl Algorithm {
    /// Every supported strategy in presentation order.
    pub const ALL: [Algorithm; 4] = [Self::Bfs, Self::Dfs, Self::Dijkstra, Self::AStar];

    /// Short label used in status messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
        }
    }

    /// Reports whether the strategy takes terrain costs into account.
    #[must_use]
    pub const fn is_weighted(self) -> bool {
        matches!(self, Self::Dijkstra | Self::AStar)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Traversal cost class assigned to a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Cheapest terrain, also used for the start and goal cells.
    #[default]
    Low,
    /// Intermediate terrain.
    Medium,
    /// Most expensive terrain.
    High,
}

impl Terrain {
    /// Every terrain class ordered from cheapest to most expensive.
    pub const ALL: [Terrain; 3] = [Self::Low, Self::Medium, Self::High];

    /// Cost paid for entering a cell of this class.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 5,
            Self::High => 10,
        }
    }
}

/// Cardinal directions between lattice-adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Neighbour enumeration order used by every search.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Direction pointing back across the same wall.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::East => 0b0010,
            Self::South => 0b0100,
            Self::West => 0b1000,
        }
    }
}

/// Wall flags of a single cell, one bit per side. A set bit is impassable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls(u8);

impl Walls {
    /// All four sides closed.
    pub const CLOSED: Walls = Walls(0b1111);

    /// Reports whether the wall on the given side has been removed.
    #[must_use]
    pub const fn is_open(self, direction: Direction) -> bool {
        self.0 & direction.bit() == 0
    }

    /// Reports whether every side is still closed.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        self.0 == Self::CLOSED.0
    }

    /// Removes the wall on the given side.
    pub fn open(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// Restores the wall on the given side.
    pub fn close(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    /// Number of sides whose wall has been removed.
    #[must_use]
    pub const fn open_count(self) -> u32 {
        4 - self.0.count_ones()
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dimensions of the rectangular lattice measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the lattice.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the lattice.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells, saturating on overflow.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the coordinate lies inside the lattice.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major index of the cell, if it lies inside the lattice.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinate stored at the provided row-major index.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Cell one step away in the given direction, if it lies inside the lattice.
    #[must_use]
    pub fn step(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let next = match direction {
            Direction::North => CellCoord::new(cell.column(), cell.row().checked_sub(1)?),
            Direction::East => CellCoord::new(cell.column().checked_add(1)?, cell.row()),
            Direction::South => CellCoord::new(cell.column(), cell.row().checked_add(1)?),
            Direction::West => CellCoord::new(cell.column().checked_sub(1)?, cell.row()),
        };

        self.contains(next).then_some(next)
    }
}

/// Immutable copy of a single cell used for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Wall flags of the cell.
    pub walls: Walls,
    /// Terrain class of the cell.
    pub terrain: Terrain,
    /// Indicates whether the running algorithm has visited the cell.
    pub visited: bool,
    /// Indicates whether the cell lies on the revealed path.
    pub on_path: bool,
}

/// Immutable copy of the entire cell store published after each step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    size: GridSize,
    start: CellCoord,
    goal: CellCoord,
    cells: Vec<CellSnapshot>,
}

impl GridSnapshot {
    /// Creates a snapshot from row-major cell copies.
    #[must_use]
    pub fn new(
        size: GridSize,
        start: CellCoord,
        goal: CellCoord,
        cells: Vec<CellSnapshot>,
    ) -> Self {
        Self {
            size,
            start,
            goal,
            cells,
        }
    }

    /// Dimensions of the captured grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Start cell of the captured grid.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Goal cell of the captured grid.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Copy of the cell at the provided coordinate.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<&CellSnapshot> {
        self.size
            .index_of(cell)
            .and_then(|index| self.cells.get(index))
    }

    /// Iterator over all captured cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
        self.cells.iter()
    }
}

/// Errors raised when the cell store rejects a structural request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GridError {
    /// The grid must contain at least one row and one column.
    #[error("grid dimensions must be at least 1x1")]
    EmptyDimensions,
    /// The lattice holds more cells than parent links can address.
    #[error("a {columns}x{rows} grid has too many cells")]
    TooLarge {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The coordinate lies outside the lattice.
    #[error("cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// The two cells do not share a wall.
    #[error("cells {from} and {to} are not lattice-adjacent")]
    NotAdjacent {
        /// First cell of the pair.
        from: CellCoord,
        /// Second cell of the pair.
        to: CellCoord,
    },
    /// Generation requires every wall to be closed.
    #[error("maze generation requires a freshly reset grid")]
    NotFresh,
}
