#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative cell store and wall adjacency model for the maze lab.
//!
//! The [`Maze`] owns every cell in a row-major arena. Structural state (walls
//! and terrain) survives across searches, while solver scratch (visited marks,
//! parent links, cost fields, path marks) is cleared before every run. Parent
//! links are arena indices rather than references, so nothing a system keeps
//! after a run can dangle across a reset.

mod distance;

use maze_lab_core::{
    CellCoord, CellSnapshot, Direction, GridError, GridSize, GridSnapshot, Terrain, Walls,
    UNREACHED,
};

/// Rectangular maze made of wall-bounded cells.
#[derive(Clone, Debug)]
pub struct Maze {
    size: GridSize,
    start: CellCoord,
    goal: CellCoord,
    cells: Vec<Cell>,
}

impl Maze {
    /// Creates a fully walled maze with the start at the top-left corner and
    /// the goal at the bottom-right corner.
    pub fn new(size: GridSize) -> Result<Self, GridError> {
        if size.columns() == 0 || size.rows() == 0 {
            return Err(GridError::EmptyDimensions);
        }

        let cell_count = size.cell_count();
        if u32::try_from(cell_count).is_err() {
            return Err(GridError::TooLarge {
                columns: size.columns(),
                rows: size.rows(),
            });
        }

        Ok(Self {
            size,
            start: CellCoord::new(0, 0),
            goal: CellCoord::new(size.columns() - 1, size.rows() - 1),
            cells: vec![Cell::default(); cell_count],
        })
    }

    /// Dimensions of the lattice.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Cell every search starts from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell every search tries to reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Restores every wall, resets terrain to [`Terrain::Low`] and clears scratch.
    pub fn reset_structure(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Clears solver scratch without touching walls or terrain.
    pub fn reset_scratch(&mut self) {
        for cell in &mut self.cells {
            cell.clear_scratch();
        }
    }

    /// Reports whether every wall in the grid is still closed.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.cells.iter().all(|cell| cell.walls.is_closed())
    }

    /// Wall flags of the provided cell.
    #[must_use]
    pub fn walls(&self, cell: CellCoord) -> Option<Walls> {
        self.cell(cell).map(|cell| cell.walls)
    }

    /// Lattice-adjacent cells reachable through an open wall, enumerated
    /// north, east, south, west.
    pub fn neighbors_of(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let mut candidates = [None; 4];

        if let Some(walls) = self.walls(cell) {
            for (slot, direction) in candidates.iter_mut().zip(Direction::ALL) {
                if walls.is_open(direction) {
                    *slot = self.size.step(cell, direction);
                }
            }
        }

        candidates.into_iter().flatten()
    }

    /// Every lattice-adjacent cell regardless of walls, enumerated north,
    /// east, south, west.
    pub fn lattice_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let mut candidates = [None; 4];

        if self.size.contains(cell) {
            for (slot, direction) in candidates.iter_mut().zip(Direction::ALL) {
                *slot = self.size.step(cell, direction);
            }
        }

        candidates.into_iter().flatten()
    }

    /// Removes the wall shared by two adjacent cells on both sides.
    pub fn open_passage(&mut self, from: CellCoord, to: CellCoord) -> Result<(), GridError> {
        let direction = self.shared_wall(from, to)?;
        self.update_walls(from, to, |walls, side| walls.open(side), direction)
    }

    /// Restores the wall shared by two adjacent cells on both sides.
    pub fn close_passage(&mut self, from: CellCoord, to: CellCoord) -> Result<(), GridError> {
        let direction = self.shared_wall(from, to)?;
        self.update_walls(from, to, |walls, side| walls.close(side), direction)
    }

    /// Terrain class of the provided cell.
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Option<Terrain> {
        self.cell(cell).map(|cell| cell.terrain)
    }

    /// Assigns a terrain class to the provided cell.
    pub fn set_terrain(&mut self, cell: CellCoord, terrain: Terrain) -> Result<(), GridError> {
        let slot = self
            .cell_mut(cell)
            .ok_or(GridError::OutOfBounds { cell })?;
        slot.terrain = terrain;
        Ok(())
    }

    /// Reports whether the running algorithm has visited the cell.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(|cell| cell.visited)
    }

    /// Marks the cell as visited by the running algorithm.
    pub fn mark_visited(&mut self, cell: CellCoord) {
        if let Some(slot) = self.cell_mut(cell) {
            slot.visited = true;
        }
    }

    /// Cell the running search reached this one from, if any.
    #[must_use]
    pub fn parent(&self, cell: CellCoord) -> Option<CellCoord> {
        let index = self.cell(cell)?.parent?;
        self.size.coord_of(usize::try_from(index).ok()?)
    }

    /// Links the cell to the neighbour it was reached from.
    pub fn set_parent(&mut self, cell: CellCoord, parent: CellCoord) {
        let Some(parent_index) = self
            .size
            .index_of(parent)
            .and_then(|index| u32::try_from(index).ok())
        else {
            return;
        };

        if let Some(slot) = self.cell_mut(cell) {
            slot.parent = Some(parent_index);
        }
    }

    /// Accumulated cost from the start, or [`UNREACHED`].
    #[must_use]
    pub fn g_cost(&self, cell: CellCoord) -> u32 {
        self.cell(cell).map_or(UNREACHED, |cell| cell.g_cost)
    }

    /// Accumulated cost plus heuristic estimate, or [`UNREACHED`].
    #[must_use]
    pub fn f_cost(&self, cell: CellCoord) -> u32 {
        self.cell(cell).map_or(UNREACHED, |cell| cell.f_cost)
    }

    /// Records the cost fields of the provided cell.
    pub fn set_costs(&mut self, cell: CellCoord, g_cost: u32, f_cost: u32) {
        if let Some(slot) = self.cell_mut(cell) {
            slot.g_cost = g_cost;
            slot.f_cost = f_cost;
        }
    }

    /// Reports whether the cell lies on the revealed path.
    #[must_use]
    pub fn is_on_path(&self, cell: CellCoord) -> bool {
        self.cell(cell).is_some_and(|cell| cell.on_path)
    }

    /// Marks the cell as part of the revealed path.
    pub fn mark_on_path(&mut self, cell: CellCoord) {
        if let Some(slot) = self.cell_mut(cell) {
            slot.on_path = true;
        }
    }

    /// Copies the rendering-relevant state of every cell.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        let cells = self
            .cells
            .iter()
            .map(|cell| CellSnapshot {
                walls: cell.walls,
                terrain: cell.terrain,
                visited: cell.visited,
                on_path: cell.on_path,
            })
            .collect();
        GridSnapshot::new(self.size, self.start, self.goal, cells)
    }

    fn shared_wall(&self, from: CellCoord, to: CellCoord) -> Result<Direction, GridError> {
        for cell in [from, to] {
            if !self.size.contains(cell) {
                return Err(GridError::OutOfBounds { cell });
            }
        }

        direction_between(from, to).ok_or(GridError::NotAdjacent { from, to })
    }

    fn update_walls<F>(
        &mut self,
        from: CellCoord,
        to: CellCoord,
        mut update: F,
        direction: Direction,
    ) -> Result<(), GridError>
    where
        F: FnMut(&mut Walls, Direction),
    {
        let from_slot = self
            .cell_mut(from)
            .ok_or(GridError::OutOfBounds { cell: from })?;
        update(&mut from_slot.walls, direction);

        let to_slot = self
            .cell_mut(to)
            .ok_or(GridError::OutOfBounds { cell: to })?;
        update(&mut to_slot.walls, direction.opposite());
        Ok(())
    }

    fn cell(&self, cell: CellCoord) -> Option<&Cell> {
        self.size
            .index_of(cell)
            .and_then(|index| self.cells.get(index))
    }

    fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut Cell> {
        self.size
            .index_of(cell)
            .and_then(|index| self.cells.get_mut(index))
    }
}

/// Query functions that provide read-only access to maze state.
pub mod query {
    use maze_lab_core::CellCoord;

    use super::{distance::DistanceField, Maze};

    /// Number of open passages, counting each shared wall once.
    #[must_use]
    pub fn passage_count(maze: &Maze) -> usize {
        let open_sides: u32 = maze.cells.iter().map(|cell| cell.walls.open_count()).sum();
        usize::try_from(open_sides / 2).unwrap_or(usize::MAX)
    }

    /// Reports whether every cell can be reached from the start.
    #[must_use]
    pub fn is_connected(maze: &Maze) -> bool {
        let mut field = DistanceField::default();
        field.rebuild_from(maze, maze.start());
        field.reachable_count() == maze.size().cell_count()
    }

    /// Reports whether the open passages form a spanning tree over all cells.
    #[must_use]
    pub fn is_spanning_tree(maze: &Maze) -> bool {
        let cell_count = maze.size().cell_count();
        passage_count(maze) == cell_count.saturating_sub(1) && is_connected(maze)
    }

    /// Edge-count distances from `origin` in row-major order; `u32::MAX` marks
    /// cells that cannot be reached.
    #[must_use]
    pub fn distances_from(maze: &Maze, origin: CellCoord) -> Vec<u32> {
        let mut field = DistanceField::default();
        field.rebuild_from(maze, origin);
        field.into_cells()
    }

    /// Number of cells the last run marked as visited.
    #[must_use]
    pub fn visited_count(maze: &Maze) -> usize {
        maze.cells.iter().filter(|cell| cell.visited).count()
    }

    /// Cells marked as part of the revealed path, in row-major order.
    #[must_use]
    pub fn path_cells(maze: &Maze) -> Vec<CellCoord> {
        maze.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.on_path)
            .filter_map(|(index, _)| maze.size().coord_of(index))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    walls: Walls,
    terrain: Terrain,
    visited: bool,
    on_path: bool,
    parent: Option<u32>,
    g_cost: u32,
    f_cost: u32,
}

impl Cell {
    fn clear_scratch(&mut self) {
        self.visited = false;
        self.on_path = false;
        self.parent = None;
        self.g_cost = UNREACHED;
        self.f_cost = UNREACHED;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walls: Walls::CLOSED,
            terrain: Terrain::Low,
            visited: false,
            on_path: false,
            parent: None,
            g_cost: UNREACHED,
            f_cost: UNREACHED,
        }
    }
}

fn direction_between(from: CellCoord, to: CellCoord) -> Option<Direction> {
    let column_diff = from.column().abs_diff(to.column());
    let row_diff = from.row().abs_diff(to.row());

    if column_diff + row_diff != 1 {
        return None;
    }

    if column_diff == 1 {
        if to.column() > from.column() {
            Some(Direction::East)
        } else {
            Some(Direction::West)
        }
    } else if to.row() > from.row() {
        Some(Direction::South)
    } else {
        Some(Direction::North)
    }
}
