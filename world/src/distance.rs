//! Passage distance field used by the world's connectivity queries.

use std::collections::VecDeque;

use maze_lab_core::CellCoord;

use crate::Maze;

/// Dense edge-count distances from a single origin over open passages.
///
/// Distances default to `u32::MAX` for cells the origin cannot reach, so
/// callers can tell disconnected regions apart from traversable ones.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    distances: Vec<u32>,
}

impl DistanceField {
    /// Rebuilds the distances using a breadth-first walk over open walls.
    pub(crate) fn rebuild_from(&mut self, maze: &Maze, origin: CellCoord) {
        let size = maze.size();
        let cell_count = size.cell_count();

        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }

        let Some(origin_index) = size.index_of(origin) else {
            return;
        };

        self.distances[origin_index] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = size.index_of(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in maze.neighbors_of(cell) {
                let Some(neighbor_index) = size.index_of(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Number of cells the origin can reach, itself included.
    #[must_use]
    pub(crate) fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != u32::MAX)
            .count()
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub(crate) fn into_cells(self) -> Vec<u32> {
        self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_lab_core::GridSize;

    #[test]
    fn rebuild_sets_origin_to_zero_and_follows_passages() {
        let mut maze = Maze::new(GridSize::new(3, 1)).expect("valid size");
        maze.open_passage(CellCoord::new(0, 0), CellCoord::new(1, 0))
            .expect("adjacent");
        maze.open_passage(CellCoord::new(1, 0), CellCoord::new(2, 0))
            .expect("adjacent");

        let mut field = DistanceField::default();
        field.rebuild_from(&maze, CellCoord::new(0, 0));

        assert_eq!(field.reachable_count(), 3);
        assert_eq!(field.into_cells(), vec![0, 1, 2]);
    }

    #[test]
    fn rebuild_respects_closed_walls() {
        let mut maze = Maze::new(GridSize::new(3, 1)).expect("valid size");
        maze.open_passage(CellCoord::new(0, 0), CellCoord::new(1, 0))
            .expect("adjacent");

        let mut field = DistanceField::default();
        field.rebuild_from(&maze, CellCoord::new(0, 0));

        assert_eq!(field.reachable_count(), 2);
        assert_eq!(field.into_cells(), vec![0, 1, u32::MAX]);
    }
}
