//! Ordered frontiers that give each search strategy its exploration order.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, VecDeque},
    fmt,
};

use maze_lab_core::{Algorithm, CellCoord};

/// Moment at which a strategy marks a cell as visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Cells are marked when first discovered, so each enters the frontier once.
    OnDiscovery,
    /// Cells are marked when popped; duplicates may wait in the frontier and
    /// are discarded lazily.
    OnSettle,
}

/// Cost fields attached to a frontier entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrontierKey {
    /// Accumulated cost from the start.
    pub g_cost: u32,
    /// Accumulated cost plus heuristic estimate.
    pub f_cost: u32,
}

/// Pop-next / push-with-priority contract shared by every search strategy.
pub trait Frontier: Send + fmt::Debug {
    /// Moment at which cells handled by this frontier count as visited.
    fn admission(&self) -> Admission;

    /// Adds a cell with the provided cost fields.
    fn push(&mut self, cell: CellCoord, key: FrontierKey);

    /// Removes the next cell to expand.
    fn pop(&mut self) -> Option<CellCoord>;

    /// Number of entries waiting, stale duplicates included.
    fn len(&self) -> usize;

    /// Reports whether no entry is waiting.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First-in first-out frontier driving breadth-first search.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<CellCoord>,
}

impl Frontier for FifoFrontier {
    fn admission(&self) -> Admission {
        Admission::OnDiscovery
    }

    fn push(&mut self, cell: CellCoord, _key: FrontierKey) {
        self.queue.push_back(cell);
    }

    fn pop(&mut self) -> Option<CellCoord> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Last-in first-out frontier driving depth-first search.
#[derive(Debug, Default)]
pub struct LifoFrontier {
    stack: Vec<CellCoord>,
}

impl Frontier for LifoFrontier {
    fn admission(&self) -> Admission {
        Admission::OnDiscovery
    }

    fn push(&mut self, cell: CellCoord, _key: FrontierKey) {
        self.stack.push(cell);
    }

    fn pop(&mut self) -> Option<CellCoord> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// Cost field a [`CostFrontier`] orders its entries by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CostOrder {
    /// Ascending accumulated cost (Dijkstra).
    Accumulated,
    /// Ascending accumulated cost plus heuristic (A*).
    Estimated,
}

/// Min-priority frontier over a cost field. Equal priorities pop in
/// insertion order.
#[derive(Debug)]
pub struct CostFrontier {
    order: CostOrder,
    heap: BinaryHeap<Reverse<(u32, u64, CellCoord)>>,
    sequence: u64,
}

impl CostFrontier {
    /// Creates an empty frontier ordered by the provided cost field.
    #[must_use]
    pub fn new(order: CostOrder) -> Self {
        Self {
            order,
            heap: BinaryHeap::new(),
            sequence: 0,
        }
    }
}

impl Frontier for CostFrontier {
    fn admission(&self) -> Admission {
        Admission::OnSettle
    }

    fn push(&mut self, cell: CellCoord, key: FrontierKey) {
        let priority = match self.order {
            CostOrder::Accumulated => key.g_cost,
            CostOrder::Estimated => key.f_cost,
        };
        self.heap.push(Reverse((priority, self.sequence, cell)));
        self.sequence = self.sequence.wrapping_add(1);
    }

    fn pop(&mut self) -> Option<CellCoord> {
        self.heap.pop().map(|Reverse((_, _, cell))| cell)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Builds the frontier matching the requested strategy.
#[must_use]
pub fn frontier_for(algorithm: Algorithm) -> Box<dyn Frontier> {
    match algorithm {
        Algorithm::Bfs => Box::<FifoFrontier>::default(),
        Algorithm::Dfs => Box::<LifoFrontier>::default(),
        Algorithm::Dijkstra => Box::new(CostFrontier::new(CostOrder::Accumulated)),
        Algorithm::AStar => Box::new(CostFrontier::new(CostOrder::Estimated)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(count: u32) -> Vec<CellCoord> {
        (0..count).map(|column| CellCoord::new(column, 0)).collect()
    }

    fn drain(frontier: &mut dyn Frontier) -> Vec<CellCoord> {
        std::iter::from_fn(|| frontier.pop()).collect()
    }

    #[test]
    fn fifo_pops_in_insertion_order() {
        let mut frontier = FifoFrontier::default();
        for cell in cells(3) {
            frontier.push(cell, FrontierKey::default());
        }

        assert_eq!(frontier.len(), 3);
        assert_eq!(drain(&mut frontier), cells(3));
        assert!(frontier.is_empty());
    }

    #[test]
    fn lifo_pops_most_recent_first() {
        let mut frontier = LifoFrontier::default();
        for cell in cells(3) {
            frontier.push(cell, FrontierKey::default());
        }

        let mut expected = cells(3);
        expected.reverse();
        assert_eq!(drain(&mut frontier), expected);
    }

    #[test]
    fn accumulated_order_uses_g_cost() {
        let mut frontier = CostFrontier::new(CostOrder::Accumulated);
        let (a, b, c) = (
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
        );
        frontier.push(a, FrontierKey { g_cost: 7, f_cost: 0 });
        frontier.push(b, FrontierKey { g_cost: 2, f_cost: 9 });
        frontier.push(c, FrontierKey { g_cost: 5, f_cost: 1 });

        assert_eq!(drain(&mut frontier), vec![b, c, a]);
    }

    #[test]
    fn estimated_order_uses_f_cost() {
        let mut frontier = CostFrontier::new(CostOrder::Estimated);
        let (a, b, c) = (
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
        );
        frontier.push(a, FrontierKey { g_cost: 7, f_cost: 0 });
        frontier.push(b, FrontierKey { g_cost: 2, f_cost: 9 });
        frontier.push(c, FrontierKey { g_cost: 5, f_cost: 1 });

        assert_eq!(drain(&mut frontier), vec![a, c, b]);
    }

    #[test]
    fn equal_priorities_pop_in_insertion_order() {
        let mut frontier = CostFrontier::new(CostOrder::Accumulated);
        let key = FrontierKey {
            g_cost: 4,
            f_cost: 4,
        };
        for cell in cells(4).into_iter().rev() {
            frontier.push(cell, key);
        }

        let mut expected = cells(4);
        expected.reverse();
        assert_eq!(drain(&mut frontier), expected);
    }

    #[test]
    fn admission_matches_strategy() {
        assert_eq!(
            frontier_for(Algorithm::Bfs).admission(),
            Admission::OnDiscovery
        );
        assert_eq!(
            frontier_for(Algorithm::Dfs).admission(),
            Admission::OnDiscovery
        );
        assert_eq!(
            frontier_for(Algorithm::Dijkstra).admission(),
            Admission::OnSettle
        );
        assert_eq!(
            frontier_for(Algorithm::AStar).admission(),
            Admission::OnSettle
        );
    }
}
