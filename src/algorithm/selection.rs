use crate::{
    algorithm::{bitset::PatternBitset, catalog::PatternCatalog, solver::Cell},
    analysis::adjacency::Direction,
    math::probability::RandomSelector,
    spatial::grid::Point,
};
use ndarray::Array2;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Minimum-remaining-values ordering over uncollapsed cells
///
/// Entries are `(candidate count, row, col)` so equal counts resolve to the
/// lowest row, then the lowest column. A cell is pushed again whenever its
/// set shrinks; stale entries are discarded when popped.
#[derive(Debug, Default)]
pub struct CollapseQueue {
    heap: BinaryHeap<Reverse<(usize, usize, usize)>>,
}

impl CollapseQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every uncollapsed cell of `cells`
    pub fn from_cells(cells: &Array2<Cell>) -> Self {
        let mut queue = Self::new();
        for ((row, col), cell) in cells.indexed_iter() {
            if let Cell::Uncollapsed { candidates } = cell {
                queue.push(Point::new(col, row), candidates.count());
            }
        }
        queue
    }

    /// Record the current candidate count of a cell
    pub fn push(&mut self, cell: Point, candidate_count: usize) {
        self.heap.push(Reverse((candidate_count, cell.y, cell.x)));
    }

    /// Remove and return the uncollapsed cell with the fewest candidates
    pub fn pop_min(&mut self, cells: &Array2<Cell>) -> Option<Point> {
        while let Some(Reverse((count, row, col))) = self.heap.pop() {
            let current = match cells.get([row, col]) {
                Some(Cell::Uncollapsed { candidates }) => candidates.count(),
                _ => continue,
            };
            if current == count {
                return Some(Point::new(col, row));
            }
        }
        None
    }

    /// Number of queued entries, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no entries are queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Neighbor of `cell` one step toward `direction`, if inside `cells`
pub fn neighbor_cell(cells: &Array2<Cell>, cell: Point, direction: Direction) -> Option<Point> {
    direction
        .step(cell, 1)
        .filter(|neighbor| neighbor.x < cells.ncols() && neighbor.y < cells.nrows())
}

/// Sampling weight of each candidate at `cell`
///
/// A candidate weighs the sum of its multiplicities in the neighbor lists of
/// the already collapsed neighbors, read in the direction facing `cell`.
/// Without collapsed neighbors every candidate weighs 1.
pub fn candidate_weights(
    catalog: &PatternCatalog,
    cells: &Array2<Cell>,
    cell: Point,
    candidates: &PatternBitset,
) -> Vec<(usize, u64)> {
    let collapsed_neighbors: Vec<(usize, Direction)> = Direction::ALL
        .iter()
        .filter_map(|&direction| {
            let neighbor = neighbor_cell(cells, cell, direction)?;
            match cells.get([neighbor.y, neighbor.x]) {
                Some(Cell::Collapsed { pattern }) => Some((*pattern, direction.opposite())),
                _ => None,
            }
        })
        .collect();

    candidates
        .iter()
        .map(|candidate| {
            let weight = if collapsed_neighbors.is_empty() {
                1
            } else {
                collapsed_neighbors
                    .iter()
                    .map(|&(pattern, facing)| {
                        u64::from(catalog.multiplicity(pattern, facing, candidate))
                    })
                    .sum()
            };
            (candidate, weight)
        })
        .collect()
}

/// Sample one pattern for `cell` from its candidates
///
/// Falls back to a uniform draw if every frequency weight is zero.
pub fn choose_pattern(
    selector: &mut RandomSelector,
    catalog: &PatternCatalog,
    cells: &Array2<Cell>,
    cell: Point,
    candidates: &PatternBitset,
) -> Option<usize> {
    let weighted = candidate_weights(catalog, cells, cell, candidates);
    let weights: Vec<u64> = weighted.iter().map(|&(_, weight)| weight).collect();

    let index = selector
        .weighted_choice(&weights)
        .or_else(|| selector.uniform_choice(weighted.len()))?;
    weighted.get(index).map(|&(candidate, _)| candidate)
}
