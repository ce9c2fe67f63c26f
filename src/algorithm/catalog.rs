//! Dense indexing of canonical patterns for the solver
//!
//! Converts the point-keyed adjacency index into per-direction compatibility
//! bitsets and sparse multiplicity tables over indices `0..len`, ordered by
//! the scan order of each pattern's canonical point.

use crate::algorithm::bitset::PatternBitset;
use crate::analysis::adjacency::{AdjacencyIndex, Direction};
use crate::analysis::table::ProbingTable;
use crate::io::error::{Result, WithOperation, invalid_parameter};
use crate::spatial::grid::Point;

/// Neighbor patterns of one pattern in one direction with their observation counts
#[derive(Debug, Clone, Default)]
struct WeightedNeighbors {
    allowed: PatternBitset,
    /// `(pattern index, multiplicity)` sorted by index
    counts: Vec<(usize, u32)>,
}

/// Read-only solver view of a pattern model
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    points: Vec<Point>,
    index_of: ProbingTable<Point, usize>,
    neighbors: Vec<[WeightedNeighbors; 4]>,
}

impl PatternCatalog {
    /// Index every pattern of `adjacency`
    ///
    /// # Errors
    ///
    /// Returns an error if the index has no patterns or allocation fails
    pub fn from_adjacency(adjacency: &AdjacencyIndex) -> Result<Self> {
        let points = adjacency.patterns();
        if points.is_empty() {
            return Err(invalid_parameter(
                "adjacency",
                &0,
                &"no patterns to solve with",
            ));
        }

        let mut index_of = ProbingTable::new()?;
        for (index, &point) in points.iter().enumerate() {
            index_of.set(point, index)?;
        }

        let mut neighbors = Vec::new();
        neighbors
            .try_reserve_exact(points.len())
            .with_operation("pattern catalog", points.len())?;

        for &point in &points {
            let mut per_direction: [WeightedNeighbors; 4] = Default::default();
            if let Some(observed) = adjacency.get(point) {
                for direction in Direction::ALL {
                    let mut indices: Vec<usize> = observed
                        .get(direction)
                        .iter()
                        .filter_map(|neighbor| index_of.get(neighbor).copied())
                        .collect();
                    indices.sort_unstable();

                    if let Some(slot) = per_direction.get_mut(direction.index()) {
                        *slot = Self::tally(&indices, points.len());
                    }
                }
            } else {
                for slot in &mut per_direction {
                    slot.allowed = PatternBitset::new(points.len());
                }
            }
            neighbors.push(per_direction);
        }

        Ok(Self {
            points,
            index_of,
            neighbors,
        })
    }

    /// Run-length count a sorted index list
    fn tally(sorted_indices: &[usize], pattern_count: usize) -> WeightedNeighbors {
        let mut allowed = PatternBitset::new(pattern_count);
        let mut counts: Vec<(usize, u32)> = Vec::new();

        for &index in sorted_indices {
            allowed.insert(index);
            match counts.last_mut() {
                Some((last, count)) if *last == index => *count += 1,
                _ => counts.push((index, 1)),
            }
        }

        WeightedNeighbors { allowed, counts }
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Canonical point of a pattern index
    pub fn point(&self, pattern: usize) -> Option<Point> {
        self.points.get(pattern).copied()
    }

    /// Pattern index of a canonical point
    pub fn index_of(&self, point: Point) -> Option<usize> {
        self.index_of.get(&point).copied()
    }

    /// Set containing every pattern
    pub fn full_set(&self) -> PatternBitset {
        PatternBitset::all(self.points.len())
    }

    /// Patterns observed toward `direction` of `pattern`
    pub fn compatible(&self, pattern: usize, direction: Direction) -> Option<&PatternBitset> {
        self.neighbors
            .get(pattern)
            .and_then(|lists| lists.get(direction.index()))
            .map(|weighted| &weighted.allowed)
    }

    /// How often `neighbor` was observed toward `direction` of `pattern`
    pub fn multiplicity(&self, pattern: usize, direction: Direction, neighbor: usize) -> u32 {
        self.neighbors
            .get(pattern)
            .and_then(|lists| lists.get(direction.index()))
            .and_then(|weighted| {
                weighted
                    .counts
                    .binary_search_by_key(&neighbor, |&(index, _)| index)
                    .ok()
                    .and_then(|position| weighted.counts.get(position))
            })
            .map_or(0, |&(_, count)| count)
    }

    /// Union of the sets compatible toward `direction` over every member of `candidates`
    pub fn support(&self, candidates: &PatternBitset, direction: Direction) -> PatternBitset {
        let mut support = PatternBitset::new(self.points.len());
        for pattern in candidates.iter() {
            if let Some(allowed) = self.compatible(pattern, direction) {
                support.union_with(allowed);
            }
        }
        support
    }
}
