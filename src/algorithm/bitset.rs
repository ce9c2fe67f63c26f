use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset over dense pattern indices
///
/// Holds a cell's candidate set and the per-direction compatibility sets.
/// Indices are 0-based positions in the [`PatternCatalog`](crate::algorithm::catalog::PatternCatalog).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternBitset {
    bits: BitVec,
}

impl PatternBitset {
    /// Create a bitset with no patterns present
    pub fn new(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![0; pattern_count],
        }
    }

    /// Create a bitset containing every pattern
    pub fn all(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![1; pattern_count],
        }
    }

    /// Number of patterns the set ranges over
    pub fn universe(&self) -> usize {
        self.bits.len()
    }

    /// Insert a pattern index, ignoring indices outside the universe
    pub fn insert(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, true);
        }
    }

    /// Remove a pattern index
    pub fn remove(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, false);
        }
    }

    /// Test pattern membership
    pub fn contains(&self, pattern: usize) -> bool {
        self.bits.get(pattern).as_deref() == Some(&true)
    }

    /// Intersect in place, returning whether any pattern was removed
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        let before = self.count();
        self.bits &= &other.bits;
        self.count() != before
    }

    /// Union in place
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Whether every member is also in `other`
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bits
            .iter_ones()
            .all(|pattern| other.contains(pattern))
    }

    /// Test if no patterns are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count patterns in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Lowest member, if any
    pub fn first(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all pattern indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl Default for PatternBitset {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for PatternBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternBitset({} patterns: {:?})", self.count(), self.to_vec())
    }
}
