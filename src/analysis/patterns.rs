//! Content-addressed deduplication of source regions into canonical patterns

use crate::analysis::table::{ProbeKey, ProbingTable, TableStats};
use crate::io::error::Result;
use crate::spatial::grid::Point;
use crate::spatial::tiles::Region;

impl ProbeKey for Region {
    fn probe_hash(&self) -> u64 {
        self.content_hash()
    }
}

/// Maps region content to the point of its first occurrence
///
/// The table owns a copy of every distinct region inserted, for its whole
/// lifetime.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: ProbingTable<Region, Point>,
}

impl PatternTable {
    /// Create an empty table
    ///
    /// # Errors
    ///
    /// Returns an error if the initial storage cannot be reserved
    pub fn new() -> Result<Self> {
        Ok(Self {
            entries: ProbingTable::new()?,
        })
    }

    /// Create an empty table with a specific initial slot count
    ///
    /// # Errors
    ///
    /// Returns an error if the initial storage cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            entries: ProbingTable::with_capacity(capacity)?,
        })
    }

    /// Canonicalize `region` observed at `point`
    ///
    /// Returns the stored point if pixel-identical content was inserted
    /// before; otherwise records `point` as the canonical identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the table must grow and the new storage cannot be reserved
    pub fn get_or_insert(&mut self, region: Region, point: Point) -> Result<Point> {
        self.entries.get_or_insert(region, point).copied()
    }

    /// Canonical point for `region`, if its content has been seen
    pub fn get(&self, region: &Region) -> Option<Point> {
        self.entries.get(region).copied()
    }

    /// Number of distinct patterns
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pattern has been recorded
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current slot count of the underlying table
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Growth and collision counters of the underlying table
    pub const fn stats(&self) -> TableStats {
        self.entries.stats()
    }

    /// Canonical points in scan order
    pub fn canonical_points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.entries.iter().map(|(_, &point)| point).collect();
        points.sort_unstable();
        points
    }
}
