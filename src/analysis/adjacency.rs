//! Per-pattern neighbor observations in the four cardinal directions
//!
//! Lists keep every observation, duplicates included. Multiplicity is the
//! co-occurrence frequency the solver samples with.

use crate::analysis::table::{ProbeKey, ProbingTable, TableStats};
use crate::io::error::{Result, WithOperation};
use crate::spatial::grid::Point;

impl ProbeKey for Point {
    fn probe_hash(&self) -> u64 {
        (self.x as u64).wrapping_mul(31).wrapping_add(self.y as u64)
    }
}

/// Cardinal direction from a pattern to its neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward lower rows
    Up,
    /// Toward higher rows
    Down,
    /// Toward lower columns
    Left,
    /// Toward higher columns
    Right,
}

impl Direction {
    /// All directions in storage order
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Storage slot of this direction
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    /// The direction pointing back
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step `(dx, dy)`
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Move `point` by `distance` steps, `None` on underflow
    pub const fn step(self, point: Point, distance: usize) -> Option<Point> {
        let (dx, dy) = self.delta();
        point.offset(dx * distance as isize, dy * distance as isize)
    }
}

/// Neighbor lists of one pattern, one growable list per direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    lists: [Vec<Point>; 4],
}

impl Neighbors {
    /// Empty lists in every direction
    pub fn new() -> Self {
        Self::default()
    }

    /// Observations recorded toward `direction`, in insertion order
    pub fn get(&self, direction: Direction) -> &[Point] {
        self.lists
            .get(direction.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append one observation
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot grow
    pub fn push(&mut self, direction: Direction, neighbor: Point) -> Result<()> {
        if let Some(list) = self.lists.get_mut(direction.index()) {
            list.try_reserve(1)
                .with_operation("neighbor list append", list.len() + 1)?;
            list.push(neighbor);
        }
        Ok(())
    }

    /// Append every observation of `other`, direction by direction
    ///
    /// # Errors
    ///
    /// Returns an error if any list cannot grow
    pub fn append(&mut self, other: &Self) -> Result<()> {
        for direction in Direction::ALL {
            let incoming = other.get(direction);
            if let Some(list) = self.lists.get_mut(direction.index()) {
                list.try_reserve(incoming.len())
                    .with_operation("neighbor list append", list.len() + incoming.len())?;
                list.extend_from_slice(incoming);
            }
        }
        Ok(())
    }

    /// How many times `neighbor` was observed toward `direction`
    pub fn multiplicity(&self, direction: Direction, neighbor: Point) -> usize {
        self.get(direction)
            .iter()
            .filter(|&&point| point == neighbor)
            .count()
    }

    /// Total observations across all directions
    pub fn observation_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Whether no observation has been recorded
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }
}

/// Maps each canonical pattern to its accumulated neighbor lists
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    entries: ProbingTable<Point, Neighbors>,
}

impl AdjacencyIndex {
    /// Create an empty index
    ///
    /// # Errors
    ///
    /// Returns an error if the initial storage cannot be reserved
    pub fn new() -> Result<Self> {
        Ok(Self {
            entries: ProbingTable::new()?,
        })
    }

    /// Create an empty index with a specific initial slot count
    ///
    /// # Errors
    ///
    /// Returns an error if the initial storage cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            entries: ProbingTable::with_capacity(capacity)?,
        })
    }

    /// Neighbor lists recorded for `pattern`
    pub fn get(&self, pattern: Point) -> Option<&Neighbors> {
        self.entries.get(&pattern)
    }

    /// Overwrite the lists for `pattern` with an already merged value
    ///
    /// # Errors
    ///
    /// Returns an error if the index must grow and the new storage cannot be reserved
    pub fn set(&mut self, pattern: Point, neighbors: Neighbors) -> Result<()> {
        self.entries.set(pattern, neighbors).map(|_| ())
    }

    /// Merge one occurrence's observations into the lists for `pattern`
    ///
    /// Existing observations are kept and the new ones appended, so
    /// relationships seen more often in the source weigh more.
    ///
    /// # Errors
    ///
    /// Returns an error if a list or the index cannot grow
    pub fn record(&mut self, pattern: Point, observed: Neighbors) -> Result<()> {
        if let Some(existing) = self.entries.get_mut(&pattern) {
            return existing.append(&observed);
        }
        self.set(pattern, observed)
    }

    /// Number of patterns with an entry
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pattern has an entry
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Growth and collision counters of the underlying table
    pub const fn stats(&self) -> TableStats {
        self.entries.stats()
    }

    /// Patterns with an entry, in scan order
    pub fn patterns(&self) -> Vec<Point> {
        let mut points: Vec<Point> = self.entries.keys().copied().collect();
        points.sort_unstable();
        points
    }

    /// Total observations across all patterns and directions
    pub fn observation_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, neighbors)| neighbors.observation_count())
            .sum()
    }
}
