//! Constraint solving over a grid of output cells
//!
//! Each cell starts with every pattern as a candidate. The solver repeatedly
//! collapses the cell with the fewest candidates, samples a pattern weighted
//! by how often it was observed beside the already collapsed neighbors, and
//! propagates the resulting restrictions outward.

use crate::{
    algorithm::{
        bitset::PatternBitset,
        catalog::PatternCatalog,
        propagation::{PropagationOutcome, propagate},
        selection::{CollapseQueue, choose_pattern},
    },
    io::error::{
        AlgorithmError, Result, WithOperation, allocation_failure, computation_error,
        invalid_parameter,
    },
    math::probability::RandomSelector,
    spatial::grid::Point,
};
use ndarray::Array2;

/// State of one output cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Patterns still possible here
    Uncollapsed {
        /// Remaining candidate pattern indices
        candidates: PatternBitset,
    },
    /// Fixed to a single pattern; never reverts
    Collapsed {
        /// Catalog index of the chosen pattern
        pattern: usize,
    },
}

impl Cell {
    /// Whether the cell holds a single chosen pattern
    pub const fn is_collapsed(&self) -> bool {
        matches!(self, Self::Collapsed { .. })
    }

    /// Number of patterns still possible
    pub fn candidate_count(&self) -> usize {
        match self {
            Self::Uncollapsed { candidates } => candidates.count(),
            Self::Collapsed { .. } => 1,
        }
    }
}

/// Outcome of a single solver step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStep {
    /// One cell was collapsed and its constraints propagated
    Collapsed {
        /// The collapsed cell
        cell: Point,
        /// Catalog index of the chosen pattern
        pattern: usize,
        /// Number of neighbor sets narrowed by propagation
        narrowed: usize,
    },
    /// Every cell is collapsed
    Complete,
}

/// Fully collapsed grid of canonical pattern points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedGrid {
    patterns: Array2<Point>,
}

impl SolvedGrid {
    /// Width in cells
    pub fn width(&self) -> usize {
        self.patterns.ncols()
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.patterns.nrows()
    }

    /// Canonical point chosen for `cell`
    pub fn get(&self, cell: Point) -> Option<Point> {
        self.patterns.get([cell.y, cell.x]).copied()
    }

    /// `(cell, canonical point)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.patterns
            .indexed_iter()
            .map(|((row, col), &pattern)| (Point::new(col, row), pattern))
    }
}

/// Collapse-and-propagate solver for one attempt
pub struct Solver<'a> {
    catalog: &'a PatternCatalog,
    cells: Array2<Cell>,
    queue: CollapseQueue,
    selector: RandomSelector,
    collapsed: usize,
    failed_at: Option<Point>,
}

impl<'a> Solver<'a> {
    /// Create a solver with every cell uncollapsed
    ///
    /// `size` is measured in cells.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero, the catalog is empty,
    /// or the grid cannot be allocated
    pub fn new(catalog: &'a PatternCatalog, size: Point, seed: u64) -> Result<Self> {
        if size.x == 0 || size.y == 0 {
            return Err(invalid_parameter(
                "output size",
                &format!("{}x{}", size.x, size.y),
                &"both dimensions must be positive",
            ));
        }
        if catalog.is_empty() {
            return Err(invalid_parameter(
                "catalog",
                &0,
                &"at least one pattern is required",
            ));
        }

        let total = size
            .x
            .checked_mul(size.y)
            .ok_or_else(|| allocation_failure("solver grid", usize::MAX))?;
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(total)
            .with_operation("solver grid", total)?;
        let full = catalog.full_set();
        storage.extend((0..total).map(|_| Cell::Uncollapsed {
            candidates: full.clone(),
        }));

        let cells = Array2::from_shape_vec((size.y, size.x), storage).map_err(|error| {
            computation_error("solver grid shape", &error)
        })?;
        let queue = CollapseQueue::from_cells(&cells);

        Ok(Self {
            catalog,
            cells,
            queue,
            selector: RandomSelector::new(seed),
            collapsed: 0,
            failed_at: None,
        })
    }

    /// Current cell states
    pub const fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// State of a single cell
    pub fn cell(&self, cell: Point) -> Option<&Cell> {
        self.cells.get([cell.y, cell.x])
    }

    /// Number of collapsed cells
    pub const fn collapsed_count(&self) -> usize {
        self.collapsed
    }

    /// Number of cells in the grid
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Whether every cell is collapsed
    pub fn is_complete(&self) -> bool {
        self.collapsed == self.cells.len()
    }

    fn contradiction(&mut self, cell: Point) -> AlgorithmError {
        self.failed_at = Some(cell);
        AlgorithmError::SolveContradiction {
            cell,
            collapsed: self.collapsed,
        }
    }

    fn commit(&mut self, cell: Point, pattern: usize) -> Result<usize> {
        if let Some(slot) = self.cells.get_mut([cell.y, cell.x]) {
            *slot = Cell::Collapsed { pattern };
            self.collapsed += 1;
        }

        match propagate(self.catalog, &mut self.cells, cell, &mut self.queue)? {
            PropagationOutcome::Stable { narrowed } => Ok(narrowed),
            PropagationOutcome::Contradiction { cell } => Err(self.contradiction(cell)),
        }
    }

    /// Force `cell` to the pattern at canonical point `pattern` and propagate
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is outside the grid, already collapsed,
    /// the pattern is unknown or not a remaining candidate, or propagation
    /// empties another cell
    pub fn pin(&mut self, cell: Point, pattern: Point) -> Result<()> {
        if let Some(failed) = self.failed_at {
            return Err(self.contradiction(failed));
        }
        let index = self
            .catalog
            .index_of(pattern)
            .ok_or(AlgorithmError::InvalidPatternReference { pattern })?;

        match self.cell(cell) {
            Some(Cell::Uncollapsed { candidates }) if candidates.contains(index) => {}
            Some(_) => {
                return Err(invalid_parameter(
                    "pin",
                    &format!("({}, {})", cell.x, cell.y),
                    &"cell is collapsed or excludes the pattern",
                ));
            }
            None => {
                return Err(invalid_parameter(
                    "pin",
                    &format!("({}, {})", cell.x, cell.y),
                    &"cell is outside the grid",
                ));
            }
        }

        self.commit(cell, index).map(|_| ())
    }

    /// Collapse one cell and propagate
    ///
    /// # Errors
    ///
    /// Returns `SolveContradiction` if propagation empties a cell. The solver
    /// stays failed and keeps returning the same error.
    pub fn step(&mut self) -> Result<SolveStep> {
        if let Some(cell) = self.failed_at {
            return Err(self.contradiction(cell));
        }

        let Some(cell) = self.queue.pop_min(&self.cells) else {
            return Ok(SolveStep::Complete);
        };

        let Some(Cell::Uncollapsed { candidates }) = self.cell(cell).cloned() else {
            return Err(computation_error(
                "collapse selection",
                &"queue yielded a collapsed cell",
            ));
        };

        let pattern = choose_pattern(
            &mut self.selector,
            self.catalog,
            &self.cells,
            cell,
            &candidates,
        )
        .ok_or_else(|| self.contradiction(cell))?;

        let narrowed = self.commit(cell, pattern)?;
        Ok(SolveStep::Collapsed {
            cell,
            pattern,
            narrowed,
        })
    }

    /// Step until complete, reporting each collapse to `observer`
    ///
    /// # Errors
    ///
    /// Returns the first contradiction encountered
    pub fn run_with<F>(mut self, mut observer: F) -> Result<SolvedGrid>
    where
        F: FnMut(&Self, Point, usize),
    {
        loop {
            match self.step()? {
                SolveStep::Collapsed { cell, pattern, .. } => observer(&self, cell, pattern),
                SolveStep::Complete => return self.into_solution(),
            }
        }
    }

    /// Step until complete
    ///
    /// # Errors
    ///
    /// Returns the first contradiction encountered
    pub fn run(self) -> Result<SolvedGrid> {
        self.run_with(|_, _, _| {})
    }

    /// Convert a completed solver into its grid of canonical points
    ///
    /// # Errors
    ///
    /// Returns an error if any cell is still uncollapsed
    pub fn into_solution(self) -> Result<SolvedGrid> {
        let mut resolved = Vec::new();
        resolved
            .try_reserve_exact(self.cells.len())
            .with_operation("solved grid", self.cells.len())?;

        for ((row, col), cell) in self.cells.indexed_iter() {
            let point = match cell {
                Cell::Collapsed { pattern } => self
                    .catalog
                    .point(*pattern)
                    .ok_or_else(|| computation_error(
                        "solution",
                        &format!("pattern index {pattern} outside catalog"),
                    ))?,
                Cell::Uncollapsed { .. } => {
                    return Err(computation_error(
                        "solution",
                        &format!("cell ({col}, {row}) is uncollapsed"),
                    ));
                }
            };
            resolved.push(point);
        }

        let patterns = Array2::from_shape_vec(self.cells.raw_dim(), resolved)
            .map_err(|error| computation_error("solved grid shape", &error))?;
        Ok(SolvedGrid { patterns })
    }
}
