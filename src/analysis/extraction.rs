//! Builds the pattern table and adjacency index from a source image
//!
//! Every offset where a full region fits is visited in scan order. The
//! region there is canonicalized, and so is each region exactly one region
//! width away in the four cardinal directions when it also fits.

use crate::analysis::adjacency::{AdjacencyIndex, Direction, Neighbors};
use crate::analysis::patterns::PatternTable;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::grid::{PixelGrid, Point};
use crate::spatial::tiles::Region;

/// Canonical patterns of a source image and their observed adjacencies
///
/// Read-only once built; solver attempts borrow it.
#[derive(Debug, Clone)]
pub struct PatternModel {
    patterns: PatternTable,
    adjacency: AdjacencyIndex,
    region_size: usize,
}

impl PatternModel {
    /// Content table mapping regions to canonical points
    pub const fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Neighbor lists per canonical pattern
    pub const fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Region edge length the model was built with
    pub const fn region_size(&self) -> usize {
        self.region_size
    }
}

/// Walks a source image and accumulates its adjacency model
pub struct Extractor<'a> {
    source: &'a PixelGrid,
    region_size: usize,
}

impl<'a> Extractor<'a> {
    /// Prepare extraction of `region_size` regions from `source`
    ///
    /// # Errors
    ///
    /// Returns an error if `region_size` is zero or exceeds either image dimension
    pub fn new(source: &'a PixelGrid, region_size: usize) -> Result<Self> {
        if region_size == 0 {
            return Err(invalid_parameter(
                "region_size",
                &region_size,
                &"must be at least 1",
            ));
        }
        if region_size > source.width() || region_size > source.height() {
            return Err(invalid_parameter(
                "region_size",
                &region_size,
                &format!(
                    "must not exceed the {}x{} source image",
                    source.width(),
                    source.height()
                ),
            ));
        }

        Ok(Self {
            source,
            region_size,
        })
    }

    /// Visit every valid offset and build the full model
    ///
    /// # Errors
    ///
    /// Returns an error if any table, region or neighbor list cannot be
    /// allocated; no partial model is returned
    pub fn extract(&self) -> Result<PatternModel> {
        let mut patterns = PatternTable::new()?;
        let mut adjacency = AdjacencyIndex::new()?;

        let last_x = self.source.width() - self.region_size;
        let last_y = self.source.height() - self.region_size;

        for y in 0..=last_y {
            for x in 0..=last_x {
                let origin = Point::new(x, y);
                let pattern = self.canonicalize(&mut patterns, origin)?;
                let observed = self.observe_neighbors(&mut patterns, origin)?;
                adjacency.record(pattern, observed)?;
            }
        }

        tracing::info!(
            patterns = patterns.len(),
            observations = adjacency.observation_count(),
            offsets = (last_x + 1) * (last_y + 1),
            table_growths = patterns.stats().growths,
            index_growths = adjacency.stats().growths,
            "pattern extraction complete"
        );

        Ok(PatternModel {
            patterns,
            adjacency,
            region_size: self.region_size,
        })
    }

    fn canonicalize(&self, patterns: &mut PatternTable, origin: Point) -> Result<Point> {
        let region = Region::extract(self.source, origin, self.region_size)?;
        patterns.get_or_insert(region, origin)
    }

    /// Neighbor observed one region width away in each direction
    ///
    /// Directions whose window leaves the image contribute nothing.
    fn observe_neighbors(&self, patterns: &mut PatternTable, origin: Point) -> Result<Neighbors> {
        let mut observed = Neighbors::new();

        for direction in Direction::ALL {
            let Some(neighbor_origin) = direction.step(origin, self.region_size) else {
                continue;
            };
            if !self.source.contains_block(neighbor_origin, self.region_size) {
                continue;
            }

            let neighbor = self.canonicalize(patterns, neighbor_origin)?;
            observed.push(direction, neighbor)?;
        }

        Ok(observed)
    }
}

/// Extract the adjacency model of `source` in one call
///
/// # Errors
///
/// Returns an error if `region_size` is invalid for `source` or allocation fails
pub fn extract_patterns(source: &PixelGrid, region_size: usize) -> Result<PatternModel> {
    Extractor::new(source, region_size)?.extract()
}
