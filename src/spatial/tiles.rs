//! Square region extraction with content hashing and exact comparison
//!
//! A region is a `size × size` copy of source pixels taken at some offset.
//! Its hash only selects a bucket; identity is always decided by comparing
//! every pixel.

use crate::io::error::{AlgorithmError, Result, WithOperation, invalid_parameter};
use crate::spatial::grid::{Color, PixelGrid, Point};

/// Seed of the polynomial region hash
const HASH_SEED: u64 = 17;
/// Multiplier of the polynomial region hash
const HASH_MULTIPLIER: u64 = 31;

/// Square block of pixels materialized to compute a hash/equality key
#[derive(Debug, Clone)]
pub struct Region {
    grid: PixelGrid,
}

impl Region {
    /// Copy the `size × size` block whose top-left corner is `origin`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `size` is zero
    /// - The block does not fit inside `source`
    /// - The pixel buffer cannot be reserved
    pub fn extract(source: &PixelGrid, origin: Point, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(invalid_parameter(
                "region_size",
                &size,
                &"regions must be at least one pixel wide",
            ));
        }
        if !source.contains_block(origin, size) {
            return Err(invalid_parameter(
                "origin",
                &format!("({}, {})", origin.x, origin.y),
                &format!(
                    "a {size}x{size} region does not fit in a {}x{} image",
                    source.width(),
                    source.height()
                ),
            ));
        }

        let count = size * size;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .with_operation("region extraction", count)?;

        for dy in 0..size {
            for dx in 0..size {
                let point = Point::new(origin.x + dx, origin.y + dy);
                let color = source
                    .get(point)
                    .ok_or(AlgorithmError::InvalidPatternReference { pattern: point })?;
                pixels.push(color);
            }
        }

        Ok(Self {
            grid: PixelGrid::new(size, size, pixels)?,
        })
    }

    /// Edge length in pixels
    pub fn size(&self) -> usize {
        self.grid.width()
    }

    /// The region's pixels as a grid
    pub const fn as_grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Polynomial hash over per-pixel channel sums: `hash = hash * 31 ^ (r + g + b)`
    pub fn content_hash(&self) -> u64 {
        self.grid.pixels().fold(HASH_SEED, |hash, color| {
            hash.wrapping_mul(HASH_MULTIPLIER) ^ u64::from(color.channel_sum())
        })
    }

    /// Exact comparison of dimensions and every pixel
    pub fn matches(&self, other: &Self) -> bool {
        self.grid.width() == other.grid.width()
            && self.grid.height() == other.grid.height()
            && self
                .grid
                .pixels()
                .zip(other.grid.pixels())
                .all(|(a, b)| a == b)
    }

    /// Pixel at a position relative to the region's top-left corner
    pub fn get(&self, point: Point) -> Option<Color> {
        self.grid.get(point)
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for Region {}
