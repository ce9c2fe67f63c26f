//! Immutable raster storage and the coordinate/color value types shared by every stage
//!
//! Pixels live in an ndarray `Array2` indexed `[row, col]` (that is `[y, x]`)
//! in standard row-major layout, so iteration order is scan order.

use crate::io::error::{Result, WithOperation, invalid_parameter};
use ndarray::Array2;
use std::cmp::Ordering;

/// Integer grid coordinate
///
/// Ordering is scan order: lower row first, then lower column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl Point {
    /// Create a point from column and row
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Shift by a signed amount on each axis, `None` if either axis underflows
    pub const fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };
        Some(Self { x, y })
    }

    /// Index of this point in a row-major buffer of the given width
    pub const fn linear_index(self, width: usize) -> usize {
        self.y * width + self.x
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of the three channels, the per-pixel term of the region hash
    pub const fn channel_sum(self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }
}

/// Immutable raster of `width * height` colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    pixels: Array2<Color>,
}

impl PixelGrid {
    /// Build a grid from a row-major pixel sequence
    ///
    /// # Errors
    ///
    /// Returns an error if `pixels.len() != width * height`
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            invalid_parameter(
                "dimensions",
                &format!("{width}x{height}"),
                &"pixel count overflows",
            )
        })?;
        if pixels.len() != expected {
            return Err(invalid_parameter(
                "pixels",
                &pixels.len(),
                &format!("expected {expected} pixels for a {width}x{height} grid"),
            ));
        }

        let pixels = Array2::from_shape_vec((height, width), pixels).map_err(|shape_error| {
            invalid_parameter("pixels", &format!("{width}x{height}"), &shape_error)
        })?;
        Ok(Self { pixels })
    }

    /// Build a grid by evaluating `color_at` for every point in scan order
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel buffer cannot be reserved
    pub fn from_fn<F>(width: usize, height: usize, mut color_at: F) -> Result<Self>
    where
        F: FnMut(Point) -> Color,
    {
        let count = width.saturating_mul(height);
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .with_operation("pixel grid", count)?;
        for y in 0..height {
            for x in 0..width {
                pixels.push(color_at(Point::new(x, y)));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Total pixel count
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the grid has no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounds-checked pixel read
    pub fn get(&self, point: Point) -> Option<Color> {
        self.pixels.get([point.y, point.x]).copied()
    }

    /// Whether a `size`-square block with top-left `origin` lies fully inside the grid
    pub fn contains_block(&self, origin: Point, size: usize) -> bool {
        origin.x.checked_add(size).is_some_and(|end| end <= self.width())
            && origin.y.checked_add(size).is_some_and(|end| end <= self.height())
    }

    /// Pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = &Color> {
        self.pixels.iter()
    }

    /// Mean color over all pixels, black for an empty grid
    pub fn mean_color(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::default();
        }

        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
        for color in &self.pixels {
            r += u64::from(color.r);
            g += u64::from(color.g);
            b += u64::from(color.b);
        }
        let count = self.pixels.len() as u64;
        Color::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
    }
}
