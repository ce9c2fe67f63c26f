//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - Points, colors and the immutable pixel grid
//! - Region extraction, hashing and exact comparison

/// Point, color and pixel grid value types
pub mod grid;
/// Region extraction and content keys
pub mod tiles;

pub use grid::{Color, PixelGrid, Point};
pub use tiles::Region;
