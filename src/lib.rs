//! Tiled wave function collapse texture synthesis
//!
//! A source image is cut into square regions at every offset. Identical
//! regions collapse onto one canonical pattern, and the patterns seen one
//! region width apart in each cardinal direction are recorded with their
//! frequencies. A grid of output cells is then solved by repeatedly fixing
//! the most constrained cell to a frequency-weighted pattern and propagating
//! what its neighbors may still be, and the result is stamped back into pixels.

#![forbid(unsafe_code)]

/// Solving, propagation and compositing of output grids
pub mod algorithm;
/// Pattern extraction, content-addressed tables and adjacency statistics
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Seeded random sampling
pub mod math;
/// Pixel grids, coordinates and region extraction
pub mod spatial;

pub use algorithm::executor::{Synthesis, SynthesisConfig, Synthesizer};
pub use analysis::extraction::{PatternModel, extract_patterns};
pub use io::error::{AlgorithmError, Result};
