//! Mathematical utilities for the algorithm

/// Seeded weighted sampling over candidate multisets
pub mod probability;
