//! Pattern extraction and adjacency accumulation over source images

/// Per-pattern neighbor lists and the adjacency index
pub mod adjacency;
/// Source scan producing the pattern model
pub mod extraction;
/// Content-addressed pattern table
pub mod patterns;
/// Generic open-addressing table shared by the pattern table and adjacency index
pub mod table;
