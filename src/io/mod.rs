/// Command-line interface and batch file processing
pub mod cli;
/// Pipeline constants and defaults
pub mod configuration;
/// Error types for every pipeline stage
pub mod error;
/// Raster decoding and encoding
pub mod image;
/// Structured logging setup
pub mod logging;
/// Terminal progress display
pub mod progress;
/// GIF capture of solver progress
pub mod visualization;
