//! Error types and context management for extraction, solving and codec operations

use crate::spatial::grid::Point;
use std::collections::TryReserveError;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all pipeline operations
#[derive(Debug)]
pub enum AlgorithmError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Decoded input does not describe a valid raster
    ///
    /// Covers a wrong signature, non-numeric or zero dimensions,
    /// out-of-range sample counts, premature EOF and trailing data.
    MalformedInput {
        /// Path to the offending file
        path: PathBuf,
        /// Description of what is wrong with the input
        reason: String,
    },

    /// Storage for a table, region, neighbor list or output buffer could not be reserved
    AllocationFailure {
        /// Operation that requested the memory
        operation: &'static str,
        /// Number of elements requested
        requested: usize,
    },

    /// An output cell ran out of candidate patterns before it was collapsed
    SolveContradiction {
        /// Output grid coordinate of the cell whose candidate set became empty
        cell: Point,
        /// Number of cells collapsed when the contradiction was found
        collapsed: usize,
    },

    /// Every solve attempt allowed by the retry policy ended in a contradiction
    RestartsExhausted {
        /// Number of attempts made
        attempts: usize,
        /// Cell that caused the final attempt to fail
        last_cell: Point,
    },

    /// Algorithm parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A solved cell references a source point without a full pixel block behind it
    InvalidPatternReference {
        /// The referenced canonical point
        pattern: Point,
    },

    /// Failed to save generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Internal computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::MalformedInput { path, reason } => {
                write!(f, "Malformed input '{}': {reason}", path.display())
            }
            Self::AllocationFailure {
                operation,
                requested,
            } => {
                write!(
                    f,
                    "Allocation failed during {operation} ({requested} elements requested)"
                )
            }
            Self::SolveContradiction { cell, collapsed } => {
                write!(
                    f,
                    "Contradiction at output cell ({}, {}) after {collapsed} collapses",
                    cell.x, cell.y
                )
            }
            Self::RestartsExhausted {
                attempts,
                last_cell,
            } => {
                write!(
                    f,
                    "No solution after {attempts} attempts (last contradiction at ({}, {}))",
                    last_cell.x, last_cell.y
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidPatternReference { pattern } => {
                write!(
                    f,
                    "Pattern reference ({}, {}) is outside the source image",
                    pattern.x, pattern.y
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl AlgorithmError {
    /// Whether a fresh solve attempt with another seed could succeed
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::SolveContradiction { .. })
    }
}

/// Convenience type alias for pipeline results
pub type Result<T> = std::result::Result<T, AlgorithmError>;

/// Attaches the failing operation to allocation errors
pub trait WithOperation<T> {
    /// Map a reservation failure into an [`AlgorithmError::AllocationFailure`]
    ///
    /// # Errors
    ///
    /// Returns an allocation failure naming `operation` if the wrapped result failed
    fn with_operation(self, operation: &'static str, requested: usize) -> Result<T>;
}

impl<T> WithOperation<T> for std::result::Result<T, TryReserveError> {
    fn with_operation(self, operation: &'static str, requested: usize) -> Result<T> {
        self.map_err(|_reserve_error| allocation_failure(operation, requested))
    }
}

impl From<TryReserveError> for AlgorithmError {
    fn from(_err: TryReserveError) -> Self {
        Self::AllocationFailure {
            operation: "unknown",
            requested: 0,
        }
    }
}

impl From<image::ImageError> for AlgorithmError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AlgorithmError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AlgorithmError {
    AlgorithmError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> AlgorithmError {
    AlgorithmError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create an allocation failure error
pub const fn allocation_failure(operation: &'static str, requested: usize) -> AlgorithmError {
    AlgorithmError::AllocationFailure {
        operation,
        requested,
    }
}
