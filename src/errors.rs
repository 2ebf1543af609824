//! Submodule providing the [`MatrixError`] enumeration shared by every
//! fallible operation in this crate.

/// Error enumeration covering matrix construction, loading and
/// multiplication failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    /// A matrix dimension, epsilon value or sparsity degree was outside its
    /// admissible range, or two operands had incompatible shapes.
    #[error("{message}")]
    InvalidArgument {
        /// Human-readable description of the invalid argument.
        message: String,
    },
    /// A coordinate fell outside the declared shape of a matrix.
    #[error(
        "coordinate ({row}, {col}) is out of bounds for a {rows}x{cols} matrix"
    )]
    OutOfRange {
        /// Row of the offending coordinate.
        row: i64,
        /// Column of the offending coordinate.
        col: i64,
        /// Number of rows declared for the matrix.
        rows: i64,
        /// Number of columns declared for the matrix.
        cols: i64,
    },
    /// A Matrix Market file could not be opened, parsed or was truncated.
    #[error("failed to load matrix from '{path}': {reason}")]
    FileError {
        /// Path of the file that could not be loaded.
        path: String,
        /// Description of the failure.
        reason: String,
    },
}

impl MatrixError {
    /// Builds an [`MatrixError::InvalidArgument`] from a formatted message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}
