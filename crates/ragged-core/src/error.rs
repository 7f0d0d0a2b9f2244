//! Unified error types for ragged buffer operations
//!
//! All fallible operations return [`RaggedResult`]. Errors fall into the
//! three kinds exposed by [`ErrorKind`]:
//!
//! - **Shape mismatch**: incompatible feature widths, batch sizes, per-sequence
//!   lengths, or column counts.
//! - **Invalid argument**: malformed constructor input, unsupported axes,
//!   mixed scalar kinds, unmet pad/pack preconditions.
//! - **Index out of range**: batch- or feature-axis indices past the end.
//!   Item-axis overrun is never an error; it selects nothing.
//!
//! # Examples
//!
//! ```
//! use ragged_core::error::{ErrorKind, RaggedError, ShapeMismatchError};
//!
//! let err: RaggedError = ShapeMismatchError::Features { expected: 3, got: 4 }.into();
//! assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
//! assert_eq!(
//!     err.to_string(),
//!     "Shape mismatch: feature width mismatch: expected 3, got 4"
//! );
//! ```

use crate::scalar::DType;
use thiserror::Error;

/// Top-level error type for all ragged buffer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaggedError {
    /// Incompatible shapes between operands
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatchError),

    /// Malformed input to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    /// Batch- or feature-axis index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Shape mismatch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatchError {
    #[error("feature width mismatch: expected {expected}, got {got}")]
    Features { expected: usize, got: usize },

    #[error("batch size mismatch: expected {expected} sequences, got {got}")]
    BatchSize { expected: usize, got: usize },

    #[error("incompatible lengths for sequence {position}: {lhs} vs {rhs}")]
    SequenceLengths {
        position: usize,
        lhs: usize,
        rhs: usize,
    },

    #[error("{operand} must have {expected} feature columns, got {got}")]
    Columns {
        operand: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{operand} must have a single item per sequence, got {got} items for sequence {position}")]
    SingleItem {
        operand: &'static str,
        position: usize,
        got: usize,
    },

    #[error("expected {expected}D input, got {got}D")]
    Dimensionality { expected: usize, got: usize },
}

/// Invalid argument errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("lengths sum to {sum} but {total} items were provided")]
    LengthSum { total: usize, sum: usize },

    #[error("sequence lengths overflow the item count at sequence {position}")]
    LengthOverflow { position: usize },

    #[error("negative length {length} for sequence {position}")]
    NegativeLength { position: usize, length: i64 },

    #[error("flat data of length {len} is not a multiple of {features} features")]
    FlatLength { len: usize, features: usize },

    #[error("{operation} requires at least one buffer")]
    EmptyInput { operation: &'static str },

    #[error("axis {axis} is not supported by {operation}")]
    InvalidAxis {
        operation: &'static str,
        axis: usize,
    },

    #[error("slice step cannot be zero")]
    ZeroStep,

    #[error("cannot combine {expected} buffer with {got} buffer")]
    DTypeMismatch { expected: DType, got: DType },

    #[error("inconsistent pad/pack layout: {reason}")]
    PackLayout { reason: &'static str },

    #[error("bucket identifier {value} at item {position} is negative")]
    NegativeBucket { position: usize, value: i64 },
}

/// Index errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("index {index} out of range for axis {axis} of size {size}")]
    OutOfBounds {
        axis: usize,
        index: usize,
        size: usize,
    },
}

/// Coarse classification of a [`RaggedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ShapeMismatch,
    InvalidArgument,
    IndexOutOfRange,
}

/// Result type alias for ragged buffer operations
pub type RaggedResult<T> = Result<T, RaggedError>;

impl RaggedError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RaggedError::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
            RaggedError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            RaggedError::Index(_) => ErrorKind::IndexOutOfRange,
        }
    }

    /// Create a feature width mismatch error
    pub fn features(expected: usize, got: usize) -> Self {
        ShapeMismatchError::Features { expected, got }.into()
    }

    /// Create a batch size mismatch error
    pub fn batch_size(expected: usize, got: usize) -> Self {
        ShapeMismatchError::BatchSize { expected, got }.into()
    }

    /// Create a per-sequence length mismatch error
    pub fn sequence_lengths(position: usize, lhs: usize, rhs: usize) -> Self {
        ShapeMismatchError::SequenceLengths { position, lhs, rhs }.into()
    }

    /// Create an index out of bounds error
    pub fn out_of_bounds(axis: usize, index: usize, size: usize) -> Self {
        IndexError::OutOfBounds { axis, index, size }.into()
    }
}
